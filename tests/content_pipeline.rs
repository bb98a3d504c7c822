//! End-to-end: documents on disk -> loader -> page controller -> containers.

use chrono::NaiveDateTime;
use pretty_assertions::assert_eq;
use robosite::config::TemporalCaps;
use robosite::detail::Dismiss;
use robosite::filter::{filter, FilterState};
use robosite::loader::{load, load_collection, FileSource, Loaded};
use robosite::page::{Clock, LoadStatus, PageController, DETAIL, FACETS, FEATURED, GRID, ONGOING, PAST, UPCOMING};
use robosite::DomainSchema;
use std::fs;
use tempfile::TempDir;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

const NOW: &str = "2024-03-10 12:00";

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("events.json"),
        r#"{
          "categories": ["workshop", "hackathon"],
          "events": [
            {"id": 1, "title": "ROS Bootcamp", "category": "workshop", "date": "2024-03-20", "time": "10:00",
             "endDate": "2024-03-20", "endTime": "16:00", "registered": 40, "capacity": 40, "featured": true},
            {"id": 2, "title": "24h Hack", "category": "hackathon", "date": "2024-03-09", "time": "09:00",
             "endDate": "2024-03-11", "endTime": "09:00", "registered": 5, "capacity": 50},
            {"id": 3, "title": "Soldering 101", "category": "workshop", "date": "2024-01-15", "time": "14:00",
             "endDate": "2024-01-15", "endTime": "17:00"},
            {"id": 4, "title": "Robo Expo", "category": "exhibition", "date": "2024-04-02", "time": "11:00",
             "status": "past"}
          ]
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("team.json"),
        r#"{
          "facultyAdvisors": [{"id": "f1", "name": "Dr. Rao", "designation": "Professor"}],
          "coreTeam": {"members": [
            {"id": "c1", "name": "Ira", "role": "Treasurer"},
            {"id": "c2", "name": "Dev", "role": "President"}
          ]},
          "teamMembers": {
            "hardware": [{"id": "h1", "name": "Asha", "role": "Member", "skills": ["PCB", "CAD"]}],
            "aiMl": [{"id": "a1", "name": "Ben", "role": "Lead", "department": "CSE"}]
          },
          "alumni": []
        }"#,
    )
    .unwrap();
    fs::write(dir.path().join("news.json"), "{ this is not json").unwrap();
    dir
}

fn page(schema: DomainSchema) -> PageController {
    PageController::new(schema, Clock::Fixed(at(NOW)), 3)
}

#[tokio::test]
async fn events_page_partitions_and_caps() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let mut p = page(DomainSchema::events(TemporalCaps::default()));
    assert!(p.initialize(&src).await);
    assert_eq!(p.state().status, LoadStatus::Ready);

    let upcoming = p.container(UPCOMING).unwrap();
    let ongoing = p.container(ONGOING).unwrap();
    let past = p.container(PAST).unwrap();
    assert!(upcoming.contains("ROS Bootcamp"));
    assert!(upcoming.contains("Fully Booked"));
    assert!(ongoing.contains("24h Hack"));
    assert!(!upcoming.contains("24h Hack"));
    assert!(past.contains("Soldering 101"));
    assert!(past.contains("Robo Expo"));

    assert!(p.container(FEATURED).unwrap().contains("ROS Bootcamp"));
}

#[tokio::test]
async fn events_past_selector_only_narrows_past() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let mut p = page(DomainSchema::events(TemporalCaps::default()));
    p.initialize(&src).await;

    p.select("past_category", "exhibition");
    assert!(p.container(PAST).unwrap().contains("Robo Expo"));
    assert!(!p.container(PAST).unwrap().contains("Soldering 101"));
    assert!(p.container(UPCOMING).unwrap().contains("ROS Bootcamp"));

    p.select("category", "hackathon");
    assert!(p.container(UPCOMING).unwrap().contains("no-matches"));
    assert!(p.container(ONGOING).unwrap().contains("24h Hack"));

    p.reset();
    assert!(p.state().filters.is_default());
    assert!(p.container(PAST).unwrap().contains("Soldering 101"));
}

#[tokio::test]
async fn registration_scenario() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let mut p = page(DomainSchema::events(TemporalCaps::default()));
    p.initialize(&src).await;

    use robosite::page::RegisterOutcome;
    assert_eq!(p.register("1"), RegisterOutcome::FullyBooked);
    assert_eq!(p.register("2"), RegisterOutcome::Registered { registered: 6 });
    assert!(p.container(ONGOING).unwrap().contains("6/50 Registered"));
}

#[tokio::test]
async fn team_sections_follow_declared_order() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());

    let mut members = page(DomainSchema::team_members());
    members.initialize(&src).await;
    let grid = members.container(GRID).unwrap().as_str().to_string();
    let hw = grid.find("data-category=\"hardware\"").unwrap();
    let ai = grid.find("data-category=\"aiMl\"").unwrap();
    assert!(hw < ai);
    assert!(grid.contains("AI &amp; ML"));

    members.search("pcb");
    let grid = members.container(GRID).unwrap();
    assert!(grid.contains("Asha"));
    assert!(!grid.contains("Ben"));
    assert!(members.container(FACETS).unwrap().contains("AI &amp; ML <span class=\"count\">0</span>"));

    let mut core = page(DomainSchema::core_team());
    core.initialize(&src).await;
    let grid = core.container(GRID).unwrap().as_str().to_string();
    assert!(grid.find("Dev").unwrap() < grid.find("Ira").unwrap());
}

#[tokio::test]
async fn detail_reachable_regardless_of_filters() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let mut p = page(DomainSchema::team_members());
    p.initialize(&src).await;
    p.select("specialization", "hardware");
    p.search("asha");
    assert!(p.open_detail("a1"));
    assert!(p.container(DETAIL).unwrap().contains("Ben"));
    assert!(!p.open_detail("zz"));
    assert_eq!(p.detail().current().map(|id| id.as_str()), Some("a1"));
    assert!(p.close_detail(Dismiss::OutsideClick));
}

#[tokio::test]
async fn malformed_news_falls_back_to_samples() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let loaded = load_collection(&src, &DomainSchema::club_news()).await;
    match loaded {
        Loaded::Sample(entities, err) => {
            assert_eq!(entities.len(), 2);
            assert!(err.to_string().contains("news.json"));
        }
        other => panic!("expected sample fallback, got {:?}", other),
    }

    let mut p = page(DomainSchema::industry_news());
    p.initialize(&src).await;
    assert!(matches!(p.state().status, LoadStatus::Sample(_)));
    assert!(p.container(GRID).unwrap().contains("Latest Advancements in Robotics AI"));
}

#[tokio::test]
async fn missing_document_is_error_state_for_projects_sample() {
    let dir = TempDir::new().unwrap();
    let src = FileSource::new(dir.path());

    let mut projects = page(DomainSchema::projects());
    projects.initialize(&src).await;
    assert!(projects.container(GRID).unwrap().contains("Autonomous Delivery Drone"));

    let mut faculty = page(DomainSchema::faculty());
    faculty.initialize(&src).await;
    assert!(faculty.container(GRID).unwrap().contains("error-state"));
}

#[tokio::test]
async fn raw_load_contract() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let events = load(&src, "events.json", "events").await.unwrap();
    assert_eq!(events.len(), 4);
    assert!(load(&src, "events.json", "nothing").await.unwrap().is_empty());
    assert!(load(&src, "events.json", "categories").await.is_ok());
    assert!(load(&src, "missing.json", "events").await.is_err());
}

#[tokio::test]
async fn filtering_twice_changes_nothing() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let schema = DomainSchema::events(TemporalCaps::default());
    let (entities, _) = load_collection(&src, &schema).await.into_parts();
    let mut st = FilterState::new();
    st.set_facet("category", "workshop");
    st.set_search("o");
    let once: Vec<_> = filter(&entities, &schema, &st, at(NOW)).into_iter().cloned().collect();
    let twice: Vec<_> = filter(&once, &schema, &st, at(NOW)).into_iter().cloned().collect();
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}

#[tokio::test]
async fn event_facet_counts_match_their_buckets() {
    let dir = data_dir();
    let src = FileSource::new(dir.path());
    let mut p = page(DomainSchema::events(TemporalCaps::default()));
    p.initialize(&src).await;

    let facets = p.container(FACETS).unwrap().as_str().to_string();
    let (primary, past) = facets.split_once("data-facet=\"past_category\"").unwrap();
    assert!(primary.contains("All <span class=\"count\">2</span>"));
    assert!(primary.contains("Workshop <span class=\"count\">1</span>"));
    assert!(primary.contains("Exhibition <span class=\"count\">0</span>"));
    assert!(past.contains("All <span class=\"count\">2</span>"));
    assert!(past.contains("Exhibition <span class=\"count\">1</span>"));
    assert!(past.contains("Hackathon <span class=\"count\">0</span>"));
}

#[tokio::test]
async fn empty_bucket_without_filters_is_not_a_filter_miss() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("events.json"),
        r#"{"events": [{"id": 1, "title": "Soldering 101", "category": "workshop", "date": "2024-01-15"}]}"#,
    )
    .unwrap();
    let src = FileSource::new(dir.path());
    let mut p = page(DomainSchema::events(TemporalCaps::default()));
    p.initialize(&src).await;

    let ongoing = p.container(ONGOING).unwrap();
    assert!(ongoing.contains("No ongoing events at the moment."));
    assert!(!ongoing.contains("no-matches"));

    p.search("robot");
    assert!(p.container(ONGOING).unwrap().contains("No ongoing events match your filters"));
}
