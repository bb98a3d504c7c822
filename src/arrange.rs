//! Grouping & Sort Stage.

use chrono::NaiveDateTime;
use serde_json::json;
use std::collections::BTreeMap;

use crate::config::TemporalCaps;
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::model::{Entity, Schedule};
use crate::schema::{Arrangement, DomainSchema, SortOrder};

// =============================================================================
// Temporal buckets
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Upcoming,
    Ongoing,
    Past,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Upcoming => "upcoming",
            Bucket::Ongoing => "ongoing",
            Bucket::Past => "past",
        }
    }
}

/// Upcoming when start > now, ongoing when start <= now <= end, past
/// otherwise. A record marked past, or with no schedule at all, is past.
pub fn classify(schedule: Option<&Schedule>, now: NaiveDateTime) -> Bucket {
    let Some(s) = schedule else {
        return Bucket::Past;
    };
    if s.past_override {
        Bucket::Past
    } else if s.start > now {
        Bucket::Upcoming
    } else if now <= s.end {
        Bucket::Ongoing
    } else {
        Bucket::Past
    }
}

/// Full buckets plus display caps; caps only limit what `displayed` returns.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalView<'a> {
    pub upcoming: Vec<&'a Entity>,
    pub ongoing: Vec<&'a Entity>,
    pub past: Vec<&'a Entity>,
    pub caps: TemporalCaps,
}

impl<'a> TemporalView<'a> {
    pub fn partition(subset: &[&'a Entity], caps: TemporalCaps, now: NaiveDateTime) -> Self {
        let mut view = Self {
            upcoming: Vec::new(),
            ongoing: Vec::new(),
            past: Vec::new(),
            caps,
        };
        for e in subset {
            match classify(e.schedule.as_ref(), now) {
                Bucket::Upcoming => view.upcoming.push(e),
                Bucket::Ongoing => view.ongoing.push(e),
                Bucket::Past => view.past.push(e),
            }
        }
        view
    }

    /// Replace the past bucket with the past members of a separately
    /// filtered subset (past events carry their own category selector).
    pub fn with_past(mut self, past_subset: &[&'a Entity], now: NaiveDateTime) -> Self {
        self.past = past_subset
            .iter()
            .copied()
            .filter(|e| classify(e.schedule.as_ref(), now) == Bucket::Past)
            .collect();
        self
    }

    pub fn bucket(&self, bucket: Bucket) -> &[&'a Entity] {
        match bucket {
            Bucket::Upcoming => &self.upcoming,
            Bucket::Ongoing => &self.ongoing,
            Bucket::Past => &self.past,
        }
    }

    pub fn displayed(&self, bucket: Bucket) -> &[&'a Entity] {
        let all = self.bucket(bucket);
        let cap = match bucket {
            Bucket::Upcoming => self.caps.upcoming,
            Bucket::Ongoing => self.caps.ongoing,
            Bucket::Past => self.caps.past,
        };
        &all[..all.len().min(cap)]
    }

    pub fn total(&self) -> usize {
        self.upcoming.len() + self.ongoing.len() + self.past.len()
    }
}

// =============================================================================
// Groups
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub key: String,
    pub title: String,
    pub entities: Vec<&'a Entity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup<'a> {
    pub year: i32,
    /// Most recent year in the timeline.
    pub latest: bool,
    pub entities: Vec<&'a Entity>,
}

impl<'a> YearGroup<'a> {
    /// First-listed record of the year, laid out as the year's lead entry.
    pub fn primary(&self) -> Option<&'a Entity> {
        self.entities.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupedView<'a> {
    Categories(Vec<Group<'a>>),
    Temporal(TemporalView<'a>),
    Flat(Vec<&'a Entity>),
}

impl<'a> GroupedView<'a> {
    pub fn is_empty(&self) -> bool {
        match self {
            GroupedView::Categories(groups) => groups.iter().all(|g| g.entities.is_empty()),
            GroupedView::Temporal(view) => view.total() == 0,
            GroupedView::Flat(items) => items.is_empty(),
        }
    }
}

/// Stable sort; equal keys keep collection order.
pub fn sort_entities(items: &mut [&Entity], order: &SortOrder) {
    match order {
        SortOrder::Collection => {}
        SortOrder::NewestFirst => items.sort_by(|a, b| b.recency().cmp(&a.recency())),
        SortOrder::Rank { field, ranks } => items.sort_by_key(|e| {
            let value = e.text_or_empty(field);
            ranks.iter().position(|r| *r == value).unwrap_or(usize::MAX)
        }),
    }
}

/// Group by declared category order. Categories with no members are
/// omitted; undeclared categories follow in first-seen order.
pub fn group_by_category<'a>(subset: &[&'a Entity], schema: &DomainSchema) -> Vec<Group<'a>> {
    let mut keys: Vec<String> = Vec::new();
    for def in &schema.categories {
        if subset.iter().any(|e| e.category == def.key) {
            keys.push(def.key.to_string());
        }
    }
    for e in subset {
        if !keys.contains(&e.category) {
            keys.push(e.category.clone());
        }
    }

    keys.into_iter()
        .map(|key| {
            let mut entities: Vec<&Entity> = subset.iter().copied().filter(|e| e.category == key).collect();
            sort_entities(&mut entities, &schema.sort);
            Group {
                title: schema.section_title(&key),
                key,
                entities,
            }
        })
        .collect()
}

pub fn arrange<'a>(subset: Vec<&'a Entity>, schema: &DomainSchema, now: NaiveDateTime) -> GroupedView<'a> {
    let view = match schema.arrangement {
        Arrangement::ByCategory => GroupedView::Categories(group_by_category(&subset, schema)),
        Arrangement::Temporal(caps) => GroupedView::Temporal(TemporalView::partition(&subset, caps, now)),
        Arrangement::Flat => {
            let mut items = subset;
            sort_entities(&mut items, &schema.sort);
            GroupedView::Flat(items)
        }
    };

    if let GroupedView::Temporal(t) = &view {
        log(
            Level::Debug,
            Domain::Arrange,
            "temporal_partition",
            obj(&[
                ("page", v_str(schema.name)),
                ("upcoming", json!(t.upcoming.len())),
                ("ongoing", json!(t.ongoing.len())),
                ("past", json!(t.past.len())),
            ]),
        );
    }
    view
}

/// Year-bucketed showcase over the full collection, filters ignored.
pub fn timeline(all: &[Entity]) -> Vec<YearGroup<'_>> {
    let mut by_year: BTreeMap<i32, Vec<&Entity>> = BTreeMap::new();
    for e in all.iter().filter(|e| e.timeline) {
        match e.year {
            Some(y) => by_year.entry(y).or_default().push(e),
            None => log(
                Level::Debug,
                Domain::Arrange,
                "timeline_no_year",
                obj(&[("id", v_str(e.id.as_str()))]),
            ),
        }
    }
    by_year
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, (year, entities))| YearGroup {
            year,
            latest: i == 0,
            entities,
        })
        .collect()
}

/// Featured strip, independent of any filter state. Temporal domains keep
/// only upcoming or ongoing events, soonest first; other domains sort by
/// year, newest first. `cap` bounds the strip when given.
pub fn featured<'a>(
    all: &'a [Entity],
    schema: &DomainSchema,
    cap: Option<usize>,
    now: NaiveDateTime,
) -> Vec<&'a Entity> {
    let mut out: Vec<&Entity> = match schema.arrangement {
        Arrangement::Temporal(_) => {
            let mut v: Vec<&Entity> = all
                .iter()
                .filter(|e| e.featured)
                .filter(|e| classify(e.schedule.as_ref(), now) != Bucket::Past)
                .collect();
            v.sort_by_key(|e| e.schedule.map(|s| s.start));
            v
        }
        _ => {
            let mut v: Vec<&Entity> = all.iter().filter(|e| e.featured).collect();
            v.sort_by(|a, b| b.year.cmp(&a.year));
            v
        }
    };
    if let Some(cap) = cap {
        out.truncate(cap);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Time left until `start`; `None` once it has begun.
pub fn countdown(start: NaiveDateTime, now: NaiveDateTime) -> Option<Countdown> {
    let secs = (start - now).num_seconds();
    if secs <= 0 {
        return None;
    }
    Some(Countdown {
        days: secs / 86_400,
        hours: (secs % 86_400) / 3_600,
        minutes: (secs % 3_600) / 60,
        seconds: secs % 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_all;
    use serde_json::{json, Value};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn events(raw: Vec<Value>) -> (DomainSchema, Vec<Entity>) {
        let schema = DomainSchema::events(TemporalCaps { upcoming: 2, ongoing: 3, past: 9 });
        let e = normalize_all(raw, &schema);
        (schema, e)
    }

    #[test]
    fn test_started_but_not_ended_is_ongoing() {
        let (_, e) = events(vec![json!({
            "id": 1, "date": "2024-03-09", "time": "09:00",
            "endDate": "2024-03-11", "endTime": "18:00"
        })]);
        assert_eq!(classify(e[0].schedule.as_ref(), at("2024-03-10 12:00")), Bucket::Ongoing);
    }

    #[test]
    fn test_boundaries() {
        let (_, e) = events(vec![json!({
            "id": 1, "date": "2024-03-10", "time": "10:00", "endTime": "12:00"
        })]);
        let s = e[0].schedule.as_ref();
        assert_eq!(classify(s, at("2024-03-10 09:59")), Bucket::Upcoming);
        assert_eq!(classify(s, at("2024-03-10 10:00")), Bucket::Ongoing);
        assert_eq!(classify(s, at("2024-03-10 12:00")), Bucket::Ongoing);
        assert_eq!(classify(s, at("2024-03-10 12:01")), Bucket::Past);
        assert_eq!(classify(None, at("2024-03-10 12:01")), Bucket::Past);
    }

    #[test]
    fn test_status_past_overrides_clock() {
        let (_, e) = events(vec![json!({"id": 1, "date": "2030-01-01", "status": "past"})]);
        assert_eq!(classify(e[0].schedule.as_ref(), at("2024-01-01 00:00")), Bucket::Past);
    }

    #[test]
    fn test_partition_is_complete_and_caps_only_display() {
        let (schema, e) = events(vec![
            json!({"id": 1, "date": "2024-04-01"}),
            json!({"id": 2, "date": "2024-04-02"}),
            json!({"id": 3, "date": "2024-04-03"}),
            json!({"id": 4, "date": "2024-03-10", "endDate": "2024-03-12"}),
            json!({"id": 5, "date": "2024-01-01"}),
            json!({"id": 6, "title": "undated"}),
        ]);
        let subset: Vec<&Entity> = e.iter().collect();
        let GroupedView::Temporal(view) = arrange(subset, &schema, at("2024-03-11 00:00")) else {
            panic!("events arrange temporally");
        };
        assert_eq!(view.total(), e.len());
        assert_eq!(view.upcoming.len(), 3);
        assert_eq!(view.displayed(Bucket::Upcoming).len(), 2);
        assert_eq!(view.ongoing.len(), 1);
        assert_eq!(view.past.len(), 2);
        for x in &e {
            let hits = [&view.upcoming, &view.ongoing, &view.past]
                .iter()
                .filter(|b| b.iter().any(|y| y.id == x.id))
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_category_groups_follow_declared_order() {
        let schema = DomainSchema::achievements();
        let e = normalize_all(
            vec![
                json!({"id": 1, "category": "research"}),
                json!({"id": 2, "category": "outreach"}),
                json!({"id": 3, "category": "competition"}),
                json!({"id": 4, "category": "research"}),
            ],
            &schema,
        );
        let subset: Vec<&Entity> = e.iter().collect();
        let first = group_by_category(&subset, &schema);
        let keys: Vec<&str> = first.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["competition", "research", "outreach"]);
        assert_eq!(first[1].title, "Research Publications");
        assert_eq!(first[2].title, "Outreach");
        assert_eq!(first, group_by_category(&subset, &schema));
    }

    #[test]
    fn test_timeline_groups_years_descending() {
        let schema = DomainSchema::achievements();
        let e = normalize_all(
            vec![
                json!({"id": 1, "category": "competition", "year": 2023, "timeline": true}),
                json!({"id": 2, "category": "research", "year": 2023, "timeline": false}),
                json!({"id": 3, "category": "research", "year": 2021, "timeline": true}),
                json!({"id": 4, "category": "innovation", "year": 2023, "timeline": true}),
                json!({"id": 5, "category": "innovation", "timeline": true}),
            ],
            &schema,
        );
        let years = timeline(&e);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 2023);
        assert!(years[0].latest);
        assert!(!years[1].latest);
        let ids: Vec<&str> = years[0].entities.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(years[0].primary().map(|x| x.id.as_str()), Some("1"));
    }

    #[test]
    fn test_newest_first_is_stable() {
        let schema = DomainSchema::club_news();
        let e = normalize_all(
            vec![
                json!({"id": "a", "date": "2024-01-01"}),
                json!({"id": "b", "date": "2024-02-01"}),
                json!({"id": "c", "date": "2024-01-01"}),
                json!({"id": "d"}),
            ],
            &schema,
        );
        let GroupedView::Flat(items) = arrange(e.iter().collect(), &schema, at("2024-03-01 00:00")) else {
            panic!("news is flat");
        };
        let ids: Vec<&str> = items.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_rank_sort_puts_unknown_roles_last() {
        let schema = DomainSchema::core_team();
        let e = normalize_all(
            vec![
                json!({"id": 1, "role": "Mascot"}),
                json!({"id": 2, "role": "Treasurer"}),
                json!({"id": 3, "role": "President"}),
            ],
            &schema,
        );
        let GroupedView::Flat(items) = arrange(e.iter().collect(), &schema, at("2024-03-01 00:00")) else {
            panic!("core team is flat");
        };
        let ids: Vec<&str> = items.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_featured_events_skip_past_and_sort_soonest() {
        let (schema, e) = events(vec![
            json!({"id": 1, "featured": true, "date": "2024-05-01"}),
            json!({"id": 2, "featured": true, "date": "2024-01-01"}),
            json!({"id": 3, "featured": true, "date": "2024-04-01"}),
            json!({"id": 4, "featured": false, "date": "2024-04-02"}),
        ]);
        let f = featured(&e, &schema, Some(3), at("2024-03-01 00:00"));
        let ids: Vec<&str> = f.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_featured_achievements_newest_year_first() {
        let schema = DomainSchema::achievements();
        let e = normalize_all(
            vec![
                json!({"id": 1, "featured": true, "year": 2021}),
                json!({"id": 2, "featured": true, "year": 2023}),
                json!({"id": 3, "year": 2024}),
            ],
            &schema,
        );
        let f = featured(&e, &schema, None, at("2024-03-01 00:00"));
        let ids: Vec<&str> = f.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_countdown() {
        let c = countdown(at("2024-03-02 01:30"), at("2024-03-01 00:00")).unwrap();
        assert_eq!(c, Countdown { days: 1, hours: 1, minutes: 30, seconds: 0 });
        assert!(countdown(at("2024-03-01 00:00"), at("2024-03-01 00:00")).is_none());
    }
}
