//! Filter UI Controller.
//!
//! One `PageController` per page instance. It owns the loaded collection,
//! the active filters and the shell, and re-renders the affected containers
//! synchronously after every state change. Loading is the only await point.

use chrono::{Local, NaiveDateTime};
use serde_json::json;

use crate::arrange::{arrange, featured, timeline, Bucket, TemporalView};
use crate::detail::{find, DetailView, Dismiss};
use crate::filter::{facet_counts, filter, filter_scoped, FilterState};
use crate::loader::{load_collection, Loaded, Source};
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::model::{Entity, EntityId};
use crate::render::{
    render_bucket, render_detail, render_error, render_facet, render_featured, render_timeline,
    render_view, Fragment, RenderCtx, Shell,
};
use crate::schema::{Arrangement, DomainSchema, FacetScope};

pub const GRID: &str = "grid";
pub const UPCOMING: &str = "upcoming";
pub const ONGOING: &str = "ongoing";
pub const PAST: &str = "past";
pub const FEATURED: &str = "featured";
pub const TIMELINE: &str = "timeline";
pub const FACETS: &str = "facets";
pub const DETAIL: &str = "detail";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(t) => *t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Ready,
    /// Loading failed; built-in samples are shown.
    Sample(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PageState {
    pub collection: Vec<Entity>,
    pub filters: FilterState,
    pub status: LoadStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered { registered: u32 },
    FullyBooked,
    /// The event does not take registrations.
    Closed,
    NotFound,
}

/// Containers a page declares, derived from its schema.
pub fn containers_for(schema: &DomainSchema) -> Vec<&'static str> {
    let mut names = match schema.arrangement {
        Arrangement::Temporal(_) => vec![UPCOMING, ONGOING, PAST],
        _ => vec![GRID],
    };
    if schema.featured {
        names.push(FEATURED);
    }
    if schema.timeline {
        names.push(TIMELINE);
    }
    if !schema.facets.is_empty() {
        names.push(FACETS);
    }
    names.push(DETAIL);
    names
}

pub struct PageController {
    schema: DomainSchema,
    state: PageState,
    clock: Clock,
    shell: Shell,
    detail: DetailView,
    featured_cap: usize,
    generation: u64,
}

impl PageController {
    pub fn new(schema: DomainSchema, clock: Clock, featured_cap: usize) -> Self {
        let shell = Shell::new(schema.name, &containers_for(&schema));
        Self::with_shell(schema, clock, featured_cap, shell)
    }

    /// Use a shell supplied by the caller; containers it lacks are skipped.
    pub fn with_shell(schema: DomainSchema, clock: Clock, featured_cap: usize, shell: Shell) -> Self {
        Self {
            schema,
            state: PageState {
                collection: Vec::new(),
                filters: FilterState::new(),
                status: LoadStatus::Pending,
            },
            clock,
            shell,
            detail: DetailView::new(),
            featured_cap,
            generation: 0,
        }
    }

    pub fn schema(&self) -> &DomainSchema {
        &self.schema
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn container(&self, name: &str) -> Option<&Fragment> {
        self.shell.get(name)
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Token for a load about to start.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The user left the page; loads started before this are discarded.
    pub fn begin_navigation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub async fn initialize(&mut self, source: &dyn Source) -> bool {
        let generation = self.generation;
        let loaded = load_collection(source, &self.schema).await;
        self.apply_load(generation, loaded)
    }

    /// Install a completed load if it still belongs to the current view.
    pub fn apply_load(&mut self, generation: u64, loaded: Loaded) -> bool {
        if generation != self.generation {
            log(
                Level::Debug,
                Domain::Load,
                "stale_load_dropped",
                obj(&[
                    ("page", v_str(self.schema.name)),
                    ("generation", json!(generation)),
                    ("current", json!(self.generation)),
                ]),
            );
            return false;
        }

        self.state.status = match &loaded {
            Loaded::Fresh(_) => LoadStatus::Ready,
            Loaded::Sample(_, err) => LoadStatus::Sample(err.to_string()),
            Loaded::Failed(err) => LoadStatus::Failed(err.to_string()),
        };
        let (entities, _) = loaded.into_parts();
        self.state.collection = entities;
        self.render_all();
        true
    }

    // =========================================================================
    // User actions
    // =========================================================================

    pub fn select(&mut self, facet: &str, value: &str) {
        self.state.filters.set_facet(facet, value);
        self.render_filtered();
    }

    pub fn search(&mut self, text: &str) {
        self.state.filters.set_search(text);
        self.render_filtered();
    }

    pub fn reset(&mut self) {
        self.state.filters.reset();
        self.render_filtered();
    }

    /// Open the detail view for `id`; unknown ids leave everything as is.
    pub fn open_detail(&mut self, id: &str) -> bool {
        let id = EntityId::new(id);
        let fragment = match self.detail.open(self.schema.name, &self.state.collection, &id) {
            Some(entity) => render_detail(entity, &self.schema),
            None => return false,
        };
        self.shell.replace(DETAIL, fragment);
        true
    }

    pub fn close_detail(&mut self, reason: Dismiss) -> bool {
        if !self.detail.close(self.schema.name, reason) {
            return false;
        }
        self.shell.replace(DETAIL, Fragment::default());
        true
    }

    /// Register interest in an event. The count lives in memory only.
    pub fn register(&mut self, id: &str) -> RegisterOutcome {
        let id = EntityId::new(id);
        let Some(entity) = self.state.collection.iter_mut().find(|e| e.id == id) else {
            return RegisterOutcome::NotFound;
        };
        let Some(reg) = entity.registration.as_mut() else {
            return RegisterOutcome::Closed;
        };
        if reg.is_full() {
            return RegisterOutcome::FullyBooked;
        }
        reg.registered += 1;
        let registered = reg.registered;
        if let Some(v) = entity.fields.get_mut("registered") {
            *v = json!(registered);
        }

        log(
            Level::Info,
            Domain::Form,
            "registration",
            obj(&[
                ("page", v_str(self.schema.name)),
                ("id", v_str(id.as_str())),
                ("registered", json!(registered)),
            ]),
        );

        self.render_grid();
        self.render_featured();
        if self.detail.current() == Some(&id) {
            if let Ok(entity) = find(&self.state.collection, &id) {
                let fragment = render_detail(entity, &self.schema);
                self.shell.replace(DETAIL, fragment);
            }
        }
        RegisterOutcome::Registered { registered }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn ctx(&self) -> RenderCtx {
        RenderCtx {
            source_empty: self.state.collection.is_empty(),
            filters_active: !self.state.filters.is_default(),
            now: self.clock.now(),
        }
    }

    fn failure(&self) -> Option<&str> {
        match &self.state.status {
            LoadStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn render_all(&mut self) {
        self.render_filtered();
        self.render_featured();
        self.render_timeline();
    }

    fn render_filtered(&mut self) {
        self.render_grid();
        self.render_facets();
    }

    fn render_grid(&mut self) {
        let grid_names: &[&str] = match self.schema.arrangement {
            Arrangement::Temporal(_) => &[UPCOMING, ONGOING, PAST],
            _ => &[GRID],
        };
        if let Some(msg) = self.failure() {
            let fragment = render_error(msg);
            for name in grid_names {
                self.shell.replace(name, fragment.clone());
            }
            return;
        }

        let ctx = self.ctx();
        let all = &self.state.collection;
        let filters = &self.state.filters;
        let mut out: Vec<(&str, Fragment)> = Vec::new();
        match self.schema.arrangement {
            Arrangement::Temporal(caps) => {
                let primary = filter(all, &self.schema, filters, ctx.now);
                let past = filter_scoped(all, &self.schema, filters, ctx.now, FacetScope::Past);
                let view = TemporalView::partition(&primary, caps, ctx.now).with_past(&past, ctx.now);
                for (name, bucket) in [(UPCOMING, Bucket::Upcoming), (ONGOING, Bucket::Ongoing), (PAST, Bucket::Past)] {
                    out.push((name, render_bucket(&view, bucket, &self.schema, &ctx)));
                }
            }
            _ => {
                let subset = filter(all, &self.schema, filters, ctx.now);
                let view = arrange(subset, &self.schema, ctx.now);
                out.push((GRID, render_view(&view, &self.schema, &ctx)));
            }
        }
        for (name, fragment) in out {
            self.shell.replace(name, fragment);
        }
    }

    fn render_facets(&mut self) {
        if self.schema.facets.is_empty() || self.failure().is_some() {
            return;
        }
        let now = self.clock.now();
        let mut combined = String::new();
        for facet in &self.schema.facets {
            let counts = facet_counts(&self.state.collection, &self.schema, facet.name, &self.state.filters, now);
            let selected = self.state.filters.facet(facet.name);
            combined.push_str(render_facet(facet, &counts, selected, &self.schema).as_str());
        }
        self.shell.replace(FACETS, Fragment::from(combined));
    }

    fn render_featured(&mut self) {
        if !self.schema.featured {
            return;
        }
        let ctx = self.ctx();
        let cap = match self.schema.arrangement {
            Arrangement::Temporal(_) => Some(self.featured_cap),
            _ => None,
        };
        let items = featured(&self.state.collection, &self.schema, cap, ctx.now);
        let fragment = render_featured(&items, &self.schema, &ctx);
        self.shell.replace(FEATURED, fragment);
    }

    fn render_timeline(&mut self) {
        if !self.schema.timeline {
            return;
        }
        let years = timeline(&self.state.collection);
        let fragment = render_timeline(&years, &self.schema);
        self.shell.replace(TIMELINE, fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemporalCaps;
    use crate::loader::MemorySource;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    const ACHIEVEMENTS: &str = r#"{"achievements": [
        {"id": 1, "category": "competition", "name": "Line Follower Cup", "year": 2023, "timeline": true,
         "team_members": ["Asha"]},
        {"id": 2, "category": "research", "name": "Swarm Paper", "year": 2023, "timeline": false}
    ]}"#;

    async fn achievements_page() -> PageController {
        let src = MemorySource::new().with("achievements.json", ACHIEVEMENTS);
        let mut page = PageController::new(DomainSchema::achievements(), Clock::Fixed(at("2024-03-10 12:00")), 3);
        assert!(page.initialize(&src).await);
        page
    }

    #[tokio::test]
    async fn test_filter_and_timeline_are_independent() {
        let mut page = achievements_page().await;
        page.select("category", "research");
        let grid = page.container(GRID).unwrap();
        assert!(grid.contains("Swarm Paper"));
        assert!(!grid.contains("Line Follower Cup"));

        let tl = page.container(TIMELINE).unwrap();
        assert!(tl.contains("Line Follower Cup"));
        assert!(!tl.contains("Swarm Paper"));
        assert!(tl.contains("data-year=\"2023\""));
    }

    #[tokio::test]
    async fn test_search_without_matches_shows_no_matches_state() {
        let mut page = achievements_page().await;
        page.search("vision");
        let grid = page.container(GRID).unwrap();
        assert!(grid.contains("no-matches"));

        let empty_src = MemorySource::new().with("achievements.json", r#"{"achievements": []}"#);
        let mut empty = PageController::new(DomainSchema::achievements(), Clock::Fixed(at("2024-03-10 12:00")), 3);
        empty.initialize(&empty_src).await;
        let grid = empty.container(GRID).unwrap();
        assert!(grid.contains("no-data"));
        assert!(!grid.contains("no-matches"));
    }

    #[tokio::test]
    async fn test_detail_ignores_filters_and_misses_are_noops() {
        let mut page = achievements_page().await;
        page.select("category", "research");
        assert!(page.open_detail("1"));
        assert!(page.container(DETAIL).unwrap().contains("Line Follower Cup"));

        let before = page.container(DETAIL).cloned();
        assert!(!page.open_detail("404"));
        assert_eq!(page.container(DETAIL).cloned(), before);

        assert!(page.close_detail(Dismiss::CloseButton));
        assert!(!page.close_detail(Dismiss::Escape));
        assert!(page.container(DETAIL).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registration_respects_capacity() {
        let doc = r#"{"events": [
            {"id": 1, "title": "Full House", "date": "2024-04-01", "registered": 40, "capacity": 40},
            {"id": 2, "title": "Open Lab", "date": "2024-04-02", "registered": 10, "capacity": 40, "featured": true},
            {"id": 3, "title": "Drop In", "date": "2024-04-03"}
        ]}"#;
        let src = MemorySource::new().with("events.json", doc);
        let mut page = PageController::new(
            DomainSchema::events(TemporalCaps::default()),
            Clock::Fixed(at("2024-03-10 12:00")),
            3,
        );
        page.initialize(&src).await;

        assert_eq!(page.register("1"), RegisterOutcome::FullyBooked);
        assert_eq!(page.state().collection[0].registration.map(|r| r.registered), Some(40));

        assert_eq!(page.register("2"), RegisterOutcome::Registered { registered: 11 });
        assert!(page.container(UPCOMING).unwrap().contains("11/40 Registered"));
        assert!(page.container(FEATURED).unwrap().contains("11/40 Registered"));

        assert_eq!(page.register("3"), RegisterOutcome::Closed);
        assert_eq!(page.register("9"), RegisterOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_stale_load_is_dropped() {
        let src = MemorySource::new().with("achievements.json", ACHIEVEMENTS);
        let mut page = PageController::new(DomainSchema::achievements(), Clock::Fixed(at("2024-03-10 12:00")), 3);
        let ticket = page.generation();
        let loaded = load_collection(&src, page.schema()).await;
        page.begin_navigation();
        assert!(!page.apply_load(ticket, loaded));
        assert_eq!(page.state().status, LoadStatus::Pending);
        assert!(page.container(GRID).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_renders_error_state() {
        let mut page = PageController::new(
            DomainSchema::events(TemporalCaps::default()),
            Clock::Fixed(at("2024-03-10 12:00")),
            3,
        );
        page.initialize(&MemorySource::new()).await;
        assert!(matches!(page.state().status, LoadStatus::Failed(_)));
        assert!(page.container(UPCOMING).unwrap().contains("error-state"));
    }

    #[tokio::test]
    async fn test_missing_mount_point_is_tolerated() {
        let src = MemorySource::new().with("achievements.json", ACHIEVEMENTS);
        let shell = Shell::new("achievements", &[GRID]);
        let mut page = PageController::with_shell(
            DomainSchema::achievements(),
            Clock::Fixed(at("2024-03-10 12:00")),
            3,
            shell,
        );
        assert!(page.initialize(&src).await);
        assert!(page.container(TIMELINE).is_none());
        assert!(page.open_detail("1"));
        assert!(page.container(DETAIL).is_none());
    }

    #[tokio::test]
    async fn test_facet_counts_rendered() {
        let mut page = achievements_page().await;
        page.search("swarm");
        let facets = page.container(FACETS).unwrap();
        assert!(facets.contains("data-value=\"research\""));
        assert!(facets.contains("Research <span class=\"count\">1</span>"));
        assert!(facets.contains("Competition <span class=\"count\">0</span>"));
    }
}
