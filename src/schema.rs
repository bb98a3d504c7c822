//! Declarative per-domain configuration.
//!
//! Each content page is one `DomainSchema`: where its records live, which
//! facets and fields drive filtering, the declared category order and how the
//! filtered subset is arranged. The pipeline itself has no per-page code paths
//! beyond the `EntityKind` dispatch used for detail payloads and cards.

use crate::config::TemporalCaps;
use crate::loader::samples;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Achievement,
    Event,
    News,
    Project,
    Member,
}

/// Where the records sit inside the parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    /// `{ key: [...] }`
    List(&'static str),
    /// `{ key: { inner: [...] } }`
    Nested(&'static str, &'static str),
    /// `{ key: { group: [...], ... } }`, flattened with the group key written
    /// into each record under the second field name.
    Grouped(&'static str, &'static str),
}

impl CollectionShape {
    pub fn key(&self) -> &'static str {
        match self {
            CollectionShape::List(k) | CollectionShape::Nested(k, _) | CollectionShape::Grouped(k, _) => k,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// Equality on the entity's category key.
    Category,
    /// Equality on the text of an arbitrary field.
    Field(&'static str),
    /// Start-time window relative to now: today, tomorrow, week, month.
    DateWindow,
}

/// Which slice of a temporal page a facet narrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetScope {
    Primary,
    Past,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub name: &'static str,
    pub kind: FacetKind,
    pub scope: FacetScope,
}

impl Facet {
    pub const fn primary(name: &'static str, kind: FacetKind) -> Self {
        Self { name, kind, scope: FacetScope::Primary }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Field(&'static str),
    CategoryLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDef {
    pub key: &'static str,
    /// Short badge label.
    pub label: &'static str,
    /// Section heading in grouped grids.
    pub section_title: &'static str,
}

const fn cat(key: &'static str, label: &'static str, section_title: &'static str) -> CategoryDef {
    CategoryDef { key, label, section_title }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep collection order.
    Collection,
    /// Most recent date (or year) first; ties keep collection order.
    NewestFirst,
    /// Explicit rank table over a field; unranked values go last.
    Rank {
        field: &'static str,
        ranks: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    ByCategory,
    Temporal(TemporalCaps),
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Show an inline error state.
    ErrorState,
    /// Substitute the built-in sample document.
    Sample(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainSchema {
    pub name: &'static str,
    pub document: &'static str,
    pub shape: CollectionShape,
    pub kind: EntityKind,
    pub category_field: &'static str,
    pub title_field: &'static str,
    pub facets: Vec<Facet>,
    pub search: Vec<SearchField>,
    pub categories: Vec<CategoryDef>,
    pub sort: SortOrder,
    pub arrangement: Arrangement,
    /// Build the year-bucketed showcase from `timeline: true` records.
    pub timeline: bool,
    /// Render a featured strip independent of the grid filters.
    pub featured: bool,
    /// List fields defaulted to `[]` when absent.
    pub list_defaults: &'static [&'static str],
    pub recovery: Recovery,
    pub empty_noun: &'static str,
}

pub const ALL: &str = "all";

const CORE_ROLE_ORDER: &[&str] = &[
    "President",
    "Vice President",
    "Technical Coordinator",
    "Treasurer",
    "PR & Outreach Coordinator",
    "Events Coordinator",
];

impl DomainSchema {
    pub fn achievements() -> Self {
        Self {
            name: "achievements",
            document: "achievements.json",
            shape: CollectionShape::List("achievements"),
            kind: EntityKind::Achievement,
            category_field: "category",
            title_field: "name",
            facets: vec![Facet::primary("category", FacetKind::Category)],
            search: vec![
                SearchField::Field("name"),
                SearchField::Field("achievement"),
                SearchField::Field("description"),
                SearchField::Field("team_members"),
                SearchField::CategoryLabel,
            ],
            categories: vec![
                cat("competition", "Competition", "Competition Wins"),
                cat("research", "Research", "Research Publications"),
                cat("innovation", "Innovation", "Innovations & Patents"),
                cat("grants_awards", "Grant/Award", "Grants & Awards"),
            ],
            sort: SortOrder::Collection,
            arrangement: Arrangement::ByCategory,
            timeline: true,
            featured: true,
            list_defaults: &["team_members"],
            recovery: Recovery::Sample(samples::ACHIEVEMENTS),
            empty_noun: "achievements",
        }
    }

    pub fn events(caps: TemporalCaps) -> Self {
        Self {
            name: "events",
            document: "events.json",
            shape: CollectionShape::List("events"),
            kind: EntityKind::Event,
            category_field: "category",
            title_field: "title",
            facets: vec![
                Facet::primary("category", FacetKind::Category),
                Facet::primary("date", FacetKind::DateWindow),
                Facet {
                    name: "past_category",
                    kind: FacetKind::Category,
                    scope: FacetScope::Past,
                },
            ],
            search: vec![
                SearchField::Field("title"),
                SearchField::Field("brief"),
                SearchField::Field("venue"),
                SearchField::Field("organizer"),
                SearchField::CategoryLabel,
            ],
            categories: vec![
                cat("workshop", "Workshop", "Workshops"),
                cat("hackathon", "Hackathon", "Hackathons"),
                cat("competition", "Competition", "Competitions"),
                cat("seminar", "Seminar", "Seminars"),
                cat("exhibition", "Exhibition", "Exhibitions"),
            ],
            sort: SortOrder::Collection,
            arrangement: Arrangement::Temporal(caps),
            timeline: false,
            featured: true,
            list_defaults: &[],
            recovery: Recovery::ErrorState,
            empty_noun: "events",
        }
    }

    pub fn club_news() -> Self {
        Self {
            name: "club_news",
            document: "news.json",
            shape: CollectionShape::List("clubNews"),
            kind: EntityKind::News,
            category_field: "type",
            title_field: "title",
            facets: vec![Facet::primary("type", FacetKind::Category)],
            search: vec![
                SearchField::Field("title"),
                SearchField::Field("summary"),
                SearchField::Field("tags"),
                SearchField::CategoryLabel,
            ],
            categories: vec![
                cat("announcement", "Announcement", "Announcements"),
                cat("meeting", "Meeting", "Meetings"),
                cat("update", "Update", "Updates"),
            ],
            sort: SortOrder::NewestFirst,
            arrangement: Arrangement::Flat,
            timeline: false,
            featured: false,
            list_defaults: &["tags"],
            recovery: Recovery::Sample(samples::NEWS),
            empty_noun: "club news",
        }
    }

    pub fn industry_news() -> Self {
        Self {
            name: "industry_news",
            document: "news.json",
            shape: CollectionShape::List("industryNews"),
            kind: EntityKind::News,
            category_field: "category",
            title_field: "title",
            facets: vec![Facet::primary("source", FacetKind::Field("source"))],
            search: vec![
                SearchField::Field("title"),
                SearchField::Field("summary"),
                SearchField::Field("source"),
                SearchField::Field("tags"),
            ],
            categories: Vec::new(),
            sort: SortOrder::NewestFirst,
            arrangement: Arrangement::Flat,
            timeline: false,
            featured: false,
            list_defaults: &["tags"],
            recovery: Recovery::Sample(samples::NEWS),
            empty_noun: "industry news",
        }
    }

    pub fn projects() -> Self {
        Self {
            name: "projects",
            document: "projects.json",
            shape: CollectionShape::List("projects"),
            kind: EntityKind::Project,
            category_field: "type",
            title_field: "title",
            facets: vec![
                Facet::primary("year", FacetKind::Field("year")),
                Facet::primary("type", FacetKind::Category),
            ],
            search: vec![
                SearchField::Field("title"),
                SearchField::Field("shortDescription"),
                SearchField::Field("technologies"),
                SearchField::Field("team"),
            ],
            categories: Vec::new(),
            sort: SortOrder::Collection,
            arrangement: Arrangement::Flat,
            timeline: false,
            featured: false,
            list_defaults: &["technologies", "tools", "team", "achievements", "images"],
            recovery: Recovery::Sample(samples::PROJECTS),
            empty_noun: "projects",
        }
    }

    pub fn team_members() -> Self {
        Self {
            name: "team_members",
            document: "team.json",
            shape: CollectionShape::Grouped("teamMembers", "specialization"),
            kind: EntityKind::Member,
            category_field: "specialization",
            title_field: "name",
            facets: vec![Facet::primary("specialization", FacetKind::Category)],
            search: vec![
                SearchField::Field("name"),
                SearchField::Field("role"),
                SearchField::Field("department"),
                SearchField::Field("skills"),
                SearchField::CategoryLabel,
            ],
            categories: vec![
                cat("hardware", "Hardware", "Hardware"),
                cat("software", "Software", "Software"),
                cat("aiMl", "AI & ML", "AI & ML"),
                cat("web", "Web Development", "Web Dev"),
                cat("design", "Design", "Design"),
            ],
            sort: SortOrder::Collection,
            arrangement: Arrangement::ByCategory,
            timeline: false,
            featured: false,
            list_defaults: &["skills"],
            recovery: Recovery::ErrorState,
            empty_noun: "team members",
        }
    }

    pub fn core_team() -> Self {
        Self {
            name: "core_team",
            document: "team.json",
            shape: CollectionShape::Nested("coreTeam", "members"),
            kind: EntityKind::Member,
            category_field: "role",
            title_field: "name",
            facets: Vec::new(),
            search: Vec::new(),
            categories: Vec::new(),
            sort: SortOrder::Rank {
                field: "role",
                ranks: CORE_ROLE_ORDER,
            },
            arrangement: Arrangement::Flat,
            timeline: false,
            featured: false,
            list_defaults: &["responsibilities"],
            recovery: Recovery::ErrorState,
            empty_noun: "core team",
        }
    }

    pub fn faculty() -> Self {
        Self {
            name: "faculty",
            document: "team.json",
            shape: CollectionShape::List("facultyAdvisors"),
            kind: EntityKind::Member,
            category_field: "designation",
            title_field: "name",
            facets: Vec::new(),
            search: Vec::new(),
            categories: Vec::new(),
            sort: SortOrder::Collection,
            arrangement: Arrangement::Flat,
            timeline: false,
            featured: false,
            list_defaults: &[],
            recovery: Recovery::ErrorState,
            empty_noun: "faculty advisors",
        }
    }

    pub fn alumni() -> Self {
        Self {
            name: "alumni",
            document: "team.json",
            shape: CollectionShape::List("alumni"),
            kind: EntityKind::Member,
            category_field: "role",
            title_field: "name",
            facets: Vec::new(),
            search: vec![
                SearchField::Field("name"),
                SearchField::Field("role"),
                SearchField::Field("company"),
            ],
            categories: Vec::new(),
            sort: SortOrder::NewestFirst,
            arrangement: Arrangement::Flat,
            timeline: false,
            featured: false,
            list_defaults: &[],
            recovery: Recovery::ErrorState,
            empty_noun: "alumni",
        }
    }

    /// Every schema the site renders, in page order.
    pub fn all(caps: TemporalCaps) -> Vec<Self> {
        vec![
            Self::achievements(),
            Self::events(caps),
            Self::club_news(),
            Self::industry_news(),
            Self::projects(),
            Self::faculty(),
            Self::core_team(),
            Self::team_members(),
            Self::alumni(),
        ]
    }

    pub fn by_name(name: &str, caps: TemporalCaps) -> Option<Self> {
        Self::all(caps).into_iter().find(|s| s.name == name)
    }

    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    pub fn category(&self, key: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Badge label for a category key; undeclared keys are title-cased.
    pub fn category_label(&self, key: &str) -> String {
        match self.category(key) {
            Some(def) => def.label.to_string(),
            None => humanize(key),
        }
    }

    pub fn section_title(&self, key: &str) -> String {
        match self.category(key) {
            Some(def) => def.section_title.to_string(),
            None => humanize(key),
        }
    }
}

/// `grants_awards` -> "Grants Awards", `aiMl` -> "Ai Ml", `ai-ml` -> "Ai Ml".
pub fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(ch);
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("grants_awards"), "Grants Awards");
        assert_eq!(humanize("aiMl"), "Ai Ml");
        assert_eq!(humanize("ai-ml"), "Ai Ml");
        assert_eq!(humanize("robotics"), "Robotics");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_category_label_prefers_declared() {
        let s = DomainSchema::team_members();
        assert_eq!(s.category_label("aiMl"), "AI & ML");
        assert_eq!(s.category_label("mechanicalDesign"), "Mechanical Design");
    }

    #[test]
    fn test_by_name_finds_every_schema() {
        let caps = TemporalCaps::default();
        for schema in DomainSchema::all(caps) {
            let found = DomainSchema::by_name(schema.name, caps).unwrap();
            assert_eq!(found.name, schema.name);
        }
        assert!(DomainSchema::by_name("nope", caps).is_none());
    }
}
