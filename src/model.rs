//! Normalized entity records shared by every content domain.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Stable identifier; documents use both numeric and string ids, so the
/// canonical form is the id's text (`7` and `"7"` are the same entity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self::new(s.as_str())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Start/end instants of a time-bound entity (events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Set when the record is explicitly marked `status: "past"`.
    pub past_override: bool,
}

/// Interest registration counter. Lives only in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub registered: u32,
    pub capacity: u32,
}

impl Registration {
    pub fn is_full(&self) -> bool {
        self.registered >= self.capacity
    }

    /// Fill percentage for progress bars, clamped to 0..=100.
    pub fn percent(&self) -> f64 {
        if self.capacity == 0 {
            return 100.0;
        }
        (self.registered as f64 / self.capacity as f64 * 100.0).clamp(0.0, 100.0)
    }
}

// =============================================================================
// Category-shaped detail payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompetitionDetail {
    pub competition_name: String,
    pub organizer: String,
    pub location: String,
    pub prize: String,
    pub highlights: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResearchDetail {
    pub journal_name: String,
    pub impact_factor: Option<f64>,
    pub doi: Option<String>,
    pub citation_count: Option<u64>,
    pub highlights: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EventDetail {
    pub description: String,
    pub brief: String,
    pub venue: String,
    pub organizer: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectDetail {
    pub short_description: String,
    pub long_description: String,
    pub status: String,
    pub duration: String,
    pub thumbnail: String,
    pub technologies: Vec<String>,
    pub tools: Vec<String>,
    pub team: Vec<String>,
    pub achievements: Vec<String>,
    pub images: Vec<String>,
    pub github: Option<String>,
    pub demo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsDetail {
    pub summary: String,
    pub content: String,
    pub author: Option<String>,
    pub source: Option<String>,
    pub read_more_link: Option<String>,
    pub important: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemberDetail {
    pub role: String,
    pub designation: String,
    pub department: String,
    pub year: Option<Value>,
    pub photo: String,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub research_gate: Option<String>,
    pub message: Option<String>,
    pub quote: Option<String>,
    pub skills: Vec<String>,
    pub responsibilities: Vec<String>,
}

/// One variant per category-shaped payload; `Generic` lists whatever keys the
/// record carried when no dedicated shape applies.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Competition(CompetitionDetail),
    Research(ResearchDetail),
    Event(EventDetail),
    Project(ProjectDetail),
    News(NewsDetail),
    Member(MemberDetail),
    Generic(Vec<(String, DetailValue)>),
}

impl Default for Detail {
    fn default() -> Self {
        Detail::Generic(Vec::new())
    }
}

// =============================================================================
// Entity
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Category / type / specialization key, depending on the domain.
    pub category: String,
    pub title: String,
    pub year: Option<i32>,
    pub date: Option<NaiveDate>,
    pub featured: bool,
    pub timeline: bool,
    pub schedule: Option<Schedule>,
    pub registration: Option<Registration>,
    pub detail: Detail,
    /// The full source record, unknown keys included.
    pub fields: Map<String, Value>,
}

impl Entity {
    /// Scalar field as text; numbers and booleans are stringified.
    pub fn text(&self, field: &str) -> Option<String> {
        value_text(self.fields.get(field)?)
    }

    /// Scalar field as text, empty when absent.
    pub fn text_or_empty(&self, field: &str) -> String {
        self.text(field).unwrap_or_default()
    }

    /// List field; a scalar is treated as a one-element list.
    pub fn list(&self, field: &str) -> Vec<String> {
        match self.fields.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
            Some(other) => value_text(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Most recent first sort key: explicit date, else January 1st of `year`.
    pub fn recency(&self) -> Option<NaiveDate> {
        self.date
            .or_else(|| self.year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)))
    }
}

pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
