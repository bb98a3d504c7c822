//! Filter/Search Engine.
//!
//! `filter` is a pure function of (collection, schema, state, now): facets and
//! search text combine with AND, and the output is the input restricted to
//! matches in the same relative order.

use chrono::{Duration, Months, NaiveDateTime};
use std::collections::BTreeMap;

use crate::arrange::{classify, Bucket};
use crate::logging::log_filter;
use crate::model::Entity;
use crate::schema::{Arrangement, DomainSchema, Facet, FacetKind, FacetScope, SearchField, ALL};

pub const DATE_WINDOWS: &[&str] = &["today", "tomorrow", "week", "month"];

/// Active facet selections and search text for one page instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    facets: BTreeMap<String, String>,
    search: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selecting the "all" sentinel clears the facet.
    pub fn set_facet(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            self.facets.remove(name);
        } else {
            self.facets.insert(name.to_string(), value.to_string());
        }
    }

    pub fn facet(&self, name: &str) -> &str {
        self.facets.get(name).map(String::as_str).unwrap_or(ALL)
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn reset(&mut self) {
        self.facets.clear();
        self.search.clear();
    }

    pub fn is_default(&self) -> bool {
        self.facets.is_empty() && self.search.is_empty()
    }
}

/// Primary-scope filter: every facet that narrows the main grid.
pub fn filter<'a>(
    entities: &'a [Entity],
    schema: &DomainSchema,
    state: &FilterState,
    now: NaiveDateTime,
) -> Vec<&'a Entity> {
    filter_scoped(entities, schema, state, now, FacetScope::Primary)
}

/// Filter with only the facets of `scope` applied. Search applies in every scope.
pub fn filter_scoped<'a>(
    entities: &'a [Entity],
    schema: &DomainSchema,
    state: &FilterState,
    now: NaiveDateTime,
    scope: FacetScope,
) -> Vec<&'a Entity> {
    let active: Vec<(&Facet, &str)> = schema
        .facets
        .iter()
        .filter(|f| f.scope == scope)
        .map(|f| (f, state.facet(f.name)))
        .filter(|(_, v)| *v != ALL)
        .collect();

    let out: Vec<&Entity> = entities
        .iter()
        .filter(|e| active.iter().all(|(f, v)| facet_matches(e, f.kind, v, now)))
        .filter(|e| search_matches(e, schema, state.search()))
        .collect();

    log_filter(schema.name, entities.len(), out.len(), state.search());
    out
}

pub fn facet_matches(entity: &Entity, kind: FacetKind, value: &str, now: NaiveDateTime) -> bool {
    match kind {
        FacetKind::Category => entity.category == value,
        FacetKind::Field(field) => entity.list(field).iter().any(|v| v == value),
        FacetKind::DateWindow => match entity.schedule {
            Some(s) => in_window(s.start, value, now),
            None => false,
        },
    }
}

fn in_window(start: NaiveDateTime, window: &str, now: NaiveDateTime) -> bool {
    match window {
        "today" => start.date() == now.date(),
        "tomorrow" => Some(start.date()) == now.date().succ_opt(),
        "week" => start >= now && start <= now + Duration::days(7),
        "month" => match now.checked_add_months(Months::new(1)) {
            Some(limit) => start >= now && start <= limit,
            None => start >= now,
        },
        _ => true,
    }
}

/// Case-insensitive substring match against any searchable field. `needle`
/// is expected lower-cased; empty matches everything.
pub fn search_matches(entity: &Entity, schema: &DomainSchema, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    schema.search.iter().any(|field| match field {
        SearchField::Field(name) => entity
            .list(name)
            .iter()
            .any(|v| v.to_lowercase().contains(needle)),
        SearchField::CategoryLabel => schema
            .category_label(&entity.category)
            .to_lowercase()
            .contains(needle),
    })
}

/// Distinct values of `field` in first-appearance order.
pub fn facet_options(entities: &[Entity], field: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for e in entities {
        for v in e.list(field) {
            if !v.is_empty() && !out.contains(&v) {
                out.push(v);
            }
        }
    }
    out
}

/// Selectable values for a facet: declared categories first, then anything
/// else the collection carries.
pub fn options_for(entities: &[Entity], schema: &DomainSchema, facet: &Facet) -> Vec<String> {
    match facet.kind {
        FacetKind::Category => {
            let mut out: Vec<String> = schema.categories.iter().map(|c| c.key.to_string()).collect();
            for e in entities {
                if !e.category.is_empty() && !out.contains(&e.category) {
                    out.push(e.category.clone());
                }
            }
            out
        }
        FacetKind::Field(field) => facet_options(entities, field),
        FacetKind::DateWindow => DATE_WINDOWS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Match count per option of `facet_name`, as if that option were selected
/// with every other selection and the search kept. The first entry is "all".
pub fn facet_counts(
    entities: &[Entity],
    schema: &DomainSchema,
    facet_name: &str,
    state: &FilterState,
    now: NaiveDateTime,
) -> Vec<(String, usize)> {
    let Some(facet) = schema.facet(facet_name) else {
        return Vec::new();
    };
    // Temporal pages: primary facets feed upcoming + ongoing, past facets
    // feed the past bucket, so counts only cover that slice.
    let temporal = matches!(schema.arrangement, Arrangement::Temporal(_));
    let in_scope = |e: &Entity| {
        if !temporal {
            return true;
        }
        let past = classify(e.schedule.as_ref(), now) == Bucket::Past;
        match facet.scope {
            FacetScope::Primary => !past,
            FacetScope::Past => past,
        }
    };
    let count_with = |value: &str| {
        let mut selected = state.clone();
        selected.set_facet(facet_name, value);
        filter_scoped(entities, schema, &selected, now, facet.scope)
            .into_iter()
            .filter(|e| in_scope(e))
            .count()
    };

    let mut out = vec![(ALL.to_string(), count_with(ALL))];
    for option in options_for(entities, schema, facet) {
        let n = count_with(&option);
        out.push((option, n));
    }
    out
}
