//! Entity Normalizer: raw JSON records -> `Entity`.
//!
//! Absent optional fields get defaults so later stages never distinguish
//! "missing" from "empty". Present-but-odd values are passed through; a
//! detail payload that does not fit its category's shape is kept as a
//! generic key/value listing instead of being rejected.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::logging::{log, obj, v_str, Domain, Level};
use crate::model::{
    value_text, Detail, DetailValue, Entity, EntityId, EventDetail, MemberDetail, NewsDetail,
    ProjectDetail, Registration, Schedule,
};
use crate::schema::{DomainSchema, EntityKind};

/// Normalize one record. Returns `None` for records that are not objects.
pub fn normalize(raw: Value, index: usize, schema: &DomainSchema) -> Option<Entity> {
    let mut fields = match raw {
        Value::Object(map) => map,
        other => {
            log(
                Level::Warn,
                Domain::Normalize,
                "record_skipped",
                obj(&[
                    ("page", v_str(schema.name)),
                    ("index", json!(index)),
                    ("kind", v_str(json_kind(&other))),
                ]),
            );
            return None;
        }
    };

    for key in schema.list_defaults {
        if !fields.contains_key(*key) {
            fields.insert((*key).to_string(), Value::Array(Vec::new()));
        }
    }
    if schema.kind == EntityKind::Achievement && !fields.contains_key("details") {
        fields.insert("details".to_string(), Value::Object(Map::new()));
    }

    let id = match fields.get("id").and_then(EntityId::from_value) {
        Some(id) => id,
        None => {
            let fallback = EntityId::new(format!("#{}", index));
            log(
                Level::Warn,
                Domain::Normalize,
                "missing_id",
                obj(&[("page", v_str(schema.name)), ("assigned", v_str(fallback.as_str()))]),
            );
            fallback
        }
    };

    let category = fields
        .get(schema.category_field)
        .and_then(value_text)
        .unwrap_or_default();
    let title = fields
        .get(schema.title_field)
        .and_then(value_text)
        .unwrap_or_default();
    let date = fields.get("date").and_then(Value::as_str).and_then(parse_date);
    let year = fields
        .get("year")
        .and_then(parse_year)
        .or_else(|| date.map(|d| chrono::Datelike::year(&d)));
    let featured = fields.get("featured").and_then(Value::as_bool).unwrap_or(false);
    let timeline = fields.get("timeline").and_then(Value::as_bool).unwrap_or(false);

    let (schedule, registration) = if schema.kind == EntityKind::Event {
        (schedule_of(&fields), registration_of(&fields))
    } else {
        (None, None)
    };

    let detail = detail_of(schema.kind, &category, &fields);

    Some(Entity {
        id,
        category,
        title,
        year,
        date,
        featured,
        timeline,
        schedule,
        registration,
        detail,
        fields,
    })
}

/// Normalize a whole collection, preserving order and skipping non-objects.
pub fn normalize_all(raw: Vec<Value>, schema: &DomainSchema) -> Vec<Entity> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, v)| normalize(v, i, schema))
        .collect()
}

// =============================================================================
// Field parsing
// =============================================================================

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .ok()
        .or_else(|| NaiveTime::parse_from_str(s, "%H:%M").ok())
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_count(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|c| u32::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Start = date + time (midnight when time is missing). End = endDate +
/// endTime; a missing endDate means the event ends on its start day, a
/// missing endTime means end of that day unless the event is a single
/// instant (no endDate and no endTime).
fn schedule_of(fields: &Map<String, Value>) -> Option<Schedule> {
    let start_date = fields.get("date").and_then(Value::as_str).and_then(parse_date)?;
    let start_time = fields
        .get("time")
        .and_then(Value::as_str)
        .and_then(parse_time)
        .unwrap_or(NaiveTime::MIN);
    let start = start_date.and_time(start_time);

    let end_date = fields.get("endDate").and_then(Value::as_str).and_then(parse_date);
    let end_time = fields.get("endTime").and_then(Value::as_str).and_then(parse_time);
    let end = match (end_date, end_time) {
        (Some(d), Some(t)) => d.and_time(t),
        (Some(d), None) => d.and_time(end_of_day()),
        (None, Some(t)) => start_date.and_time(t),
        (None, None) => start,
    };

    let past_override = fields.get("status").and_then(Value::as_str) == Some("past");
    Some(Schedule { start, end, past_override })
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

fn registration_of(fields: &Map<String, Value>) -> Option<Registration> {
    // Without a capacity there is nothing to book against.
    let capacity = parse_count(fields.get("capacity"))?;
    Some(Registration {
        registered: parse_count(fields.get("registered")).unwrap_or(0),
        capacity,
    })
}

// =============================================================================
// Detail dispatch
// =============================================================================

fn detail_of(kind: EntityKind, category: &str, fields: &Map<String, Value>) -> Detail {
    match kind {
        EntityKind::Achievement => {
            let details = fields.get("details").cloned().unwrap_or(Value::Null);
            match category {
                "competition" => shaped(&details, Detail::Competition),
                "research" => shaped(&details, Detail::Research),
                _ => generic(&details),
            }
        }
        EntityKind::Event => shaped_record::<EventDetail>(fields, Detail::Event),
        EntityKind::Project => shaped_record::<ProjectDetail>(fields, Detail::Project),
        EntityKind::News => shaped_record::<NewsDetail>(fields, Detail::News),
        EntityKind::Member => shaped_record::<MemberDetail>(fields, Detail::Member),
    }
}

fn shaped<T: DeserializeOwned>(details: &Value, wrap: fn(T) -> Detail) -> Detail {
    match serde_json::from_value::<T>(details.clone()) {
        Ok(parsed) => wrap(parsed),
        Err(err) => {
            log(
                Level::Debug,
                Domain::Normalize,
                "detail_generic_fallback",
                obj(&[("error", v_str(&err.to_string()))]),
            );
            generic(details)
        }
    }
}

fn shaped_record<T: DeserializeOwned>(fields: &Map<String, Value>, wrap: fn(T) -> Detail) -> Detail {
    shaped(&Value::Object(fields.clone()), wrap)
}

/// Arbitrary mapping -> ordered key/value listing. Lists become `List`,
/// scalars `Text`, nested objects their compact JSON; nulls are dropped.
pub fn generic(details: &Value) -> Detail {
    let Value::Object(map) = details else {
        return Detail::Generic(Vec::new());
    };
    let entries = map
        .iter()
        .filter_map(|(k, v)| {
            let value = match v {
                Value::Null => return None,
                Value::Array(items) => DetailValue::List(
                    items
                        .iter()
                        .map(|i| value_text(i).unwrap_or_else(|| i.to_string()))
                        .collect(),
                ),
                Value::Object(_) => DetailValue::Text(v.to_string()),
                scalar => DetailValue::Text(value_text(scalar).unwrap_or_default()),
            };
            Some((k.clone(), value))
        })
        .collect();
    Detail::Generic(entries)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
