//! Data Loader: one-shot retrieval of a content document and extraction of a
//! named collection from it.

pub mod samples;
pub mod source;

pub use source::{source_from_config, FileSource, HttpSource, MemorySource, Source};

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::LoadError;
use crate::logging::{log, log_load, log_load_failed, obj, v_str, Domain, Level, ProfileScope};
use crate::model::Entity;
use crate::normalize::normalize_all;
use crate::schema::{CollectionShape, DomainSchema, Recovery, ALL};

/// A parsed document plus the digest of the bytes it was parsed from.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub sha256: String,
    pub root: Value,
}

/// Result of loading a page's collection after the recovery policy applied.
#[derive(Debug)]
pub enum Loaded {
    Fresh(Vec<Entity>),
    /// Load failed; the built-in sample collection stands in.
    Sample(Vec<Entity>, LoadError),
    Failed(LoadError),
}

impl Loaded {
    pub fn entities(&self) -> &[Entity] {
        match self {
            Loaded::Fresh(e) | Loaded::Sample(e, _) => e,
            Loaded::Failed(_) => &[],
        }
    }

    pub fn into_parts(self) -> (Vec<Entity>, Option<LoadError>) {
        match self {
            Loaded::Fresh(e) => (e, None),
            Loaded::Sample(e, err) => (e, Some(err)),
            Loaded::Failed(err) => (Vec::new(), Some(err)),
        }
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn parse_document(path: &str, text: &str) -> Result<Document, LoadError> {
    let root: Value = serde_json::from_str(text).map_err(|e| LoadError::Malformed {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    if !root.is_object() {
        return Err(LoadError::Malformed {
            path: path.to_string(),
            message: "top level is not an object".to_string(),
        });
    }
    Ok(Document {
        path: path.to_string(),
        sha256: sha256_hex(text.as_bytes()),
        root,
    })
}

pub async fn load_document(source: &dyn Source, path: &str) -> Result<Document, LoadError> {
    let text = source.fetch(path).await?;
    parse_document(path, &text)
}

/// Fetch `path` and return the array stored under `key`. An absent key is
/// "no data", not an error.
pub async fn load(source: &dyn Source, path: &str, key: &str) -> Result<Vec<Value>, LoadError> {
    let doc = load_document(source, path).await?;
    let records = list_at(&doc.path, doc.root.get(key), key)?;
    log_load(key, path, &doc.sha256, records.len());
    Ok(records)
}

fn list_at(path: &str, value: Option<&Value>, key: &str) -> Result<Vec<Value>, LoadError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(LoadError::Malformed {
            path: path.to_string(),
            message: format!("`{}` is not a list", key),
        }),
    }
}

fn object_at<'a>(
    path: &str,
    value: Option<&'a Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, LoadError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(LoadError::Malformed {
            path: path.to_string(),
            message: format!("`{}` is not a mapping", key),
        }),
    }
}

/// Pull the raw records described by `shape` out of a parsed document.
pub fn extract(doc: &Document, shape: CollectionShape) -> Result<Vec<Value>, LoadError> {
    let root = &doc.root;
    match shape {
        CollectionShape::List(key) => list_at(&doc.path, root.get(key), key),
        CollectionShape::Nested(key, inner) => match object_at(&doc.path, root.get(key), key)? {
            Some(map) => list_at(&doc.path, map.get(inner), inner),
            None => Ok(Vec::new()),
        },
        CollectionShape::Grouped(key, group_field) => {
            let Some(groups) = object_at(&doc.path, root.get(key), key)? else {
                return Ok(Vec::new());
            };
            let mut out = Vec::new();
            for (group, members) in groups {
                if group == ALL {
                    continue;
                }
                for mut record in list_at(&doc.path, Some(members), group)? {
                    if let Value::Object(map) = &mut record {
                        map.insert(group_field.to_string(), Value::String(group.clone()));
                    }
                    out.push(record);
                }
            }
            Ok(out)
        }
    }
}

/// Load and normalize one domain's collection, applying its recovery policy
/// when the document cannot be retrieved or parsed.
pub async fn load_collection(source: &dyn Source, schema: &DomainSchema) -> Loaded {
    let _prof = ProfileScope::with_context("load_collection", &[("page", v_str(schema.name))]);

    let result = match load_document(source, schema.document).await {
        Ok(doc) => extract(&doc, schema.shape).map(|raw| (doc.sha256, raw)),
        Err(err) => Err(err),
    };

    match result {
        Ok((sha, raw)) => {
            let entities = normalize_all(raw, schema);
            log_load(schema.name, schema.document, &sha, entities.len());
            warn_duplicate_ids(schema, &entities);
            Loaded::Fresh(entities)
        }
        Err(err) => match schema.recovery {
            Recovery::ErrorState => {
                log_load_failed(schema.name, schema.document, &err.to_string(), "error_state");
                Loaded::Failed(err)
            }
            Recovery::Sample(text) => {
                log_load_failed(schema.name, schema.document, &err.to_string(), "sample");
                match sample_collection(schema, text) {
                    Ok(entities) => Loaded::Sample(entities, err),
                    Err(sample_err) => {
                        log(
                            Level::Error,
                            Domain::Load,
                            "sample_unusable",
                            obj(&[("page", v_str(schema.name)), ("error", v_str(&sample_err.to_string()))]),
                        );
                        Loaded::Failed(err)
                    }
                }
            }
        },
    }
}

pub fn sample_collection(schema: &DomainSchema, text: &str) -> Result<Vec<Entity>, LoadError> {
    let doc = parse_document("<sample>", text)?;
    let raw = extract(&doc, schema.shape)?;
    Ok(normalize_all(raw, schema))
}

fn warn_duplicate_ids(schema: &DomainSchema, entities: &[Entity]) {
    let mut seen = std::collections::HashSet::new();
    for e in entities {
        if !seen.insert(e.id.as_str()) {
            log(
                Level::Warn,
                Domain::Load,
                "duplicate_id",
                obj(&[("page", v_str(schema.name)), ("id", v_str(e.id.as_str()))]),
            );
        }
    }
}
