//! Error taxonomy for the content pipeline.
//!
//! Nothing here is fatal to a page: a `LoadError` degrades one page to an
//! error or sample state, a `NotFound` is swallowed by the detail view, and a
//! `ValidationError` is handed back to the form for correction.

use thiserror::Error;

/// Retrieval or parse failure for a content document.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching {path} returned HTTP {status}")]
    Http { path: String, status: u16 },

    #[error("fetching {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("{path} is not a valid content document: {message}")]
    Malformed { path: String, message: String },

    #[error("cannot resolve {path} against {base}")]
    InvalidLocation { base: String, path: String },
}

impl LoadError {
    pub fn path(&self) -> &str {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Http { path, .. }
            | LoadError::Transport { path, .. }
            | LoadError::Malformed { path, .. }
            | LoadError::InvalidLocation { path, .. } => path,
        }
    }
}

/// Detail lookup miss. Callers treat it as ignorable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no entity with id {id}")]
pub struct NotFound {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field-level form failure; every failing field is reported at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid input: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError::new(field, message)],
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

/// Subscriber store failure: either the address was refused or sqlite was.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("subscriber store: {0}")]
    Db(#[from] rusqlite::Error),
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = ValidationError {
            fields: vec![
                FieldError::new("name", "too short"),
                FieldError::new("email", "invalid"),
            ],
        };
        assert_eq!(err.to_string(), "invalid input: name: too short; email: invalid");
        assert!(err.has_field("email"));
        assert!(!err.has_field("subject"));
    }

    #[test]
    fn test_load_error_path() {
        let err = LoadError::Http {
            path: "data/events.json".to_string(),
            status: 404,
        };
        assert_eq!(err.path(), "data/events.json");
        assert!(err.to_string().contains("404"));
    }
}
