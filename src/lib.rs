//! Content engine for the robotics club site: loads per-domain JSON
//! documents, filters and arranges them, and renders HTML fragments into
//! named page containers.

pub mod arrange;
pub mod config;
pub mod detail;
pub mod error;
pub mod filter;
pub mod forms;
pub mod loader;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod page;
pub mod render;
pub mod schema;

pub use config::Config;
pub use error::{LoadError, NotFound, ValidationError};
pub use page::{Clock, PageController};
pub use schema::DomainSchema;
