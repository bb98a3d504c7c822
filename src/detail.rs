//! Detail View Controller: at most one entity open at a time, looked up in
//! the unfiltered collection.

use crate::error::NotFound;
use crate::logging::log_detail;
use crate::model::{Entity, EntityId};

/// How the user dismissed the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    CloseButton,
    OutsideClick,
    Escape,
}

impl Dismiss {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dismiss::CloseButton => "close_button",
            Dismiss::OutsideClick => "outside_click",
            Dismiss::Escape => "escape",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailView {
    open: Option<EntityId>,
}

pub fn find<'a>(collection: &'a [Entity], id: &EntityId) -> Result<&'a Entity, NotFound> {
    collection.iter().find(|e| &e.id == id).ok_or_else(|| NotFound {
        id: id.to_string(),
    })
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&EntityId> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Open `id`, replacing whatever was open. A miss changes nothing.
    pub fn open<'a>(&mut self, page: &str, collection: &'a [Entity], id: &EntityId) -> Option<&'a Entity> {
        match find(collection, id) {
            Ok(entity) => {
                self.open = Some(entity.id.clone());
                log_detail(page, "detail_open", id.as_str());
                Some(entity)
            }
            Err(miss) => {
                log_detail(page, "detail_miss", &miss.id);
                None
            }
        }
    }

    /// Idempotent; returns whether a view was actually closed.
    pub fn close(&mut self, page: &str, reason: Dismiss) -> bool {
        match self.open.take() {
            Some(id) => {
                log_detail(page, reason.as_str(), id.as_str());
                true
            }
            None => false,
        }
    }
}
