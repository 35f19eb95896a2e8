use super::Status;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Titles that could not be matched, with the status computed at the time.
///
/// Entries live as long as the saver; there is no eviction.
#[derive(Default)]
pub struct NotFoundMemo {
    entries: RwLock<HashMap<String, Status>>,
}

impl NotFoundMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, artist_title: &str) -> Option<Status> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(artist_title)
            .cloned()
    }

    pub fn insert(&self, artist_title: &str, status: Status) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(artist_title.to_string(), status);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
