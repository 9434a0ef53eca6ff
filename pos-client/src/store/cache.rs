//! Category / menu cache
//!
//! Categories are replaced wholesale on every fetch. Menus are cached per
//! category and only refetched on a miss, a forced reload, or after
//! [`CatalogCache::invalidate`].
//!
//! Every fetch takes a sequence number before it goes out. A response is
//! only written back if nothing newer has been written for the same key,
//! so overlapping loads resolve last-write-wins by request order rather
//! than by arrival order.

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{Category, MenuItem};

/// Load state of a fetched resource
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fetched<T> {
    #[default]
    NotLoaded,
    Ready(T),
    /// Last fetch failed; the UI renders a disabled state from this
    Failed(String),
}

impl<T> Fetched<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Handle for one in-flight menu fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub category_id: i64,
    seq: u64,
}

/// Result of writing a fetched menu list back
#[derive(Debug, Clone)]
pub enum Completion {
    Stored(Arc<[MenuItem]>),
    /// A newer fetch or an invalidation won; the list was not cached
    Superseded(Arc<[MenuItem]>),
}

impl Completion {
    pub fn into_items(self) -> Arc<[MenuItem]> {
        match self {
            Self::Stored(items) | Self::Superseded(items) => items,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

#[derive(Debug)]
struct MenuEntry {
    items: Arc<[MenuItem]>,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct CatalogCache {
    categories: Fetched<Vec<Category>>,
    categories_seq: u64,
    menus: HashMap<i64, MenuEntry>,
    /// Tickets below the floor were issued before an invalidation
    floors: HashMap<i64, u64>,
    next_seq: u64,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    // ========== Categories ==========

    pub fn categories(&self) -> &Fetched<Vec<Category>> {
        &self.categories
    }

    pub fn begin_categories(&mut self) -> u64 {
        self.next()
    }

    /// Write a category fetch result back. Returns `false` if a newer
    /// category fetch already completed.
    pub fn complete_categories(&mut self, seq: u64, result: Fetched<Vec<Category>>) -> bool {
        if seq < self.categories_seq {
            tracing::debug!(seq, applied = self.categories_seq, "Stale category response dropped");
            return false;
        }
        self.categories_seq = seq;
        self.categories = result;
        true
    }

    // ========== Menus ==========

    pub fn menus(&self, category_id: i64) -> Option<Arc<[MenuItem]>> {
        self.menus.get(&category_id).map(|e| Arc::clone(&e.items))
    }

    pub fn begin_menus(&mut self, category_id: i64) -> FetchTicket {
        FetchTicket {
            category_id,
            seq: self.next(),
        }
    }

    pub fn complete_menus(&mut self, ticket: FetchTicket, items: Vec<MenuItem>) -> Completion {
        let items: Arc<[MenuItem]> = items.into();
        let category_id = ticket.category_id;

        let floor = self.floors.get(&category_id).copied().unwrap_or(0);
        let newer_stored = self
            .menus
            .get(&category_id)
            .is_some_and(|e| e.seq > ticket.seq);

        if ticket.seq < floor || newer_stored {
            tracing::debug!(category_id, seq = ticket.seq, "Superseded menu response dropped");
            return Completion::Superseded(items);
        }

        self.menus.insert(
            category_id,
            MenuEntry {
                items: Arc::clone(&items),
                seq: ticket.seq,
            },
        );
        Completion::Stored(items)
    }

    /// Drop the entry for `category_id` only. Fetches already in flight
    /// for it will not repopulate the cache.
    pub fn invalidate(&mut self, category_id: i64) -> bool {
        let floor = self.next();
        self.floors.insert(category_id, floor);
        self.menus.remove(&category_id).is_some()
    }

    pub fn cached_categories(&self) -> impl Iterator<Item = i64> + '_ {
        self.menus.keys().copied()
    }
}
