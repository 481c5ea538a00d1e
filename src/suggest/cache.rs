use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::host::{EntityRoster, RosterEvent};

use super::types::EntityRecord;

/// What a cache read yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheView<'a> {
    Ready(&'a [EntityRecord]),
    /// The roster could not be queried; carries the reason.
    Unavailable(&'a str),
}

/// Cloneable handle that marks a [`CandidateCache`] stale from anywhere,
/// including roster listener threads.
#[derive(Debug, Clone)]
pub struct CacheInvalidator {
    stale: Arc<AtomicBool>,
}

impl CacheInvalidator {
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }
}

/// Snapshot of all known people, newest first.
///
/// Stale until first built, after [`invalidate`](Self::invalidate), and when
/// read with a selector other than the one it was built from.
#[derive(Debug)]
pub struct CandidateCache {
    records: Vec<EntityRecord>,
    key: Option<String>,
    stale: Arc<AtomicBool>,
    unavailable: Option<String>,
    subscribed: bool,
}

impl Default for CandidateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateCache {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            key: None,
            stale: Arc::new(AtomicBool::new(true)),
            unavailable: None,
            subscribed: false,
        }
    }

    pub fn invalidator(&self) -> CacheInvalidator {
        CacheInvalidator {
            stale: self.stale.clone(),
        }
    }

    pub fn invalidate(&self) {
        tracing::debug!("people cache invalidated");
        self.stale.store(true, Ordering::SeqCst);
    }

    pub fn is_stale(&self, selector: &str) -> bool {
        self.stale.load(Ordering::SeqCst) || self.key.as_deref() != Some(selector)
    }

    /// Current records, rebuilding first when stale.
    pub fn get(&mut self, roster: &dyn EntityRoster, selector: &str) -> CacheView<'_> {
        if self.is_stale(selector) {
            self.refresh(roster, selector);
        }
        match &self.unavailable {
            Some(reason) => CacheView::Unavailable(reason),
            None => CacheView::Ready(&self.records),
        }
    }

    /// Rebuild from the roster. The old records stay in place until the new
    /// vector is complete.
    pub fn refresh(&mut self, roster: &dyn EntityRoster, selector: &str) {
        // Cleared before querying so a notification arriving mid-query
        // leaves the cache stale.
        self.stale.store(false, Ordering::SeqCst);

        let mut pages = match roster.pages(selector) {
            Ok(pages) => pages,
            Err(err) => {
                tracing::warn!("people roster unavailable for `{selector}`: {err}");
                self.records.clear();
                self.key = None;
                self.unavailable = Some(err.to_string());
                self.stale.store(true, Ordering::SeqCst);
                return;
            }
        };

        if !self.subscribed {
            self.subscribe(roster);
        }

        pages.sort_by(|a, b| b.recency.cmp(&a.recency));
        let records: Vec<EntityRecord> = pages
            .into_iter()
            .filter_map(|page| EntityRecord::from_resource(page.resource))
            .collect();

        tracing::debug!("people cache rebuilt: {} records for `{selector}`", records.len());
        self.records = records;
        self.key = Some(selector.to_string());
        self.unavailable = None;
    }

    fn subscribe(&mut self, roster: &dyn EntityRoster) {
        let invalidator = self.invalidator();
        roster.subscribe(Box::new(move |event: &RosterEvent| {
            if event.kind.invalidates_roster() {
                tracing::debug!(
                    "roster {:?} of {}, invalidating people cache",
                    event.kind,
                    event.resource.path.display()
                );
                invalidator.invalidate();
            }
        }));
        self.subscribed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::host::{Resource, ResourceDescriptor, RosterEventKind, RosterListener};
    use std::cell::{Cell, RefCell};
    use std::time::{Duration, UNIX_EPOCH};

    #[derive(Default)]
    struct FakeRoster {
        names: RefCell<Vec<(&'static str, u64)>>,
        queries: Cell<usize>,
        down: Cell<bool>,
        listeners: RefCell<Vec<RosterListener>>,
    }

    impl FakeRoster {
        fn with(names: &[(&'static str, u64)]) -> Self {
            let roster = Self::default();
            roster.names.borrow_mut().extend_from_slice(names);
            roster
        }

        fn emit(&self, kind: RosterEventKind) {
            let event = RosterEvent {
                kind,
                resource: Resource::new("/v/x.md"),
                old_path: None,
            };
            for listener in self.listeners.borrow().iter() {
                listener(&event);
            }
        }
    }

    impl EntityRoster for FakeRoster {
        fn pages(&self, _selector: &str) -> Result<Vec<ResourceDescriptor>, RosterError> {
            self.queries.set(self.queries.get() + 1);
            if self.down.get() {
                return Err(RosterError::Unavailable("no provider".to_string()));
            }
            Ok(self
                .names
                .borrow()
                .iter()
                .map(|(name, secs)| ResourceDescriptor {
                    resource: Resource::new(format!("/v/{name}.md")),
                    recency: UNIX_EPOCH + Duration::from_secs(*secs),
                })
                .collect())
        }

        fn subscribe(&self, listener: RosterListener) {
            self.listeners.borrow_mut().push(listener);
        }
    }

    fn labels(view: CacheView<'_>) -> Vec<String> {
        match view {
            CacheView::Ready(records) => records.iter().map(|r| r.label.clone()).collect(),
            CacheView::Unavailable(reason) => panic!("unavailable: {reason}"),
        }
    }

    #[test]
    fn builds_lazily_in_recency_order() {
        let roster = FakeRoster::with(&[("Old", 1), ("New", 30), ("Mid", 10)]);
        let mut cache = CandidateCache::new();
        assert!(cache.is_stale("People"));

        assert_eq!(labels(cache.get(&roster, "People")), ["New", "Mid", "Old"]);
        assert_eq!(labels(cache.get(&roster, "People")), ["New", "Mid", "Old"]);
        assert_eq!(roster.queries.get(), 1);
    }

    #[test]
    fn invalidate_forces_full_rebuild() {
        let roster = FakeRoster::with(&[("Alice", 1)]);
        let mut cache = CandidateCache::new();
        cache.get(&roster, "");

        roster.names.borrow_mut().push(("Bob", 2));
        assert_eq!(labels(cache.get(&roster, "")), ["Alice"]);

        cache.invalidate();
        assert_eq!(labels(cache.get(&roster, "")), ["Bob", "Alice"]);
        assert_eq!(roster.queries.get(), 2);
    }

    #[test]
    fn selector_change_rebuilds() {
        let roster = FakeRoster::with(&[("Alice", 1)]);
        let mut cache = CandidateCache::new();
        cache.get(&roster, "People");
        cache.get(&roster, "#person");
        assert_eq!(roster.queries.get(), 2);
    }

    #[test]
    fn rename_and_delete_invalidate_but_update_does_not() {
        let roster = FakeRoster::with(&[("Alice", 1)]);
        let mut cache = CandidateCache::new();
        cache.get(&roster, "");

        roster.emit(RosterEventKind::Update);
        assert!(!cache.is_stale(""));

        roster.emit(RosterEventKind::Delete);
        assert!(cache.is_stale(""));
        cache.get(&roster, "");

        roster.emit(RosterEventKind::Rename);
        assert!(cache.is_stale(""));
        assert_eq!(roster.listeners.borrow().len(), 1);
    }

    #[test]
    fn unavailable_roster_is_reported_and_retried() {
        let roster = FakeRoster::with(&[("Alice", 1)]);
        roster.down.set(true);
        let mut cache = CandidateCache::new();

        assert!(matches!(cache.get(&roster, ""), CacheView::Unavailable(_)));

        roster.down.set(false);
        assert_eq!(labels(cache.get(&roster, "")), ["Alice"]);
    }

    #[test]
    fn invalidator_handle_marks_stale() {
        let roster = FakeRoster::with(&[("Alice", 1)]);
        let mut cache = CandidateCache::new();
        cache.get(&roster, "");

        let handle = cache.invalidator();
        std::thread::spawn(move || handle.invalidate()).join().unwrap();
        assert!(cache.is_stale(""));
    }
}
