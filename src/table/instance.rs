//! # Process-level table store.
//!
//! [`TableInstance`] owns every entry of every table. It is an explicit,
//! cloneable handle: there is no global default instance, callers pass the
//! instance (or a [`Table`] view on it) to whatever needs it.
//!
//! ## Architecture
//! ```text
//! TableInstance ──► Table("/Axis0Test") ──► Topic<f64>("/Axis0Test/Multiplier")
//!       │                                      ├─► Subscriber<f64>  (read + default)
//!       │                                      └─► Publisher<f64>   (write, id = N)
//!       │
//!       ├─ RwLock<HashMap<path, Entry>>   (per-call atomicity)
//!       └─ Bus                            (TopicPublished / ValueSet events)
//! ```
//!
//! ## Rules
//! - Entries are created by the **first write** only; reads never create entries.
//! - Entries are retained: dropping publishers never removes a value.
//! - A write of another type than the stored one is rejected with
//!   [`TableError::TypeMismatch`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use crate::error::TableError;
use crate::events::{Bus, Event, EventKind};

use super::view::Table;
use super::value::Value;

/// Path separator between table names and entry names.
pub const PATH_SEPARATOR: char = '/';

/// Stored entry with out-of-band metadata.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) value: Value,
    /// Per-entry change counter, starting at 1 on the first write.
    pub(crate) seq: u64,
    /// Id of the publisher that wrote last.
    pub(crate) last_writer: u64,
    pub(crate) at: SystemTime,
}

struct Inner {
    entries: RwLock<HashMap<String, Entry>>,
    bus: Bus,
    next_publisher: AtomicU64,
}

/// Shared, in-process key-value store backing all tables.
///
/// Cheap to clone (internally `Arc`).
#[derive(Clone)]
pub struct TableInstance {
    inner: Arc<Inner>,
}

impl TableInstance {
    /// Creates an empty instance with its own event bus.
    pub fn new() -> Self {
        Self::with_bus(Bus::default())
    }

    /// Creates an empty instance publishing table events on `bus`.
    pub fn with_bus(bus: Bus) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(HashMap::new()),
                bus,
                next_publisher: AtomicU64::new(1),
            }),
        }
    }

    /// Returns a view on the top-level table `name`.
    pub fn table(&self, name: &str) -> Table {
        Table::new(self.clone(), format!("{PATH_SEPARATOR}{name}"))
    }

    /// Event bus used for table events.
    pub fn bus(&self) -> &Bus {
        &self.inner.bus
    }

    /// Returns all entry paths (sorted).
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read_entries().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Returns the current value stored under the full `path`.
    pub fn get_value(&self, path: &str) -> Option<Value> {
        self.read_entries().get(path).map(|e| e.value.clone())
    }

    /// Number of entries in the instance.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// True if no entry was ever written.
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    pub(crate) fn next_publisher_id(&self) -> u64 {
        self.inner.next_publisher.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn entry(&self, path: &str) -> Option<Entry> {
        self.read_entries().get(path).cloned()
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.read_entries().contains_key(path)
    }

    /// Writes `value` under `path`.
    ///
    /// With `only_if_absent`, an existing entry is left untouched and `Ok(false)`
    /// is returned. Events are published after the lock is released.
    pub(crate) fn write(
        &self,
        path: &str,
        value: Value,
        writer: u64,
        only_if_absent: bool,
    ) -> Result<bool, TableError> {
        let created = {
            let mut entries = self.write_entries();
            match entries.get_mut(path) {
                Some(_) if only_if_absent => return Ok(false),
                Some(entry) => {
                    if std::mem::discriminant(&entry.value) != std::mem::discriminant(&value) {
                        return Err(TableError::TypeMismatch {
                            key: path.to_string(),
                            expected: value.type_name(),
                            found: entry.value.type_name(),
                        });
                    }
                    entry.value = value.clone();
                    entry.seq += 1;
                    entry.last_writer = writer;
                    entry.at = SystemTime::now();
                    false
                }
                None => {
                    entries.insert(
                        path.to_string(),
                        Entry {
                            value: value.clone(),
                            seq: 1,
                            last_writer: writer,
                            at: SystemTime::now(),
                        },
                    );
                    true
                }
            }
        };

        if created {
            self.inner.bus.publish(
                Event::new(EventKind::TopicPublished)
                    .with_key(path)
                    .with_value(value.clone()),
            );
        }
        self.inner.bus.publish(
            Event::new(EventKind::ValueSet)
                .with_key(path)
                .with_value(value)
                .with_writer(writer),
        );
        Ok(true)
    }

    // A panicking writer cannot leave an entry half-written, so poisoned locks are recovered.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.inner
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.inner
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TableInstance {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TableInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableInstance")
            .field("entries", &self.len())
            .finish()
    }
}
