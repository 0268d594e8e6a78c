//! # Subscriber and publisher handles.
//!
//! - [`Subscriber`] is a read capability with a client-side default. Reading
//!   never creates an entry.
//! - [`Publisher`] is a write capability carrying a unique writer id.
//!
//! Both are cheap to clone and `Send + Sync`; every call is atomic on its own,
//! no lock is held between calls.

use std::sync::Arc;
use std::time::SystemTime;

use crate::error::TableError;

use super::instance::TableInstance;
use super::value::TopicType;

/// Value read together with its entry metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Timestamped<T> {
    pub value: T,
    /// Per-entry change counter (1 on first write).
    pub seq: u64,
    /// Id of the publisher that wrote `value`.
    pub writer: u64,
    pub at: SystemTime,
}

/// Read handle bound to one entry.
#[derive(Clone, Debug)]
pub struct Subscriber<T> {
    instance: TableInstance,
    path: Arc<str>,
    default: T,
}

impl<T: TopicType> Subscriber<T> {
    pub(crate) fn new(instance: TableInstance, path: Arc<str>, default: T) -> Self {
        Self {
            instance,
            path,
            default,
        }
    }

    /// Returns the latest value, or the default when the entry is absent or
    /// holds another type.
    pub fn get(&self) -> T {
        self.get_atomic()
            .map(|ts| ts.value)
            .unwrap_or_else(|| self.default.clone())
    }

    /// Returns the latest value with its metadata, `None` when there is no
    /// value of type `T`.
    pub fn get_atomic(&self) -> Option<Timestamped<T>> {
        let entry = self.instance.entry(&self.path)?;
        let value = T::from_value(&entry.value)?;
        Some(Timestamped {
            value,
            seq: entry.seq,
            writer: entry.last_writer,
            at: entry.at,
        })
    }

    /// True if the entry currently has a value.
    pub fn exists(&self) -> bool {
        self.instance.contains(&self.path)
    }

    /// The client-side default.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Full path of the entry.
    pub fn name(&self) -> &str {
        &self.path
    }
}

/// Write handle bound to one entry.
#[derive(Clone, Debug)]
pub struct Publisher<T> {
    instance: TableInstance,
    path: Arc<str>,
    valid: bool,
    id: u64,
    _ty: std::marker::PhantomData<fn(T)>,
}

impl<T: TopicType> Publisher<T> {
    pub(crate) fn new(instance: TableInstance, path: Arc<str>, valid: bool, id: u64) -> Self {
        Self {
            instance,
            path,
            valid,
            id,
            _ty: std::marker::PhantomData,
        }
    }

    /// Writes `value`, creating the entry if needed.
    pub fn set(&self, value: T) -> Result<(), TableError> {
        self.check_key()?;
        self.instance
            .write(&self.path, value.into_value(), self.id, false)
            .map(|_| ())
    }

    /// Writes `value` only if the entry does not exist yet.
    ///
    /// Returns `true` if the value was written.
    pub fn set_default(&self, value: T) -> Result<bool, TableError> {
        self.check_key()?;
        self.instance
            .write(&self.path, value.into_value(), self.id, true)
    }

    /// Writer id recorded as the entry's last writer.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Full path of the entry.
    pub fn name(&self) -> &str {
        &self.path
    }

    fn check_key(&self) -> Result<(), TableError> {
        if self.valid {
            Ok(())
        } else {
            Err(TableError::InvalidKey {
                key: self.path.to_string(),
            })
        }
    }
}
