//! # Typed topic: an entry slot used to build publishers and subscribers.

use std::marker::PhantomData;
use std::sync::Arc;

use super::handle::{Publisher, Subscriber};
use super::instance::TableInstance;
use super::value::TopicType;

/// Entry slot of type `T` inside a table.
///
/// A topic holds no value itself; it exists to create [`Subscriber`]s and
/// [`Publisher`]s bound to the same path.
pub struct Topic<T> {
    instance: TableInstance,
    path: Arc<str>,
    valid: bool,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.clone(),
            path: Arc::clone(&self.path),
            valid: self.valid,
            _ty: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic").field("path", &self.path).finish()
    }
}

impl<T: TopicType> Topic<T> {
    pub(crate) fn new(instance: TableInstance, path: String, valid: bool) -> Self {
        Self {
            instance,
            path: path.into(),
            valid,
            _ty: PhantomData,
        }
    }

    /// Full path of the topic (`/Axis0Test/Multiplier`).
    pub fn name(&self) -> &str {
        &self.path
    }

    /// True if the entry currently has a value.
    pub fn exists(&self) -> bool {
        self.instance.contains(&self.path)
    }

    /// True if the path is made of non-empty segments without separators.
    ///
    /// Writes through an invalid topic fail with `TableError::InvalidKey`.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Creates a subscriber that reads `default` while nothing is published.
    ///
    /// Subscribing does **not** publish `default`: the entry stays absent
    /// until some publisher writes it.
    pub fn subscribe(&self, default: T) -> Subscriber<T> {
        Subscriber::new(self.instance.clone(), Arc::clone(&self.path), default)
    }

    /// Creates a publisher with a fresh writer id.
    pub fn publish(&self) -> Publisher<T> {
        Publisher::new(
            self.instance.clone(),
            Arc::clone(&self.path),
            self.valid,
            self.instance.next_publisher_id(),
        )
    }
}
