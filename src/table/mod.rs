//! # Live tuning table.
//!
//! An in-process key-value store with typed topics:
//! - [`TableInstance`] the shared store (passed explicitly, never global)
//! - [`Table`] a named, path-prefixed view on the store
//! - [`Topic`] a typed entry slot creating [`Subscriber`]s and [`Publisher`]s
//! - [`seed_and_subscribe`] subscribe and make the entry visible at once

mod handle;
mod instance;
mod seed;
mod topic;
mod value;
mod view;

pub use handle::{Publisher, Subscriber, Timestamped};
pub use instance::{PATH_SEPARATOR, TableInstance};
pub use seed::{
    PublishErrorOf, SubscriberOf, TableSource, TopicSource, ValuePublisher, ValueSubscriber,
    seed_and_subscribe,
};
pub use topic::Topic;
pub use value::{TopicType, Value};
pub use view::Table;
