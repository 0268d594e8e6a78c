//! # Default-seeding subscriber factory.
//!
//! A plain subscriber never creates its entry: its default only lives on the
//! client side. For tuning constants that is unhelpful, because the operator
//! has to type every entry name by hand after each reboot before the value can
//! be edited. [`seed_and_subscribe`] fixes this by publishing the subscriber's
//! current value once, right after subscribing:
//!
//! ```text
//! topic = table.get_topic(key)
//! sub   = topic.subscribe(default)      // entry still absent
//! topic.publish().set(sub.get())        // entry = existing value, else default
//! return sub
//! ```
//!
//! ## Rules
//! - Absent entry → the table gains `key = default`.
//! - Present entry → the existing value is republished unchanged.
//! - Errors from the collaborator's `set` are returned as-is.
//! - The read-then-publish pair is not atomic: call it at startup, before
//!   other writers of the same key are active.
//!
//! The factory only needs the five operations described by the traits below,
//! so any table implementation can be seeded, not just [`Table`](crate::Table).

use crate::error::TableError;

use super::handle::{Publisher, Subscriber};
use super::topic::Topic;
use super::value::TopicType;
use super::view::Table;

/// A table that can hand out topics of value type `V`.
pub trait TableSource<V> {
    type Topic: TopicSource<V>;

    fn get_topic(&self, key: &str) -> Self::Topic;
}

/// A topic that can create read and write handles.
pub trait TopicSource<V> {
    type Subscriber: ValueSubscriber<V>;
    type Publisher: ValuePublisher<V>;

    fn subscribe(&self, default: V) -> Self::Subscriber;

    fn publish(&self) -> Self::Publisher;
}

/// Read capability.
pub trait ValueSubscriber<V> {
    fn get(&self) -> V;
}

/// Write capability.
pub trait ValuePublisher<V> {
    type Error;

    fn set(&self, value: V) -> Result<(), Self::Error>;
}

/// Subscriber type produced by table `S` for value type `V`.
pub type SubscriberOf<S, V> = <<S as TableSource<V>>::Topic as TopicSource<V>>::Subscriber;

/// Error type returned by the publishers of table `S` for value type `V`.
pub type PublishErrorOf<S, V> =
    <<<S as TableSource<V>>::Topic as TopicSource<V>>::Publisher as ValuePublisher<V>>::Error;

/// Subscribes to `key` and makes sure the table exposes an entry for it.
///
/// # Example
/// ```
/// use tunevisor::{TableInstance, Value, seed_and_subscribe};
///
/// let inst = TableInstance::new();
/// let table = inst.table("Axis0Test");
///
/// let sub = seed_and_subscribe(&table, "Multiplier", 1.0).unwrap();
/// assert_eq!(sub.get(), 1.0);
/// assert_eq!(table.get_value("Multiplier"), Some(Value::Double(1.0)));
/// ```
pub fn seed_and_subscribe<S, V>(
    table: &S,
    key: &str,
    default: V,
) -> Result<SubscriberOf<S, V>, PublishErrorOf<S, V>>
where
    S: TableSource<V> + ?Sized,
{
    let topic = table.get_topic(key);
    let sub = topic.subscribe(default);
    topic.publish().set(sub.get())?;
    Ok(sub)
}

impl<T: TopicType> TableSource<T> for Table {
    type Topic = Topic<T>;

    fn get_topic(&self, key: &str) -> Topic<T> {
        self.topic(key)
    }
}

impl<T: TopicType> TopicSource<T> for Topic<T> {
    type Subscriber = Subscriber<T>;
    type Publisher = Publisher<T>;

    fn subscribe(&self, default: T) -> Subscriber<T> {
        Topic::subscribe(self, default)
    }

    fn publish(&self) -> Publisher<T> {
        Topic::publish(self)
    }
}

impl<T: TopicType> ValueSubscriber<T> for Subscriber<T> {
    fn get(&self) -> T {
        Subscriber::get(self)
    }
}

impl<T: TopicType> ValuePublisher<T> for Publisher<T> {
    type Error = TableError;

    fn set(&self, value: T) -> Result<(), TableError> {
        Publisher::set(self, value)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::table::{TableInstance, Value};

    #[test]
    fn test_absent_key_is_seeded_with_default() {
        let inst = TableInstance::new();
        let table = inst.table("Axis0Test");

        let sub = seed_and_subscribe(&table, "Multiplier", 1.0).unwrap();

        assert_eq!(table.get_value("Multiplier"), Some(Value::Double(1.0)));
        assert_eq!(sub.get(), 1.0);
    }

    #[test]
    fn test_existing_value_is_kept() {
        let inst = TableInstance::new();
        let table = inst.table("Axis0Test");
        table.double_topic("Multiplier").publish().set(2.5).unwrap();

        let sub = seed_and_subscribe(&table, "Multiplier", 1.0).unwrap();

        assert_eq!(sub.get(), 2.5);
        assert_eq!(table.get_value("Multiplier"), Some(Value::Double(2.5)));
    }

    #[test]
    fn test_second_call_is_idempotent() {
        let inst = TableInstance::new();
        let table = inst.table("Axis0Test");

        seed_and_subscribe(&table, "Multiplier", 1.0).unwrap();
        let before = table.get_value("Multiplier");
        let sub = seed_and_subscribe(&table, "Multiplier", 1.0).unwrap();

        assert_eq!(table.get_value("Multiplier"), before);
        assert_eq!(sub.get(), 1.0);
        assert_eq!(table.keys(), vec!["Multiplier".to_string()]);
    }

    #[test]
    fn test_subscriber_follows_external_writes() {
        let inst = TableInstance::new();
        let table = inst.table("Axis0Test");
        let sub = seed_and_subscribe(&table, "Multiplier", 1.0).unwrap();

        // operator dashboard writes through its own handle
        let dashboard = inst.table("Axis0Test").double_topic("Multiplier").publish();
        dashboard.set(3.0).unwrap();
        assert_eq!(sub.get(), 3.0);
        dashboard.set(-0.5).unwrap();
        assert_eq!(sub.get(), -0.5);
    }

    #[test]
    fn test_collaborator_error_is_propagated() {
        let inst = TableInstance::new();
        let table = inst.table("Axis0Test");
        table.boolean_topic("Multiplier").publish().set(true).unwrap();

        let err = seed_and_subscribe(&table, "Multiplier", 1.0).unwrap_err();
        assert_eq!(err.as_label(), "table_type_mismatch");
        assert_eq!(table.get_value("Multiplier"), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_other_value_types() {
        let inst = TableInstance::new();
        let table = inst.table("Shooter");

        let enabled = seed_and_subscribe(&table, "Enabled", false).unwrap();
        let label = seed_and_subscribe(&table, "Profile", "slow".to_string()).unwrap();

        assert!(!enabled.get());
        assert_eq!(label.get(), "slow");
        assert_eq!(table.keys(), vec!["Enabled".to_string(), "Profile".to_string()]);
    }

    // Minimal collaborator: a map shared by topics, recording every `set`.
    #[derive(Default, Clone)]
    struct MapTable {
        values: Rc<RefCell<HashMap<String, i64>>>,
        sets: Rc<RefCell<Vec<(String, i64)>>>,
    }

    struct MapTopic {
        table: MapTable,
        key: String,
    }

    struct MapSub {
        table: MapTable,
        key: String,
        default: i64,
    }

    struct MapPub {
        table: MapTable,
        key: String,
    }

    impl TableSource<i64> for MapTable {
        type Topic = MapTopic;

        fn get_topic(&self, key: &str) -> MapTopic {
            MapTopic {
                table: self.clone(),
                key: key.to_string(),
            }
        }
    }

    impl TopicSource<i64> for MapTopic {
        type Subscriber = MapSub;
        type Publisher = MapPub;

        fn subscribe(&self, default: i64) -> MapSub {
            MapSub {
                table: self.table.clone(),
                key: self.key.clone(),
                default,
            }
        }

        fn publish(&self) -> MapPub {
            MapPub {
                table: self.table.clone(),
                key: self.key.clone(),
            }
        }
    }

    impl ValueSubscriber<i64> for MapSub {
        fn get(&self) -> i64 {
            self.table
                .values
                .borrow()
                .get(&self.key)
                .copied()
                .unwrap_or(self.default)
        }
    }

    impl ValuePublisher<i64> for MapPub {
        type Error = std::convert::Infallible;

        fn set(&self, value: i64) -> Result<(), Self::Error> {
            self.table.values.borrow_mut().insert(self.key.clone(), value);
            self.table.sets.borrow_mut().push((self.key.clone(), value));
            Ok(())
        }
    }

    #[test]
    fn test_generic_collaborator_publishes_exactly_once() {
        let table = MapTable::default();
        table.values.borrow_mut().insert("present".into(), 9);

        let absent = seed_and_subscribe(&table, "absent", 4_i64).unwrap();
        let present = seed_and_subscribe(&table, "present", 4_i64).unwrap();

        assert_eq!(absent.get(), 4);
        assert_eq!(present.get(), 9);
        assert_eq!(
            *table.sets.borrow(),
            vec![("absent".to_string(), 4), ("present".to_string(), 9)]
        );
    }
}
