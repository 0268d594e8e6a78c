//! # Table: a path-prefixed view on a [`TableInstance`].
//!
//! A table is usually per-subsystem (an elevator, an arm, a shooter each get
//! their own). Entries inside it are addressed by short names; topics are
//! created on demand and used immediately to build publishers or subscribers.

use std::sync::Arc;

use super::instance::{PATH_SEPARATOR, TableInstance};
use super::topic::Topic;
use super::value::{TopicType, Value};

/// Returns true if `segment` can be used as a table or entry name.
pub(crate) fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains(PATH_SEPARATOR)
}

/// Named table inside a [`TableInstance`].
#[derive(Clone, Debug)]
pub struct Table {
    instance: TableInstance,
    path: Arc<str>,
    valid: bool,
}

impl Table {
    pub(crate) fn new(instance: TableInstance, path: String) -> Self {
        let valid = path
            .split(PATH_SEPARATOR)
            .skip(1)
            .all(is_valid_segment);
        Self {
            instance,
            path: path.into(),
            valid,
        }
    }

    /// Full path of the table (`/Axis0Test`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Instance this table belongs to.
    pub fn instance(&self) -> &TableInstance {
        &self.instance
    }

    /// Returns a nested table (`/Parent/name`).
    pub fn sub_table(&self, name: &str) -> Table {
        Table::new(self.instance.clone(), self.entry_path(name))
    }

    /// Returns a typed topic for entry `name`.
    ///
    /// Creating a topic does not create an entry.
    pub fn topic<T: TopicType>(&self, name: &str) -> Topic<T> {
        let valid = self.valid && is_valid_segment(name);
        Topic::new(self.instance.clone(), self.entry_path(name), valid)
    }

    pub fn double_topic(&self, name: &str) -> Topic<f64> {
        self.topic(name)
    }

    pub fn boolean_topic(&self, name: &str) -> Topic<bool> {
        self.topic(name)
    }

    pub fn string_topic(&self, name: &str) -> Topic<String> {
        self.topic(name)
    }

    /// Names of the entries directly inside this table (sorted, sub-tables excluded).
    pub fn keys(&self) -> Vec<String> {
        let prefix = format!("{}{PATH_SEPARATOR}", self.path);
        self.instance
            .keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
            .filter(|rest| !rest.contains(PATH_SEPARATOR))
            .collect()
    }

    /// True if entry `name` has a value.
    pub fn contains_key(&self, name: &str) -> bool {
        self.instance.contains(&self.entry_path(name))
    }

    /// Current value of entry `name`, if any.
    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.instance.get_value(&self.entry_path(name))
    }

    fn entry_path(&self, name: &str) -> String {
        format!("{}{PATH_SEPARATOR}{name}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let inst = TableInstance::new();
        let arm = inst.table("Arm");
        assert_eq!(arm.path(), "/Arm");
        assert_eq!(arm.sub_table("Wrist").path(), "/Arm/Wrist");
        assert_eq!(arm.double_topic("kP").name(), "/Arm/kP");
    }

    #[test]
    fn test_keys_excludes_sub_tables() {
        let inst = TableInstance::new();
        let arm = inst.table("Arm");
        arm.double_topic("kP").publish().set(0.1).unwrap();
        arm.sub_table("Wrist")
            .double_topic("kD")
            .publish()
            .set(0.2)
            .unwrap();
        inst.table("Other")
            .boolean_topic("on")
            .publish()
            .set(true)
            .unwrap();

        assert_eq!(arm.keys(), vec!["kP".to_string()]);
        assert!(arm.contains_key("kP"));
        assert!(!arm.contains_key("kD"));
        assert_eq!(arm.get_value("kP"), Some(Value::Double(0.1)));
    }

    #[test]
    fn test_invalid_table_names() {
        let inst = TableInstance::new();
        assert!(!inst.table("").double_topic("x").is_valid());
        assert!(!inst.table("ok").double_topic("").is_valid());
        assert!(!inst.table("ok").double_topic("a/b").is_valid());
        assert!(inst.table("ok").double_topic("a").is_valid());
    }
}
