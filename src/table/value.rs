//! # Typed table values.
//!
//! Entries store a [`Value`]; typed handles convert through [`TopicType`].

use std::fmt;
use std::sync::Arc;

/// A scalar stored in a table entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Double(f64),
    Boolean(bool),
    String(Arc<str>),
}

impl Value {
    /// Type name used in errors and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Double(_) => f64::TYPE_NAME,
            Value::Boolean(_) => bool::TYPE_NAME,
            Value::String(_) => String::TYPE_NAME,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Double(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// Rust types that can back a topic.
///
/// Implemented for `f64`, `bool` and `String`.
pub trait TopicType: Clone + Send + Sync + 'static {
    /// Type name used in errors and logs.
    const TYPE_NAME: &'static str;

    /// Wraps `self` into a [`Value`].
    fn into_value(self) -> Value;

    /// Extracts `Self` from a value of the matching type.
    fn from_value(value: &Value) -> Option<Self>;
}

impl TopicType for f64 {
    const TYPE_NAME: &'static str = "double";

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl TopicType for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn into_value(self) -> Value {
        Value::Boolean(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl TopicType for String {
    const TYPE_NAME: &'static str = "string";

    fn into_value(self) -> Value {
        Value::String(self.into())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.to_string()),
            _ => None,
        }
    }
}
