//! Configuration values and their frozen form

use std::fmt;
use std::sync::Arc;

use remix_routes::ServerBundles;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::preset::{BuildEndHook, Preset};

/// The value stored under a [`ConfigKey`](crate::ConfigKey)
///
/// Data keys hold JSON; `serverBundles` and `buildEnd` hold behavior. Data is
/// compared structurally, behavior by identity.
#[derive(Clone)]
pub enum ConfigValue {
    Data(Value),
    ServerBundles(Arc<dyn ServerBundles>),
    BuildEnd(Arc<dyn BuildEndHook>),
    Presets(Vec<Arc<dyn Preset>>),
}

impl ConfigValue {
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Short description of the value's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Data(_) => "data",
            Self::ServerBundles(_) => "serverBundles function",
            Self::BuildEnd(_) => "buildEnd function",
            Self::Presets(_) => "preset list",
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::ServerBundles(a), Self::ServerBundles(b)) => Arc::ptr_eq(a, b),
            (Self::BuildEnd(a), Self::BuildEnd(b)) => Arc::ptr_eq(a, b),
            (Self::Presets(a), Self::Presets(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Self::ServerBundles(_) => f.write_str("ServerBundles(<function>)"),
            Self::BuildEnd(_) => f.write_str("BuildEnd(<function>)"),
            Self::Presets(presets) => f
                .debug_tuple("Presets")
                .field(&presets.iter().map(|p| p.name()).collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Immutable JSON data owned by a resolved configuration
///
/// Cloning shares the same underlying value. Only shared borrows are ever
/// handed out; the runtime setters exist for callers that receive the value
/// across an untyped boundary and always fail.
#[derive(Clone, PartialEq)]
pub struct FrozenValue(Arc<Value>);

impl FrozenValue {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a nested object member or array element
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.0.as_ref() {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Whether two handles point at the same frozen value
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Frozen values reject every mutation
    pub fn try_set(&self, path: &str, _value: Value) -> Result<()> {
        Err(Error::FrozenConfig {
            path: path.to_string(),
        })
    }

    /// A detached, mutable copy of the data
    pub fn to_mutable(&self) -> Value {
        self.0.as_ref().clone()
    }
}

impl fmt::Debug for FrozenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_ref(), f)
    }
}

impl Serialize for FrozenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
