use crate::properties::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read-only request context shared by every handler of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request {
    properties: Properties,
}

impl Request {
    #[must_use]
    pub const fn new(properties: Properties) -> Self {
        Self { properties }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl From<Properties> for Request {
    fn from(properties: Properties) -> Self {
        Self::new(properties)
    }
}

/// Response accumulator handlers write into while the chain runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response {
    properties: Properties,
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    #[must_use]
    pub fn into_inner(self) -> Properties {
        self.properties
    }
}
