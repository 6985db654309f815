//! # Value Model
//!
//! Runtime values as returned by the contract service. Every value travels as a JSON
//! object discriminated by its `class` field:
//!
//! ```text
//! {"class": "IntValue", "i": 42}
//! {"class": "RecordValue", "recordTag": {"qualifier": ["Ns"], "name": "Tag"}, "fields": {...}}
//! ```
//!
//! Values are plain data: they are deserialized from a response, rendered or compared,
//! and dropped. Equality is structural.
//!
//! Record fields keep the order the service sent them in.
//!
//! A `class` this crate does not know about deserializes to [`Value::Unknown`] instead
//! of failing the whole response; the renderer turns it into an empty string.

use crate::error::{FiretruckError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NAMESPACE_SEPARATOR: &str = "::";

/// A name plus the namespace segments it lives in, e.g. `Ns::Inner::Tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    #[serde(default)]
    pub qualifier: Vec<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn new<I, S>(qualifier: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            qualifier: qualifier.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }

    /// A name without any namespace.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            qualifier: Vec::new(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.qualifier {
            write!(f, "{}{}", segment, NAMESPACE_SEPARATOR)?;
        }
        f.write_str(&self.name)
    }
}

impl FromStr for QualifiedName {
    type Err = FiretruckError;

    fn from_str(s: &str) -> Result<Self> {
        let mut segments: Vec<String> = s
            .split(NAMESPACE_SEPARATOR)
            .map(|seg| seg.trim().to_string())
            .collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(FiretruckError::Api(format!("Invalid qualified name: {:?}", s)));
        }
        // split always yields at least one element
        let name = segments.pop().unwrap_or_default();
        Ok(Self {
            qualifier: segments,
            name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum Value {
    #[serde(rename = "IntValue")]
    Int { i: i64 },

    #[serde(rename = "StringValue")]
    String { s: String },

    #[serde(rename = "FloatValue")]
    Float { d: f64 },

    /// The serialized instant is kept verbatim; it is only parsed for ordering.
    #[serde(rename = "InstantValue")]
    Instant { instant: String },

    #[serde(rename = "BooleanValue")]
    Boolean { b: bool },

    #[serde(rename = "RecordValue")]
    Record {
        #[serde(rename = "recordTag")]
        record_tag: QualifiedName,
        #[serde(default)]
        fields: IndexMap<String, Value>,
    },

    #[serde(rename = "ListValue")]
    List {
        #[serde(default)]
        elements: Vec<Value>,
    },

    #[serde(rename = "ConstructorValue")]
    Constructor {
        name: QualifiedName,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Placeholder for values that cannot be written back as syntax.
    #[serde(rename = "PseudoValue")]
    Pseudo {
        #[serde(rename = "boundName")]
        bound_name: QualifiedName,
    },

    #[serde(other)]
    Unknown,
}

impl Value {
    pub fn int(i: i64) -> Self {
        Value::Int { i }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String { s: s.into() }
    }

    pub fn float(d: f64) -> Self {
        Value::Float { d }
    }

    pub fn instant(instant: impl Into<String>) -> Self {
        Value::Instant {
            instant: instant.into(),
        }
    }

    pub fn boolean(b: bool) -> Self {
        Value::Boolean { b }
    }

    pub fn record<I, K>(record_tag: QualifiedName, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Record {
            record_tag,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Value::List { elements }
    }

    pub fn constructor(name: QualifiedName, args: Vec<Value>) -> Self {
        Value::Constructor { name, args }
    }

    pub fn pseudo(bound_name: QualifiedName) -> Self {
        Value::Pseudo { bound_name }
    }

    /// Name of the value kind, as used on the wire.
    pub fn class(&self) -> &'static str {
        match self {
            Value::Int { .. } => "IntValue",
            Value::String { .. } => "StringValue",
            Value::Float { .. } => "FloatValue",
            Value::Instant { .. } => "InstantValue",
            Value::Boolean { .. } => "BooleanValue",
            Value::Record { .. } => "RecordValue",
            Value::List { .. } => "ListValue",
            Value::Constructor { .. } => "ConstructorValue",
            Value::Pseudo { .. } => "PseudoValue",
            Value::Unknown => "Unknown",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int { i } => Some(*i),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<&str> {
        match self {
            Value::Instant { instant } => Some(instant),
            _ => None,
        }
    }

    pub fn record_tag(&self) -> Option<&QualifiedName> {
        match self {
            Value::Record { record_tag, .. } => Some(record_tag),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record { fields, .. } => fields.get(name),
            _ => None,
        }
    }

    /// Parses a value from its JSON wire form, as accepted on the command line.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| FiretruckError::Api(format!("Invalid value {:?}: {}", input, e)))
    }
}
