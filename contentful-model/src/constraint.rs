//! Constraint trees scoping role policies.
//!
//! A constraint is a recursive boolean expression. Leaves compare a document
//! property against a value; `and`/`or` own an ordered list of children and
//! `not` owns exactly one. Each node is a single-key JSON object whose key
//! names the variant:
//!
//! ```json
//! {"and": [
//!   {"equals": [{"doc": "sys.type"}, "Entry"]},
//!   {"not": {"equals": [{"doc": "sys.contentType.sys.id"}, "123"]}}
//! ]}
//! ```
//!
//! The property operand is wrapped as `{"doc": path}` while the value is a
//! bare scalar. Child order is part of the wire contract and is preserved.

use crate::wire::{kind, tagged};
use contentful_dispatch::{DecodeContext, Registry, Resolution, Source};
use contentful_types::{DecodeLimits, Error, JsonScalar, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const AND: &str = "and";
pub const OR: &str = "or";
pub const NOT: &str = "not";
pub const EQUALS: &str = "equals";
pub const IN: &str = "in";
pub const PATHS: &str = "paths";

/// Key wrapping a document property path.
const DOC: &str = "doc";

static REGISTRY: Lazy<Registry<Constraint>> = Lazy::new(|| {
    Registry::builder("constraint")
        .register(AND, decode_and)
        .register(OR, decode_or)
        .register(NOT, decode_not)
        .register(EQUALS, decode_equals)
        .register(IN, decode_in)
        .register(PATHS, decode_paths)
        .build()
});

/// The process-wide constraint registry.
pub fn registry() -> &'static Registry<Constraint> {
    &REGISTRY
}

/// A node of a policy constraint tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Equals(Equals),
    In(In),
    Paths(Paths),
    Not(Box<Constraint>),
    And(Vec<Constraint>),
    Or(Vec<Constraint>),
}

/// `property == value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equals {
    pub property: String,
    pub value: JsonScalar,
}

/// `property` is one of `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    pub property: String,
    pub values: Vec<JsonScalar>,
}

/// Restricts a policy to the given document paths (`fields.title.%`).
///
/// Holds at least one path; the wire form rejects an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    paths: Vec<String>,
}

impl Paths {
    pub fn new<P: Into<String>>(
        first: impl Into<String>,
        rest: impl IntoIterator<Item = P>,
    ) -> Self {
        let mut paths = vec![first.into()];
        paths.extend(rest.into_iter().map(Into::into));
        Self { paths }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl Constraint {
    pub fn equals(property: impl Into<String>, value: impl Into<JsonScalar>) -> Self {
        Self::Equals(Equals {
            property: property.into(),
            value: value.into(),
        })
    }

    pub fn in_values<V>(property: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<JsonScalar>,
    {
        Self::In(In {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn paths<P: Into<String>>(
        first: impl Into<String>,
        rest: impl IntoIterator<Item = P>,
    ) -> Self {
        Self::Paths(Paths::new(first, rest))
    }

    /// A `paths` constraint over a single document path.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Paths(Paths::new(path, std::iter::empty::<String>()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Constraint) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(children: impl IntoIterator<Item = Constraint>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Constraint>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    /// The wire key naming this variant.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::Equals(_) => EQUALS,
            Self::In(_) => IN,
            Self::Paths(_) => PATHS,
            Self::Not(_) => NOT,
            Self::And(_) => AND,
            Self::Or(_) => OR,
        }
    }

    /// Child constraints of `and`/`or`; the single child of `not`.
    pub fn children(&self) -> &[Constraint] {
        match self {
            Self::And(children) | Self::Or(children) => children,
            Self::Not(inner) => std::slice::from_ref(inner.as_ref()),
            Self::Equals(_) | Self::In(_) | Self::Paths(_) => &[],
        }
    }

    /// Nesting depth, counting this node as 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Constraint::depth).max().unwrap_or(0)
    }
}

/// Decodes a constraint tree with explicit limits.
pub fn decode_with(value: &Value, limits: DecodeLimits) -> Result<Constraint> {
    decode(value, DecodeContext::new(limits))
}

/// Decodes one constraint node (and, recursively, its children).
pub fn decode(value: &Value, ctx: DecodeContext) -> Result<Constraint> {
    let ctx = ctx.descend()?;
    let object = value.as_object().ok_or_else(|| {
        Error::MalformedConstraint(format!("expected an object, found {}", kind(value)))
    })?;
    if object.is_empty() {
        return Err(Error::MalformedConstraint("empty constraint object".into()));
    }

    match REGISTRY.resolve(Source::KeyPresence(object)) {
        Resolution::Matched {
            discriminator,
            decode,
            payload,
            unregistered,
        } => {
            if !unregistered.is_empty() {
                return Err(Error::MalformedConstraint(format!(
                    "`{discriminator}` constraint has unexpected sibling keys: {}",
                    unregistered.join(", ")
                )));
            }
            decode(payload, ctx)
        }
        Resolution::Unmatched { discriminator } => Err(REGISTRY.unknown(discriminator)),
        Resolution::Ambiguous { discriminators } => Err(Error::MalformedConstraint(format!(
            "object names more than one constraint: {}",
            discriminators.join(", ")
        ))),
    }
}

/// Encodes a constraint tree to its canonical JSON form.
pub fn encode(constraint: &Constraint) -> Value {
    let body = match constraint {
        Constraint::Equals(eq) => Value::Array(vec![doc(&eq.property), eq.value.to_value()]),
        Constraint::In(within) => Value::Array(vec![
            doc(&within.property),
            Value::Array(within.values.iter().map(JsonScalar::to_value).collect()),
        ]),
        Constraint::Paths(paths) => {
            Value::Array(paths.paths.iter().map(String::as_str).map(doc).collect())
        }
        Constraint::Not(inner) => encode(inner),
        Constraint::And(children) | Constraint::Or(children) => {
            Value::Array(children.iter().map(encode).collect())
        }
    };
    tagged(constraint.discriminator(), body)
}

fn doc(property: &str) -> Value {
    tagged(DOC, Value::String(property.to_owned()))
}

fn decode_children(key: &str, value: &Value, ctx: DecodeContext) -> Result<Vec<Constraint>> {
    let items = value.as_array().ok_or_else(|| {
        Error::MalformedConstraint(format!("`{key}` expects an array, found {}", kind(value)))
    })?;
    items.iter().map(|item| decode(item, ctx)).collect()
}

fn decode_and(value: &Value, ctx: DecodeContext) -> Result<Constraint> {
    decode_children(AND, value, ctx).map(Constraint::And)
}

fn decode_or(value: &Value, ctx: DecodeContext) -> Result<Constraint> {
    decode_children(OR, value, ctx).map(Constraint::Or)
}

fn decode_not(value: &Value, ctx: DecodeContext) -> Result<Constraint> {
    if !value.is_object() {
        return Err(Error::MalformedConstraint(format!(
            "`not` wraps exactly one constraint object, found {}",
            kind(value)
        )));
    }
    decode(value, ctx).map(Constraint::not)
}

fn decode_equals(value: &Value, _ctx: DecodeContext) -> Result<Constraint> {
    let [property, operand] = pair(EQUALS, value)?;
    Ok(Constraint::Equals(Equals {
        property: decode_doc(EQUALS, property)?,
        value: decode_scalar(EQUALS, operand)?,
    }))
}

fn decode_in(value: &Value, _ctx: DecodeContext) -> Result<Constraint> {
    let [property, operand] = pair(IN, value)?;
    let values = operand.as_array().ok_or_else(|| {
        Error::MalformedConstraint(format!("`in` expects a list of values, found {}", kind(operand)))
    })?;
    Ok(Constraint::In(In {
        property: decode_doc(IN, property)?,
        values: values
            .iter()
            .map(|v| decode_scalar(IN, v))
            .collect::<Result<_>>()?,
    }))
}

fn decode_paths(value: &Value, _ctx: DecodeContext) -> Result<Constraint> {
    let items = value.as_array().ok_or_else(|| {
        Error::MalformedConstraint(format!("`paths` expects an array, found {}", kind(value)))
    })?;
    let Some((first, rest)) = items.split_first() else {
        return Err(Error::MalformedConstraint("`paths` needs at least one path".into()));
    };
    let first = decode_doc(PATHS, first)?;
    let rest: Vec<String> = rest
        .iter()
        .map(|item| decode_doc(PATHS, item))
        .collect::<Result<_>>()?;
    Ok(Constraint::paths(first, rest))
}

fn pair<'a>(key: &str, value: &'a Value) -> Result<[&'a Value; 2]> {
    match value.as_array().map(Vec::as_slice) {
        Some([first, second]) => Ok([first, second]),
        Some(items) => Err(Error::MalformedConstraint(format!(
            "`{key}` expects two operands, found {}",
            items.len()
        ))),
        None => Err(Error::MalformedConstraint(format!(
            "`{key}` expects an array, found {}",
            kind(value)
        ))),
    }
}

fn decode_doc(key: &str, value: &Value) -> Result<String> {
    let path = value
        .as_object()
        .filter(|object| object.len() == 1)
        .and_then(|object| object.get(DOC))
        .and_then(Value::as_str);
    path.map(str::to_owned).ok_or_else(|| {
        Error::MalformedConstraint(format!("`{key}` property must be {{\"doc\": \"<path>\"}}"))
    })
}

fn decode_scalar(key: &str, value: &Value) -> Result<JsonScalar> {
    JsonScalar::from_value(value).ok_or_else(|| {
        Error::MalformedConstraint(format!(
            "`{key}` compares against a scalar, found {}",
            kind(value)
        ))
    })
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(&value, DecodeContext::default()).map_err(serde::de::Error::custom)
    }
}
