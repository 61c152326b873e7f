//! Small helpers shared by the wire codecs.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Builds the single-key object `{key: value}`.
pub(crate) fn tagged(key: &str, value: Value) -> Value {
    let mut object = Map::with_capacity(1);
    object.insert(key.to_owned(), value);
    Value::Object(object)
}

/// Names the JSON type of a value for error messages.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Server-managed metadata block. Only the id is kept.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sys {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts either a list of strings or the single-string shorthand the API
/// uses for "everything" (`"all"`).
pub(crate) fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}
