//! Field validations attached to content-type fields.
//!
//! Each validation object carries exactly one rule key (`size`, `regexp`,
//! `linkContentType`, ...) and optionally a `message` shown to editors when
//! the rule fails. The rule vocabulary grows on the server side, so objects
//! the client cannot model decode to [`FieldValidator::Opaque`] and are
//! re-emitted untouched.

use crate::wire::kind;
use contentful_dispatch::{DecodeContext, Registry, Resolution, Source};
use contentful_types::{Error, JsonScalar, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use tracing::debug;

pub const LINK_CONTENT_TYPE: &str = "linkContentType";
pub const IN: &str = "in";
pub const LINK_MIMETYPE_GROUP: &str = "linkMimetypeGroup";
pub const SIZE: &str = "size";
pub const RANGE: &str = "range";
pub const REGEXP: &str = "regexp";
pub const PROHIBIT_REGEXP: &str = "prohibitRegexp";
pub const UNIQUE: &str = "unique";
pub const DATE_RANGE: &str = "dateRange";
pub const ASSET_FILE_SIZE: &str = "assetFileSize";
pub const ASSET_IMAGE_DIMENSIONS: &str = "assetImageDimensions";

/// Companion key holding the editor-facing failure message.
pub const MESSAGE: &str = "message";

static REGISTRY: Lazy<Registry<FieldValidator>> = Lazy::new(|| {
    Registry::<FieldValidator>::builder("validator")
        .register(LINK_CONTENT_TYPE, |v, _| {
            strings(LINK_CONTENT_TYPE, v).map(FieldValidator::LinkContentType)
        })
        .register(IN, decode_in)
        .register(LINK_MIMETYPE_GROUP, |v, _| {
            strings(LINK_MIMETYPE_GROUP, v).map(FieldValidator::MimeTypeGroup)
        })
        .register(SIZE, |v, _| {
            Bounds::decode(SIZE, v, Value::as_u64).map(FieldValidator::Size)
        })
        .register(RANGE, |v, _| {
            Bounds::decode(RANGE, v, number).map(FieldValidator::Range)
        })
        .register(REGEXP, |v, _| {
            RegexPattern::decode(REGEXP, v).map(FieldValidator::Regex)
        })
        .register(PROHIBIT_REGEXP, |v, _| {
            RegexPattern::decode(PROHIBIT_REGEXP, v).map(FieldValidator::ProhibitRegex)
        })
        .register(UNIQUE, decode_unique)
        .register(DATE_RANGE, |v, _| {
            Bounds::decode(DATE_RANGE, v, string).map(FieldValidator::DateRange)
        })
        .register(ASSET_FILE_SIZE, |v, _| {
            Bounds::decode(ASSET_FILE_SIZE, v, Value::as_u64).map(FieldValidator::FileSize)
        })
        .register(ASSET_IMAGE_DIMENSIONS, decode_image_dimensions)
        .build()
});

/// The process-wide validator registry.
pub fn registry() -> &'static Registry<FieldValidator> {
    &REGISTRY
}

/// A validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValidator {
    /// Linked entries must be of one of these content types.
    LinkContentType(Vec<String>),
    /// Value must be one of the listed values.
    In(Vec<JsonScalar>),
    /// Linked assets must belong to one of these MIME type groups.
    MimeTypeGroup(Vec<String>),
    /// Length of text or number of list items.
    Size(Bounds<u64>),
    /// Numeric value range.
    Range(Bounds<Number>),
    Regex(RegexPattern),
    ProhibitRegex(RegexPattern),
    Unique(bool),
    /// ISO-8601 date range; bounds are kept as the server's strings.
    DateRange(Bounds<String>),
    /// Asset file size in bytes.
    FileSize(Bounds<u64>),
    /// Image width and height in pixels.
    ImageDimensions {
        width: Option<Bounds<u64>>,
        height: Option<Bounds<u64>>,
    },
    /// A rule this client does not model, kept verbatim.
    Opaque(OpaqueRule),
}

/// Keys of a validation object this client cannot model, in wire order.
///
/// Never empty, never holds `message` (that lives in
/// [`Validation::message`]) and never reads as a modelled rule.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueRule(Map<String, Value>);

/// Inclusive bounds; either side may be open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexPattern {
    pub pattern: String,
    pub flags: Option<String>,
}

/// One entry of a field's `validations` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub rule: FieldValidator,
    pub message: Option<String>,
}

impl<T> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: T) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: T) -> Self {
        Self::new(None, Some(max))
    }

    pub fn between(min: T, max: T) -> Self {
        Self::new(Some(min), Some(max))
    }

    fn decode(key: &str, value: &Value, read: fn(&Value) -> Option<T>) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::MalformedValidator(format!("`{key}` expects an object, found {}", kind(value)))
        })?;
        let bound = |side: &str| -> Result<Option<T>> {
            match object.get(side) {
                None | Some(Value::Null) => Ok(None),
                Some(raw) => read(raw).map(Some).ok_or_else(|| {
                    Error::MalformedValidator(format!(
                        "`{key}.{side}` has the wrong type: {}",
                        kind(raw)
                    ))
                }),
            }
        };
        Ok(Self {
            min: bound("min")?,
            max: bound("max")?,
        })
    }
}

impl<T: Clone + Into<Value>> Bounds<T> {
    fn encode(&self) -> Value {
        let mut object = Map::new();
        if let Some(min) = &self.min {
            object.insert("min".into(), min.clone().into());
        }
        if let Some(max) = &self.max {
            object.insert("max".into(), max.clone().into());
        }
        Value::Object(object)
    }
}

impl RegexPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    fn decode(key: &str, value: &Value) -> Result<Self> {
        let pattern = value.get("pattern").and_then(Value::as_str).ok_or_else(|| {
            Error::MalformedValidator(format!("`{key}` needs a string `pattern`"))
        })?;
        let flags = match value.get("flags") {
            None | Some(Value::Null) => None,
            Some(Value::String(flags)) => Some(flags.clone()),
            Some(other) => {
                return Err(Error::MalformedValidator(format!(
                    "`{key}.flags` must be a string, found {}",
                    kind(other)
                )));
            }
        };
        Ok(Self {
            pattern: pattern.to_owned(),
            flags,
        })
    }

    fn encode(&self) -> Value {
        let mut object = Map::new();
        object.insert("pattern".into(), Value::String(self.pattern.clone()));
        if let Some(flags) = &self.flags {
            object.insert("flags".into(), Value::String(flags.clone()));
        }
        Value::Object(object)
    }
}

impl OpaqueRule {
    /// Wraps raw rule keys, rejecting maps that would not decode back to an
    /// opaque rule.
    pub fn new(raw: Map<String, Value>) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::MalformedValidator("opaque rule has no keys".into()));
        }
        if raw.contains_key(MESSAGE) {
            return Err(Error::MalformedValidator(
                "`message` belongs to the validation, not the rule".into(),
            ));
        }
        let stays_opaque = match REGISTRY.resolve(Source::KeyPresence(&raw)) {
            Resolution::Unmatched { .. } => true,
            Resolution::Matched { unregistered, .. } => !unregistered.is_empty(),
            Resolution::Ambiguous { .. } => false,
        };
        if !stays_opaque {
            return Err(Error::MalformedValidator(
                "opaque rule reads as a modelled rule".into(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl FieldValidator {
    pub fn size(min: Option<u64>, max: Option<u64>) -> Self {
        Self::Size(Bounds::new(min, max))
    }

    pub fn link_content_type<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::LinkContentType(ids.into_iter().map(Into::into).collect())
    }

    /// Wire key of the rule, or `None` for opaque rules.
    pub fn discriminator(&self) -> Option<&'static str> {
        Some(match self {
            Self::LinkContentType(_) => LINK_CONTENT_TYPE,
            Self::In(_) => IN,
            Self::MimeTypeGroup(_) => LINK_MIMETYPE_GROUP,
            Self::Size(_) => SIZE,
            Self::Range(_) => RANGE,
            Self::Regex(_) => REGEXP,
            Self::ProhibitRegex(_) => PROHIBIT_REGEXP,
            Self::Unique(_) => UNIQUE,
            Self::DateRange(_) => DATE_RANGE,
            Self::FileSize(_) => ASSET_FILE_SIZE,
            Self::ImageDimensions { .. } => ASSET_IMAGE_DIMENSIONS,
            Self::Opaque(_) => return None,
        })
    }

    /// The rule part of the wire object: the rule key and its parameters, or
    /// the preserved keys of an opaque rule.
    fn encode_rule(&self) -> Map<String, Value> {
        let (key, params) = match self {
            Self::LinkContentType(items) => (LINK_CONTENT_TYPE, string_list(items)),
            Self::MimeTypeGroup(items) => (LINK_MIMETYPE_GROUP, string_list(items)),
            Self::In(values) => (
                IN,
                Value::Array(values.iter().map(JsonScalar::to_value).collect()),
            ),
            Self::Size(bounds) => (SIZE, bounds.encode()),
            Self::FileSize(bounds) => (ASSET_FILE_SIZE, bounds.encode()),
            Self::Range(bounds) => (RANGE, bounds.encode()),
            Self::DateRange(bounds) => (DATE_RANGE, bounds.encode()),
            Self::Regex(pattern) => (REGEXP, pattern.encode()),
            Self::ProhibitRegex(pattern) => (PROHIBIT_REGEXP, pattern.encode()),
            Self::Unique(flag) => (UNIQUE, Value::Bool(*flag)),
            Self::ImageDimensions { width, height } => {
                let mut object = Map::new();
                if let Some(width) = width {
                    object.insert("width".into(), width.encode());
                }
                if let Some(height) = height {
                    object.insert("height".into(), height.encode());
                }
                (ASSET_IMAGE_DIMENSIONS, Value::Object(object))
            }
            Self::Opaque(rule) => return rule.0.clone(),
        };
        let mut object = Map::with_capacity(2);
        object.insert(key.to_owned(), params);
        object
    }
}

impl Validation {
    pub fn new(rule: FieldValidator) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<FieldValidator> for Validation {
    fn from(rule: FieldValidator) -> Self {
        Self::new(rule)
    }
}

/// Decodes one validation object.
pub fn decode(value: &Value) -> Result<Validation> {
    let object = value.as_object().ok_or_else(|| {
        Error::MalformedValidator(format!("expected an object, found {}", kind(value)))
    })?;
    if object.is_empty() {
        return Err(Error::MalformedValidator("empty validation object".into()));
    }

    match REGISTRY.resolve(Source::KeyPresence(object)) {
        Resolution::Matched {
            discriminator,
            decode,
            payload,
            unregistered,
        } => {
            if unregistered.iter().any(|key| *key != MESSAGE) {
                debug!(
                    "validation `{}` carries unmodelled keys {:?}, keeping it opaque",
                    discriminator, unregistered
                );
                return opaque(object);
            }
            Ok(Validation {
                rule: decode(payload, DecodeContext::default())?,
                message: decode_message(object)?,
            })
        }
        Resolution::Unmatched { discriminator } => {
            if object.len() == 1 && object.contains_key(MESSAGE) {
                return Err(Error::MalformedValidator(
                    "validation has a message but no rule".into(),
                ));
            }
            debug!("unknown validation rule {:?}, keeping it opaque", discriminator);
            opaque(object)
        }
        Resolution::Ambiguous { discriminators } => Err(Error::MalformedValidator(format!(
            "object names more than one rule: {}",
            discriminators.join(", ")
        ))),
    }
}

/// Encodes a validation: the rule key, then `message` when set. Opaque rules
/// re-emit their preserved keys in their original order.
pub fn encode(validation: &Validation) -> Value {
    let mut object = validation.rule.encode_rule();
    if let Some(message) = &validation.message {
        object.insert(MESSAGE.into(), Value::String(message.clone()));
    }
    Value::Object(object)
}

/// Keeps an unmodelled rule verbatim, lifting its `message` out like the
/// typed rules do. Callers have already ruled out message-only and
/// single-modelled-key objects.
fn opaque(object: &Map<String, Value>) -> Result<Validation> {
    let raw = object
        .iter()
        .filter(|(key, _)| key.as_str() != MESSAGE)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Ok(Validation {
        rule: FieldValidator::Opaque(OpaqueRule(raw)),
        message: decode_message(object)?,
    })
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

fn decode_message(object: &Map<String, Value>) -> Result<Option<String>> {
    match object.get(MESSAGE) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(message)) => Ok(Some(message.clone())),
        Some(other) => Err(Error::MalformedValidator(format!(
            "`message` must be a string, found {}",
            kind(other)
        ))),
    }
}

fn decode_in(value: &Value, _ctx: DecodeContext) -> Result<FieldValidator> {
    let items = value.as_array().ok_or_else(|| {
        Error::MalformedValidator(format!("`{IN}` expects an array, found {}", kind(value)))
    })?;
    items
        .iter()
        .map(|item| {
            JsonScalar::from_value(item).ok_or_else(|| {
                Error::MalformedValidator(format!(
                    "`{IN}` values must be scalars, found {}",
                    kind(item)
                ))
            })
        })
        .collect::<Result<_>>()
        .map(FieldValidator::In)
}

fn decode_unique(value: &Value, _ctx: DecodeContext) -> Result<FieldValidator> {
    value.as_bool().map(FieldValidator::Unique).ok_or_else(|| {
        Error::MalformedValidator(format!("`{UNIQUE}` expects a boolean, found {}", kind(value)))
    })
}

fn decode_image_dimensions(value: &Value, _ctx: DecodeContext) -> Result<FieldValidator> {
    let object = value.as_object().ok_or_else(|| {
        Error::MalformedValidator(format!(
            "`{ASSET_IMAGE_DIMENSIONS}` expects an object, found {}",
            kind(value)
        ))
    })?;
    let side = |name: &str| -> Result<Option<Bounds<u64>>> {
        match object.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => Bounds::decode(ASSET_IMAGE_DIMENSIONS, raw, Value::as_u64).map(Some),
        }
    };
    Ok(FieldValidator::ImageDimensions {
        width: side("width")?,
        height: side("height")?,
    })
}

fn strings(key: &str, value: &Value) -> Result<Vec<String>> {
    let items = value.as_array().ok_or_else(|| {
        Error::MalformedValidator(format!("`{key}` expects an array, found {}", kind(value)))
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_owned).ok_or_else(|| {
                Error::MalformedValidator(format!("`{key}` entries must be strings"))
            })
        })
        .collect()
}

fn number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

fn string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

impl Serialize for Validation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Validation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(&value).map_err(serde::de::Error::custom)
    }
}
