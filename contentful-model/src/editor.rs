//! Editor interfaces and per-widget control settings.
//!
//! A control's `settings` object has no type tag of its own; its shape is
//! decided by the sibling `widgetId`. Widgets without a registered shape keep
//! their settings as an opaque key/value bag so interfaces built for widgets
//! this client predates still load.

use crate::wire::kind;
use contentful_dispatch::{DecodeContext, Registry, Resolution, Source};
use contentful_types::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Ids of the built-in editor widgets.
pub mod widget {
    pub const SINGLE_LINE: &str = "singleLine";
    pub const MULTIPLE_LINE: &str = "multipleLine";
    pub const MARKDOWN: &str = "markdown";
    pub const DROPDOWN: &str = "dropdown";
    pub const RADIO: &str = "radio";
    pub const RATING: &str = "rating";
    pub const BOOLEAN: &str = "boolean";
    pub const DATE_PICKER: &str = "datePicker";
    pub const LOCATION_EDITOR: &str = "locationEditor";
    pub const OBJECT_EDITOR: &str = "objectEditor";
    pub const URL_EDITOR: &str = "urlEditor";
    pub const SLUG_EDITOR: &str = "slugEditor";
    pub const LIST_INPUT: &str = "listInput";
    pub const CHECKBOX: &str = "checkbox";
    pub const TAG_EDITOR: &str = "tagEditor";
    pub const NUMBER_EDITOR: &str = "numberEditor";
    pub const ENTRY_LINK_EDITOR: &str = "entryLinkEditor";
    pub const ENTRY_CARD_EDITOR: &str = "entryCardEditor";
    pub const ENTRY_LINKS_EDITOR: &str = "entryLinksEditor";
    pub const ENTRY_CARDS_EDITOR: &str = "entryCardsEditor";
    pub const ASSET_LINK_EDITOR: &str = "assetLinkEditor";
    pub const ASSET_LINKS_EDITOR: &str = "assetLinksEditor";
    pub const ASSET_GALLERY_EDITOR: &str = "assetGalleryEditor";
}

const HELP_TEXT: &str = "helpText";
const TRUE_LABEL: &str = "trueLabel";
const FALSE_LABEL: &str = "falseLabel";
const NUMBER_OF_STARS: &str = "numberOfStars";
const FORMAT: &str = "format";
const AMPM: &str = "ampm";

static REGISTRY: Lazy<Registry<SettingsShape>> = Lazy::new(|| {
    Registry::builder("widget")
        .register(widget::BOOLEAN, decode_boolean)
        .register(widget::RATING, decode_rating)
        .register(widget::DATE_PICKER, decode_date_picker)
        .build()
});

/// The process-wide widget-settings registry.
pub fn registry() -> &'static Registry<SettingsShape> {
    &REGISTRY
}

/// Settings of one editor control.
///
/// `help_text` is common to every widget and lives outside the shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlSettings {
    pub help_text: Option<String>,
    pub shape: SettingsShape,
}

/// Widget-specific part of [`ControlSettings`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsShape {
    Boolean {
        true_label: Option<String>,
        false_label: Option<String>,
    },
    Rating {
        number_of_stars: Option<u32>,
    },
    DatePicker {
        format: Option<DateFormat>,
        clock_format: Option<ClockFormat>,
    },
    /// Settings of a widget without a registered shape, minus `helpText`.
    Opaque(Map<String, Value>),
}

impl Default for SettingsShape {
    fn default() -> Self {
        Self::Opaque(Map::new())
    }
}

impl SettingsShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Rating { .. } => "rating",
            Self::DatePicker { .. } => "datePicker",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Widget id this shape is registered for; `None` for opaque bags.
    pub fn widget_id(&self) -> Option<&'static str> {
        match self {
            Self::Boolean { .. } => Some(widget::BOOLEAN),
            Self::Rating { .. } => Some(widget::RATING),
            Self::DatePicker { .. } => Some(widget::DATE_PICKER),
            Self::Opaque(_) => None,
        }
    }
}

/// Date-picker display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// Date without time.
    DateOnly,
    /// Date and time.
    Time,
    /// Date, time and timezone.
    TimeZ,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateOnly => "dateonly",
            Self::Time => "time",
            Self::TimeZ => "timeZ",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dateonly" => Some(Self::DateOnly),
            "time" => Some(Self::Time),
            "timeZ" => Some(Self::TimeZ),
            _ => None,
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date-picker clock, stored under `ampm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockFormat {
    Twelve,
    TwentyFour,
}

impl ClockFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twelve => "12",
            Self::TwentyFour => "24",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "12" => Some(Self::Twelve),
            "24" => Some(Self::TwentyFour),
            _ => None,
        }
    }
}

impl ControlSettings {
    pub fn boolean(true_label: Option<String>, false_label: Option<String>) -> Self {
        Self::from_shape(SettingsShape::Boolean {
            true_label,
            false_label,
        })
    }

    pub fn rating(number_of_stars: u32) -> Self {
        Self::from_shape(SettingsShape::Rating {
            number_of_stars: Some(number_of_stars),
        })
    }

    pub fn date_picker(format: DateFormat) -> Self {
        Self::from_shape(SettingsShape::DatePicker {
            format: Some(format),
            clock_format: None,
        })
    }

    pub fn opaque(bag: Map<String, Value>) -> Self {
        Self::from_shape(SettingsShape::Opaque(bag))
    }

    pub fn from_shape(shape: SettingsShape) -> Self {
        Self {
            help_text: None,
            shape,
        }
    }

    #[must_use]
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }
}

/// Decodes a `settings` object using the shape registered for `widget_id`.
pub fn decode_settings(widget_id: &str, value: &Value) -> Result<ControlSettings> {
    let object = value.as_object().ok_or_else(|| {
        Error::MalformedSettings(format!("expected an object, found {}", kind(value)))
    })?;
    let help_text = optional_string(object, HELP_TEXT)?;

    let shape = match REGISTRY.resolve(Source::Field {
        value: widget_id,
        payload: value,
    }) {
        Resolution::Matched { decode, payload, .. } => decode(payload, DecodeContext::default())?,
        Resolution::Unmatched { .. } => {
            debug!("no settings shape for widget {:?}, keeping settings opaque", widget_id);
            let bag = object
                .iter()
                .filter(|(key, _)| key.as_str() != HELP_TEXT)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            SettingsShape::Opaque(bag)
        }
        Resolution::Ambiguous { discriminators } => {
            return Err(Error::MalformedSettings(format!(
                "widget resolves to several shapes: {}",
                discriminators.join(", ")
            )));
        }
    };
    Ok(ControlSettings { help_text, shape })
}

/// Encodes settings: shape keys in fixed order, `helpText` last, unset
/// fields omitted.
pub fn encode_settings(settings: &ControlSettings) -> Value {
    let mut object = Map::new();
    match &settings.shape {
        SettingsShape::Boolean {
            true_label,
            false_label,
        } => {
            put_string(&mut object, TRUE_LABEL, true_label.as_deref());
            put_string(&mut object, FALSE_LABEL, false_label.as_deref());
        }
        SettingsShape::Rating { number_of_stars } => {
            if let Some(stars) = number_of_stars {
                object.insert(NUMBER_OF_STARS.into(), Value::from(*stars));
            }
        }
        SettingsShape::DatePicker {
            format,
            clock_format,
        } => {
            put_string(&mut object, FORMAT, format.as_ref().map(DateFormat::as_str));
            put_string(&mut object, AMPM, clock_format.as_ref().map(ClockFormat::as_str));
        }
        SettingsShape::Opaque(bag) => {
            for (key, value) in bag {
                if key != HELP_TEXT {
                    object.insert(key.clone(), value.clone());
                }
            }
        }
    }
    put_string(&mut object, HELP_TEXT, settings.help_text());
    Value::Object(object)
}

fn put_string(object: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        object.insert(key.to_owned(), Value::String(value.to_owned()));
    }
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::MalformedSettings(format!(
            "`{key}` must be a string, found {}",
            kind(other)
        ))),
    }
}

fn note_unknown_keys(object: &Map<String, Value>, shape: &str, known: &[&str]) {
    for key in object.keys() {
        if key != HELP_TEXT && !known.contains(&key.as_str()) {
            debug!("dropping unknown {} setting {:?}", shape, key);
        }
    }
}

fn decode_boolean(value: &Value, _ctx: DecodeContext) -> Result<SettingsShape> {
    let object = value.as_object().cloned().unwrap_or_default();
    note_unknown_keys(&object, widget::BOOLEAN, &[TRUE_LABEL, FALSE_LABEL]);
    Ok(SettingsShape::Boolean {
        true_label: optional_string(&object, TRUE_LABEL)?,
        false_label: optional_string(&object, FALSE_LABEL)?,
    })
}

fn decode_rating(value: &Value, _ctx: DecodeContext) -> Result<SettingsShape> {
    let object = value.as_object().cloned().unwrap_or_default();
    note_unknown_keys(&object, widget::RATING, &[NUMBER_OF_STARS]);
    let number_of_stars = match object.get(NUMBER_OF_STARS) {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            raw.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    Error::MalformedSettings(format!(
                        "`{NUMBER_OF_STARS}` must be a non-negative integer, found {raw}"
                    ))
                })?,
        ),
    };
    Ok(SettingsShape::Rating { number_of_stars })
}

fn decode_date_picker(value: &Value, _ctx: DecodeContext) -> Result<SettingsShape> {
    let object = value.as_object().cloned().unwrap_or_default();
    note_unknown_keys(&object, widget::DATE_PICKER, &[FORMAT, AMPM]);
    let format = optional_string(&object, FORMAT)?
        .map(|raw| {
            DateFormat::parse(&raw).ok_or_else(|| {
                Error::MalformedSettings(format!("unknown date format {raw:?}"))
            })
        })
        .transpose()?;
    let clock_format = optional_string(&object, AMPM)?
        .map(|raw| {
            ClockFormat::parse(&raw).ok_or_else(|| {
                Error::MalformedSettings(format!("unknown clock format {raw:?}"))
            })
        })
        .transpose()?;
    Ok(SettingsShape::DatePicker {
        format,
        clock_format,
    })
}

/// One field's editor control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ControlWire")]
pub struct EditorInterfaceControl {
    pub field_id: String,
    pub widget_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ControlSettings>,
}

impl EditorInterfaceControl {
    pub fn new(field_id: impl Into<String>, widget_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            widget_id: widget_id.into(),
            settings: None,
        }
    }

    /// Attaches settings, rejecting a shape that does not belong to the
    /// control's widget. Opaque bags are only accepted for widgets without a
    /// registered shape.
    pub fn with_settings(mut self, settings: ControlSettings) -> Result<Self> {
        let fits = match settings.shape.widget_id() {
            Some(id) => id == self.widget_id,
            None => !REGISTRY.contains(&self.widget_id),
        };
        if !fits {
            return Err(Error::SettingsMismatch {
                widget_id: self.widget_id,
                shape: settings.shape.name(),
            });
        }
        self.settings = Some(settings);
        Ok(self)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ControlWire {
    field_id: String,
    widget_id: String,
    #[serde(default)]
    settings: Option<Value>,
}

impl TryFrom<ControlWire> for EditorInterfaceControl {
    type Error = Error;

    fn try_from(wire: ControlWire) -> Result<Self> {
        let settings = wire
            .settings
            .map(|raw| decode_settings(&wire.widget_id, &raw))
            .transpose()?;
        Ok(Self {
            field_id: wire.field_id,
            widget_id: wire.widget_id,
            settings,
        })
    }
}

/// Per-content-type editor configuration: one control per field, in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorInterface {
    #[serde(default)]
    pub controls: Vec<EditorInterfaceControl>,
}

impl EditorInterface {
    /// Control configured for `field_id`, if any.
    pub fn control(&self, field_id: &str) -> Option<&EditorInterfaceControl> {
        self.controls.iter().find(|c| c.field_id == field_id)
    }
}

impl Serialize for ControlSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode_settings(self).serialize(serializer)
    }
}
