use crate::validation::Validation;
use crate::wire::Sys;
use serde::{Deserialize, Serialize};

/// A content-type schema: an ordered list of field definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ContentTypeWire")]
pub struct ContentType {
    /// Read from `sys.id`; never emitted.
    #[serde(skip_serializing)]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Id of the field used as the entry title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    pub fields: Vec<Field>,
}

impl ContentType {
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// One field of a content type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    /// `Symbol`, `Text`, `Integer`, `Link`, `Array`, ...
    #[serde(rename = "type")]
    pub field_type: String,
    /// `Entry` or `Asset` for link fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// Element schema for array fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<FieldItems>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub omitted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Validation>,
}

impl Field {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_validation(mut self, validation: impl Into<Validation>) -> Self {
        self.validations.push(validation.into());
        self
    }
}

/// Schema of the elements of an `Array` field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldItems {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Validation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentTypeWire {
    #[serde(default)]
    sys: Option<Sys>,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    display_field: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
}

impl From<ContentTypeWire> for ContentType {
    fn from(wire: ContentTypeWire) -> Self {
        Self {
            id: wire.sys.and_then(|sys| sys.id),
            name: wire.name,
            description: wire.description,
            display_field: wire.display_field,
            fields: wire.fields,
        }
    }
}
