//! Typed content-model payloads for the Contentful management API.
//!
//! Three payload families are polymorphic on the wire and go through the
//! dispatch registries of `contentful-dispatch`:
//! - [`Constraint`]: boolean access-control trees inside a role [`Policy`]
//! - [`FieldValidator`]: validation rules attached to a content-type [`Field`]
//! - [`ControlSettings`]: widget-specific settings of an [`EditorInterfaceControl`]
//!
//! The entities that own them ([`Role`], [`ContentType`], [`EditorInterface`])
//! are plain serde records whose polymorphic parts route through the codecs.
//! All `Deserialize` impls decode with `DecodeLimits::default()`; use the
//! `decode_with` functions to apply caller-supplied limits.

pub mod constraint;
mod content_type;
pub mod editor;
mod role;
pub mod validation;
mod wire;

pub use constraint::{Constraint, Equals, In, Paths};
pub use content_type::{ContentType, Field, FieldItems};
pub use editor::{
    ClockFormat, ControlSettings, DateFormat, EditorInterface, EditorInterfaceControl,
    SettingsShape,
};
pub use role::{Effect, Permissions, Policy, Role};
pub use validation::{Bounds, FieldValidator, OpaqueRule, RegexPattern, Validation};

pub use contentful_types::{DecodeLimits, Error, JsonScalar, Result};
