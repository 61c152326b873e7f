//! Core type definitions shared by the Contentful content-model codecs.
//!
//! This crate defines the small, domain-agnostic pieces every codec needs:
//! - The codec error enum and `Result` alias
//! - [`JsonScalar`], the value type constraint comparisons are allowed to hold
//! - [`DecodeLimits`], the configurable resource bounds applied during decode
//!
//! Domain types (constraints, validators, editor controls) live in
//! `contentful-model`; the discriminator registry lives in `contentful-dispatch`.

mod limits;
mod scalar;

pub use limits::{DEFAULT_MAX_DEPTH, DecodeLimits};
pub use scalar::JsonScalar;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding or assembling content-model payloads.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No registered variant matched the object at a dispatch site.
    #[error("unknown {site} discriminator: {discriminator:?}")]
    UnknownDiscriminator {
        site: &'static str,
        discriminator: String,
    },

    #[error("malformed constraint: {0}")]
    MalformedConstraint(String),

    #[error("malformed validator: {0}")]
    MalformedValidator(String),

    #[error("malformed control settings: {0}")]
    MalformedSettings(String),

    /// Nesting went past `DecodeLimits::max_depth`.
    #[error("recursion limit exceeded: nesting deeper than {max_depth}")]
    RecursionLimitExceeded { max_depth: usize },

    /// Settings shape does not belong to the control's widget.
    #[error("settings shape {shape} cannot be attached to widget {widget_id:?}")]
    SettingsMismatch { widget_id: String, shape: &'static str },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
