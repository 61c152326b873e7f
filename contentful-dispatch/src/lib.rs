//! Discriminator dispatch for polymorphic JSON payloads.
//!
//! The content-model wire format says "which variant am I" in one of two ways:
//! - by which key is present in the object (`{"and": [...]}`, `{"size": {...}}`)
//! - by a sibling field supplied next to the object (an editor control's
//!   `widgetId` decides the shape of its `settings`)
//!
//! A [`Registry`] maps discriminator strings to decode functions and resolves
//! either kind of [`Source`] the same way. It holds no domain knowledge; the
//! codecs in `contentful-model` decide what an unmatched or ambiguous
//! resolution means at their site.

mod context;
mod registry;

pub use context::DecodeContext;
pub use registry::{DecodeFn, Registry, RegistryBuilder, Resolution, Source};
