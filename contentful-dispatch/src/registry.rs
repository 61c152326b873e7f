//! Immutable discriminator → decoder tables.

use crate::DecodeContext;
use contentful_types::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Decoder for one variant. Receives the value stored under the matched key
/// (key-based dispatch) or the whole payload (field-based dispatch).
pub type DecodeFn<T> = fn(&Value, DecodeContext) -> Result<T>;

/// Where the discriminator comes from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// The variant is named by whichever registered key the object carries.
    KeyPresence(&'a Map<String, Value>),
    /// The variant is named by an external field supplied alongside `payload`.
    Field { value: &'a str, payload: &'a Value },
}

/// Outcome of resolving a [`Source`] against a [`Registry`].
pub enum Resolution<'a, T> {
    /// Exactly one registered discriminator matched.
    Matched {
        discriminator: &'a str,
        decode: DecodeFn<T>,
        payload: &'a Value,
        /// Keys of a key-presence object that are not registered. Always
        /// empty for field-based sources.
        unregistered: Vec<&'a str>,
    },
    /// Nothing registered matched. Carries the first candidate, if any.
    Unmatched { discriminator: Option<&'a str> },
    /// More than one registered key was present.
    Ambiguous { discriminators: Vec<&'a str> },
}

impl<T> fmt::Debug for Resolution<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched {
                discriminator,
                unregistered,
                ..
            } => f
                .debug_struct("Matched")
                .field("discriminator", discriminator)
                .field("unregistered", unregistered)
                .finish_non_exhaustive(),
            Self::Unmatched { discriminator } => f
                .debug_struct("Unmatched")
                .field("discriminator", discriminator)
                .finish(),
            Self::Ambiguous { discriminators } => f
                .debug_struct("Ambiguous")
                .field("discriminators", discriminators)
                .finish(),
        }
    }
}

/// An ordered, read-only table of variant decoders for one dispatch site.
///
/// Registries are built once and shared by reference; they hold only
/// `&'static str` keys and function pointers, so they are `Send + Sync`.
pub struct Registry<T> {
    site: &'static str,
    entries: Vec<(&'static str, DecodeFn<T>)>,
}

impl<T> Registry<T> {
    /// Starts a registry for the named dispatch site (used in diagnostics).
    pub fn builder(site: &'static str) -> RegistryBuilder<T> {
        RegistryBuilder {
            site,
            entries: Vec::new(),
        }
    }

    pub fn site(&self) -> &'static str {
        self.site
    }

    /// Looks up the decoder registered for `discriminator`.
    pub fn get(&self, discriminator: &str) -> Option<DecodeFn<T>> {
        self.entries
            .iter()
            .find(|(key, _)| *key == discriminator)
            .map(|(_, decode)| *decode)
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.get(discriminator).is_some()
    }

    /// Registered discriminators in registration order.
    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a source to the variant decoder it names.
    pub fn resolve<'a>(&self, source: Source<'a>) -> Resolution<'a, T> {
        match source {
            Source::Field { value, payload } => match self.get(value) {
                Some(decode) => Resolution::Matched {
                    discriminator: value,
                    decode,
                    payload,
                    unregistered: Vec::new(),
                },
                None => Resolution::Unmatched {
                    discriminator: Some(value),
                },
            },
            Source::KeyPresence(object) => {
                let mut matched: Vec<(&'a str, &'a Value, DecodeFn<T>)> = Vec::new();
                let mut unregistered = Vec::new();
                for (key, value) in object {
                    match self.get(key) {
                        Some(decode) => matched.push((key.as_str(), value, decode)),
                        None => unregistered.push(key.as_str()),
                    }
                }
                match matched.len() {
                    0 => Resolution::Unmatched {
                        discriminator: unregistered.first().copied(),
                    },
                    1 => {
                        let (discriminator, payload, decode) = matched[0];
                        Resolution::Matched {
                            discriminator,
                            decode,
                            payload,
                            unregistered,
                        }
                    }
                    _ => Resolution::Ambiguous {
                        discriminators: matched.into_iter().map(|(key, _, _)| key).collect(),
                    },
                }
            }
        }
    }

    /// Builds the `UnknownDiscriminator` error for this site.
    pub fn unknown(&self, discriminator: Option<&str>) -> Error {
        Error::UnknownDiscriminator {
            site: self.site,
            discriminator: discriminator.unwrap_or_default().to_owned(),
        }
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("site", &self.site)
            .field("discriminators", &self.discriminators().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects entries for a [`Registry`].
pub struct RegistryBuilder<T> {
    site: &'static str,
    entries: Vec<(&'static str, DecodeFn<T>)>,
}

impl<T> RegistryBuilder<T> {
    /// Registers a decoder. Re-registering a discriminator replaces the
    /// earlier decoder in place.
    #[must_use]
    pub fn register(mut self, discriminator: &'static str, decode: DecodeFn<T>) -> Self {
        match self.entries.iter_mut().find(|(key, _)| *key == discriminator) {
            Some(entry) => entry.1 = decode,
            None => self.entries.push((discriminator, decode)),
        }
        self
    }

    pub fn build(self) -> Registry<T> {
        Registry {
            site: self.site,
            entries: self.entries,
        }
    }
}
