//! Roles and the policies they grant.

use crate::constraint::{self, Constraint};
use crate::wire::{Sys, string_or_seq};
use contentful_dispatch::DecodeContext;
use contentful_types::{DecodeLimits, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a policy grants or revokes its actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// An effect over a set of actions, optionally scoped by a constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyWire")]
pub struct Policy {
    pub effect: Effect,
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl Policy {
    pub fn new<A: Into<String>>(effect: Effect, actions: impl IntoIterator<Item = A>) -> Self {
        Self {
            effect,
            actions: actions.into_iter().map(Into::into).collect(),
            constraint: None,
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Decodes a policy, bounding constraint nesting by `limits`.
    pub fn decode_with(value: &Value, limits: DecodeLimits) -> Result<Self> {
        PolicyWire::deserialize(value)?.into_policy(limits)
    }
}

/// Space-wide permissions granted alongside a role's policies.
///
/// The API accepts `"all"` in place of a list; it decodes to `["all"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(rename = "ContentDelivery", default, deserialize_with = "string_or_seq")]
    pub content_delivery: Vec<String>,
    #[serde(rename = "ContentModel", default, deserialize_with = "string_or_seq")]
    pub content_model: Vec<String>,
    #[serde(rename = "Settings", default, deserialize_with = "string_or_seq")]
    pub settings: Vec<String>,
}

/// A named set of permissions and policies.
///
/// `id` is read from the server-managed `sys` block and never emitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RoleWire")]
pub struct Role {
    #[serde(skip_serializing)]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Permissions,
    pub policies: Vec<Policy>,
}

impl Role {
    /// Decodes a role, bounding every policy constraint by `limits`.
    pub fn decode_with(value: &Value, limits: DecodeLimits) -> Result<Self> {
        RoleWire::deserialize(value)?.into_role(limits)
    }
}

#[derive(Deserialize)]
struct PolicyWire {
    effect: Effect,
    #[serde(deserialize_with = "string_or_seq")]
    actions: Vec<String>,
    #[serde(default)]
    constraint: Option<Value>,
}

impl PolicyWire {
    fn into_policy(self, limits: DecodeLimits) -> Result<Policy> {
        let constraint = self
            .constraint
            .map(|raw| constraint::decode(&raw, DecodeContext::new(limits)))
            .transpose()?;
        Ok(Policy {
            effect: self.effect,
            actions: self.actions,
            constraint,
        })
    }
}

impl TryFrom<PolicyWire> for Policy {
    type Error = contentful_types::Error;

    fn try_from(wire: PolicyWire) -> Result<Self> {
        wire.into_policy(DecodeLimits::default())
    }
}

#[derive(Deserialize)]
struct RoleWire {
    #[serde(default)]
    sys: Option<Sys>,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    permissions: Permissions,
    #[serde(default)]
    policies: Vec<PolicyWire>,
}

impl RoleWire {
    fn into_role(self, limits: DecodeLimits) -> Result<Role> {
        let policies = self
            .policies
            .into_iter()
            .map(|policy| policy.into_policy(limits))
            .collect::<Result<_>>()?;
        Ok(Role {
            id: self.sys.and_then(|sys| sys.id),
            name: self.name,
            description: self.description,
            permissions: self.permissions,
            policies,
        })
    }
}

impl TryFrom<RoleWire> for Role {
    type Error = contentful_types::Error;

    fn try_from(wire: RoleWire) -> Result<Self> {
        wire.into_role(DecodeLimits::default())
    }
}
