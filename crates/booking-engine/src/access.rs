//! Role-based access checks for resources.
//!
//! Two independent predicates: per-resource restriction lists, and the
//! role → bookable resource type table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user's role. Unrecognized role names fall back to [`Role::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Other,
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            "student" => Role::Student,
            _ => Role::Other,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Regular,
    Lab,
    Special,
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(ResourceType::Regular),
            "lab" => Ok(ResourceType::Lab),
            "special" => Ok(ResourceType::Special),
            other => Err(format!("unknown resource type: {}", other)),
        }
    }
}

/// The restriction fields of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAccess {
    #[serde(default)]
    pub is_restricted: bool,
    /// Comma-separated role names allowed to use a restricted resource.
    #[serde(default)]
    pub restricted_to_roles: String,
}

impl ResourceAccess {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn restricted_to(roles: &[&str]) -> Self {
        Self {
            is_restricted: true,
            restricted_to_roles: roles.join(","),
        }
    }
}

/// Whether a user with `role` may see and book `resource`.
///
/// A resource is open to everyone unless it is restricted with a non-empty
/// role list. Role names are matched as whole comma-separated entries,
/// ignoring case and surrounding whitespace, so `"admin"` does not match an
/// entry `"superadmin"`.
pub fn has_access(resource: &ResourceAccess, role: &str) -> bool {
    if !resource.is_restricted || resource.restricted_to_roles.trim().is_empty() {
        return true;
    }
    let role = role.trim();
    resource
        .restricted_to_roles
        .split(',')
        .map(str::trim)
        .any(|allowed| !allowed.is_empty() && allowed.eq_ignore_ascii_case(role))
}

/// Whether `role` may book resources of type `resource_type`.
///
/// Admins book everything, teachers everything except special rooms, and
/// everyone else regular rooms only.
pub fn can_book_resource_type(role: Role, resource_type: ResourceType) -> bool {
    match role {
        Role::Admin => true,
        Role::Teacher => resource_type != ResourceType::Special,
        Role::Student | Role::Other => resource_type == ResourceType::Regular,
    }
}

pub fn bookable_resource_types(role: Role) -> &'static [ResourceType] {
    match role {
        Role::Admin => &[ResourceType::Regular, ResourceType::Lab, ResourceType::Special],
        Role::Teacher => &[ResourceType::Regular, ResourceType::Lab],
        Role::Student | Role::Other => &[ResourceType::Regular],
    }
}
