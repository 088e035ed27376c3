// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-based authorization.
//!
//! Grants live in an explicit [`PermissionMap`] built once at startup
//! and passed into every check. There is no global mutable registry;
//! every handler performs its check as a visible call at the boundary.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles apply to system operators, never to the vendors whose data
/// they enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Operators with full control: they review submissions, approve
    /// and unapprove price lists, and run bulk loads.
    DataAdministrator,
    /// Operators who submit price lists and search existing rates on
    /// behalf of their contracting office.
    ContractOfficer,
}

impl Role {
    /// Returns the wire representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DataAdministrator => "data_administrator",
            Self::ContractOfficer => "contract_officer",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data_administrator" => Ok(Self::DataAdministrator),
            "contract_officer" => Ok(Self::ContractOfficer),
            other => Err(format!("Unknown role: '{other}'")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The discrete actions authorization can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Submit price lists through the manual upload wizard.
    UploadPriceLists,
    /// Submit, inspect, and confirm bulk contract uploads.
    BulkUploadContracts,
    /// Approve and unapprove submitted price lists.
    ApprovePriceLists,
    /// Search the contract database.
    SearchContracts,
}

impl Permission {
    /// Returns the human-readable name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UploadPriceLists => "UploadPriceLists",
            Self::BulkUploadContracts => "BulkUploadContracts",
            Self::ApprovePriceLists => "ApprovePriceLists",
            Self::SearchContracts => "SearchContracts",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }
}

/// An immutable role-to-permission map.
///
/// Constructed once and read thereafter. The standard map is the whole
/// authorization policy; nothing mutates it at runtime.
#[derive(Debug)]
pub struct PermissionMap {
    grants: HashMap<Role, Vec<Permission>>,
}

impl PermissionMap {
    /// Builds the standard grant map.
    ///
    /// Data administrators hold every permission. Contract officers may
    /// upload price lists and search, but never approve and never run
    /// bulk loads.
    #[must_use]
    pub fn standard() -> Self {
        let mut grants: HashMap<Role, Vec<Permission>> = HashMap::new();
        grants.insert(
            Role::DataAdministrator,
            vec![
                Permission::UploadPriceLists,
                Permission::BulkUploadContracts,
                Permission::ApprovePriceLists,
                Permission::SearchContracts,
            ],
        );
        grants.insert(
            Role::ContractOfficer,
            vec![Permission::UploadPriceLists, Permission::SearchContracts],
        );
        Self { grants }
    }

    /// Reports whether a role holds a permission.
    ///
    /// # Arguments
    ///
    /// * `role` - The role to check
    /// * `permission` - The permission in question
    #[must_use]
    pub fn allows(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|held| held.contains(&permission))
    }
}

/// Checks that an actor is present and holds a permission.
///
/// # Arguments
///
/// * `permissions` - The immutable grant map
/// * `actor` - The authenticated actor, if any
/// * `permission` - The permission the action requires
/// * `action` - The action name, used in error messages
///
/// # Errors
///
/// Returns [`AuthError::AuthenticationRequired`] for an anonymous
/// request and [`AuthError::Forbidden`] for an authenticated actor
/// without the grant.
pub fn authorize<'a>(
    permissions: &PermissionMap,
    actor: Option<&'a AuthenticatedActor>,
    permission: Permission,
    action: &str,
) -> Result<&'a AuthenticatedActor, AuthError> {
    let Some(actor) = actor else {
        return Err(AuthError::AuthenticationRequired {
            action: String::from(action),
        });
    };
    if !permissions.allows(actor.role, permission) {
        return Err(AuthError::Forbidden {
            action: String::from(action),
            permission: String::from(permission.as_str()),
        });
    }
    Ok(actor)
}
