// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization policy tests.

use std::str::FromStr;

use crate::auth::{AuthenticatedActor, Permission, PermissionMap, Role, authorize};
use crate::error::AuthError;
use crate::handlers::resolve_actor;
use crate::request_response::ActorFields;
use crate::tests::{admin_fields, anonymous_fields, officer_fields};

fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin@gsa.test"), Role::DataAdministrator)
}

fn officer() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("officer@gsa.test"), Role::ContractOfficer)
}

#[test]
fn test_administrator_holds_every_permission() {
    let permissions: PermissionMap = PermissionMap::standard();
    for permission in [
        Permission::UploadPriceLists,
        Permission::BulkUploadContracts,
        Permission::ApprovePriceLists,
        Permission::SearchContracts,
    ] {
        assert!(permissions.allows(Role::DataAdministrator, permission));
    }
}

#[test]
fn test_officer_cannot_approve_or_bulk_upload() {
    let permissions: PermissionMap = PermissionMap::standard();

    assert!(permissions.allows(Role::ContractOfficer, Permission::UploadPriceLists));
    assert!(permissions.allows(Role::ContractOfficer, Permission::SearchContracts));
    assert!(!permissions.allows(Role::ContractOfficer, Permission::ApprovePriceLists));
    assert!(!permissions.allows(Role::ContractOfficer, Permission::BulkUploadContracts));
}

#[test]
fn test_anonymous_actor_is_authentication_required() {
    let permissions: PermissionMap = PermissionMap::standard();

    let result = authorize(&permissions, None, Permission::SearchContracts, "search");
    assert!(matches!(
        result,
        Err(AuthError::AuthenticationRequired { .. })
    ));
}

#[test]
fn test_missing_grant_is_forbidden_not_unauthenticated() {
    let permissions: PermissionMap = PermissionMap::standard();
    let actor: AuthenticatedActor = officer();

    let result = authorize(
        &permissions,
        Some(&actor),
        Permission::ApprovePriceLists,
        "approve",
    );
    match result {
        Err(AuthError::Forbidden { action, permission }) => {
            assert_eq!(action, "approve");
            assert_eq!(permission, "ApprovePriceLists");
        }
        other => panic!("expected Forbidden, got {other:?}"),
    }
}

#[test]
fn test_granted_check_returns_the_actor() {
    let permissions: PermissionMap = PermissionMap::standard();
    let actor: AuthenticatedActor = admin();

    let authorized = authorize(
        &permissions,
        Some(&actor),
        Permission::ApprovePriceLists,
        "approve",
    )
    .unwrap();
    assert_eq!(authorized.id, "admin@gsa.test");
}

#[test]
fn test_role_round_trips_through_strings() {
    assert_eq!(
        Role::from_str("data_administrator").unwrap(),
        Role::DataAdministrator
    );
    assert_eq!(
        Role::from_str("contract_officer").unwrap(),
        Role::ContractOfficer
    );
    assert!(Role::from_str("superuser").is_err());
    assert_eq!(Role::DataAdministrator.as_str(), "data_administrator");
}

#[test]
fn test_resolve_actor_parses_role() {
    let actor = resolve_actor(&admin_fields()).unwrap().unwrap();
    assert_eq!(actor.role, Role::DataAdministrator);

    let actor = resolve_actor(&officer_fields()).unwrap().unwrap();
    assert_eq!(actor.role, Role::ContractOfficer);
}

#[test]
fn test_resolve_actor_treats_absent_fields_as_anonymous() {
    assert!(resolve_actor(&anonymous_fields()).unwrap().is_none());
}

#[test]
fn test_resolve_actor_rejects_unknown_role() {
    let fields: ActorFields = ActorFields {
        actor_id: Some(String::from("someone")),
        actor_role: Some(String::from("superuser")),
    };
    assert!(resolve_actor(&fields).is_err());
}
