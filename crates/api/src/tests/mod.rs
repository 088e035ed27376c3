// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service layer tests.
//!
//! Handlers run against a real in-memory persistence adapter and a
//! recording notifier, so authorization, validation, and notification
//! behavior are all observable.

mod auth_tests;
mod schedule_tests;

use calc_notify::RecordingNotifier;
use calc_persistence::Persistence;

use crate::auth::PermissionMap;
use crate::request_response::ActorFields;
use crate::schedules::ConverterRegistry;

/// Everything a handler test needs, freshly built.
struct TestHarness {
    persistence: Persistence,
    permissions: PermissionMap,
    registry: ConverterRegistry,
    notifier: RecordingNotifier,
}

fn make_harness() -> TestHarness {
    TestHarness {
        persistence: Persistence::new_in_memory().unwrap(),
        permissions: PermissionMap::standard(),
        registry: ConverterRegistry::standard(),
        notifier: RecordingNotifier::new(),
    }
}

fn admin_fields() -> ActorFields {
    ActorFields {
        actor_id: Some(String::from("admin@gsa.test")),
        actor_role: Some(String::from("data_administrator")),
    }
}

fn officer_fields() -> ActorFields {
    ActorFields {
        actor_id: Some(String::from("officer@gsa.test")),
        actor_role: Some(String::from("contract_officer")),
    }
}

fn anonymous_fields() -> ActorFields {
    ActorFields::default()
}

/// A well-formed two-row Region 10 export.
const REGION_10_CSV: &str = "\
contract_number,vendor_name,labor_category,education_level,min_years_experience,price,business_size
GS-10F-0247K,Acme Staffing LLC,Senior Analyst,Bachelors,5,\"$1,000.00\",S
GS-10F-0247K,Acme Staffing LLC,Sign Language Interpreter,Masters,3,$95.50,S
";
