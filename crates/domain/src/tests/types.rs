// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ContractorSite, DomainError, ProcurementCenter, UploadStatus};
use std::str::FromStr;

#[test]
fn test_upload_status_happy_path_transitions() {
    assert!(UploadStatus::Received.can_transition_to(UploadStatus::MetadataExtracted));
    assert!(UploadStatus::MetadataExtracted.can_transition_to(UploadStatus::Queued));
    assert!(UploadStatus::Queued.can_transition_to(UploadStatus::Processing));
    assert!(UploadStatus::Processing.can_transition_to(UploadStatus::Loaded));
    assert!(UploadStatus::Processing.can_transition_to(UploadStatus::Failed));
}

#[test]
fn test_upload_status_metadata_extraction_is_repeatable() {
    assert!(UploadStatus::MetadataExtracted.can_transition_to(UploadStatus::MetadataExtracted));
}

#[test]
fn test_upload_status_rejects_skipping_states() {
    assert!(!UploadStatus::Received.can_transition_to(UploadStatus::Processing));
    assert!(!UploadStatus::Received.can_transition_to(UploadStatus::Loaded));
    assert!(!UploadStatus::Queued.can_transition_to(UploadStatus::Loaded));
}

#[test]
fn test_upload_status_terminal_states_have_no_exits() {
    for target in [
        UploadStatus::Received,
        UploadStatus::MetadataExtracted,
        UploadStatus::Queued,
        UploadStatus::Processing,
        UploadStatus::Loaded,
        UploadStatus::Failed,
    ] {
        assert!(!UploadStatus::Loaded.can_transition_to(target));
        assert!(!UploadStatus::Failed.can_transition_to(target));
    }
    assert!(UploadStatus::Loaded.is_terminal());
    assert!(UploadStatus::Failed.is_terminal());
}

#[test]
fn test_upload_status_string_round_trip() {
    for status in [
        UploadStatus::Received,
        UploadStatus::MetadataExtracted,
        UploadStatus::Queued,
        UploadStatus::Processing,
        UploadStatus::Loaded,
        UploadStatus::Failed,
    ] {
        assert_eq!(UploadStatus::from_str(status.as_str()).unwrap(), status);
    }
}

#[test]
fn test_upload_status_rejects_unknown_string() {
    let result: Result<UploadStatus, DomainError> = UploadStatus::from_str("Pending");
    assert!(matches!(result, Err(DomainError::InvalidUploadStatus(_))));
}

#[test]
fn test_procurement_center_round_trip() {
    assert_eq!(
        ProcurementCenter::from_str("Region 10").unwrap(),
        ProcurementCenter::Region10
    );
    assert_eq!(ProcurementCenter::Region10.as_str(), "Region 10");
}

#[test]
fn test_contractor_site_parses_case_insensitively() {
    assert_eq!(
        ContractorSite::from_str("both").unwrap(),
        ContractorSite::Both
    );
    assert_eq!(
        ContractorSite::from_str("Customer").unwrap(),
        ContractorSite::Customer
    );
    assert_eq!(ContractorSite::Both.as_str(), "Both");
    assert!(ContractorSite::from_str("remote").is_err());
}

#[test]
fn test_procurement_center_rejects_unknown_center() {
    let result: Result<ProcurementCenter, DomainError> = ProcurementCenter::from_str("Region 99");
    assert!(matches!(
        result,
        Err(DomainError::InvalidProcurementCenter(_))
    ));
}
