// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{LogNotifier, Notice, NoticeKind, Notifier, RecordingNotifier};
use calc_domain::ProcurementCenter;

fn approved_notice(price_list_id: i64) -> Notice {
    Notice::new(
        String::from("vendor@example.test"),
        NoticeKind::PriceListApproved { price_list_id },
    )
}

#[test]
fn test_recording_notifier_captures_notices_in_order() {
    let notifier: RecordingNotifier = RecordingNotifier::new();

    notifier.send(&approved_notice(1)).unwrap();
    notifier.send(&approved_notice(2)).unwrap();

    let sent: Vec<Notice> = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0].kind,
        NoticeKind::PriceListApproved { price_list_id: 1 }
    );
    assert_eq!(
        sent[1].kind,
        NoticeKind::PriceListApproved { price_list_id: 2 }
    );
}

#[test]
fn test_log_notifier_always_succeeds() {
    let notifier: LogNotifier = LogNotifier;
    assert!(notifier.send(&approved_notice(7)).is_ok());
}

#[test]
fn test_subject_lines_name_the_workflow() {
    assert_eq!(approved_notice(1).subject(), "CALC Price list approved");

    let failed: Notice = Notice::new(
        String::from("admin@gsa.test"),
        NoticeKind::BulkUploadFailed {
            source_id: 3,
            center: ProcurementCenter::Region10,
            reason: String::from("row 12: bad rate"),
        },
    );
    assert_eq!(failed.subject(), "CALC Region 10 bulk data load failed");
}
