// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Email notice types and the sender seam.
//!
//! The rest of the system talks to a [`Notifier`] trait, never to an
//! actual mail transport. Each workflow transition maps to exactly one
//! [`Notice`]; the guarantee that a notice fires once per actual
//! transition belongs to the callers, not to this crate.

use std::sync::Mutex;
use tracing::info;

use calc_domain::ProcurementCenter;

/// The kind of workflow event a notice reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// A submitted price list was approved and its rows added to CALC.
    PriceListApproved {
        /// The approved price list's identifier.
        price_list_id: i64,
    },
    /// A submitted price list was unapproved and its rows removed.
    PriceListUnapproved {
        /// The unapproved price list's identifier.
        price_list_id: i64,
    },
    /// A bulk upload source finished loading successfully.
    BulkUploadSucceeded {
        /// The loaded source's identifier.
        source_id: i64,
        /// The procurement center the source belongs to.
        center: ProcurementCenter,
        /// How many contracts were created.
        contracts_created: usize,
    },
    /// A bulk upload source failed permanently.
    BulkUploadFailed {
        /// The failed source's identifier.
        source_id: i64,
        /// The procurement center the source belongs to.
        center: ProcurementCenter,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// One outbound email notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// The recipient address or user identifier.
    pub recipient: String,
    /// What happened.
    pub kind: NoticeKind,
}

impl Notice {
    /// Creates a new notice.
    ///
    /// # Arguments
    ///
    /// * `recipient` - The recipient address or user identifier
    /// * `kind` - What happened
    #[must_use]
    pub const fn new(recipient: String, kind: NoticeKind) -> Self {
        Self { recipient, kind }
    }

    /// Renders the subject line for this notice.
    #[must_use]
    pub fn subject(&self) -> String {
        match &self.kind {
            NoticeKind::PriceListApproved { .. } => {
                String::from("CALC Price list approved")
            }
            NoticeKind::PriceListUnapproved { .. } => {
                String::from("CALC Price list unapproved")
            }
            NoticeKind::BulkUploadSucceeded { center, .. } => {
                format!("CALC {center} bulk data loaded")
            }
            NoticeKind::BulkUploadFailed { center, .. } => {
                format!("CALC {center} bulk data load failed")
            }
        }
    }
}

/// The sender seam.
///
/// Implementations must not interpret the notice; delivery is their only
/// concern. Failures are surfaced to the caller so a workflow can decide
/// whether a delivery failure is fatal.
pub trait Notifier: Send {
    /// Delivers one notice.
    ///
    /// # Errors
    ///
    /// Returns a human-readable delivery error when the transport fails.
    fn send(&self, notice: &Notice) -> Result<(), String>;
}

/// A notifier that writes notices to the log.
///
/// Used when no mail transport is configured, mirroring transactional
/// email being disabled in development environments.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notice: &Notice) -> Result<(), String> {
        info!(
            recipient = %notice.recipient,
            subject = %notice.subject(),
            "Email notice (log transport)"
        );
        Ok(())
    }
}

/// A notifier that records every notice for later inspection.
///
/// This is the test double used to assert the exactly-once notification
/// guarantees of the approval and bulk ingestion workflows.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Creates a new recording notifier with no recorded notices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice sent so far, in send order.
    ///
    /// A poisoned lock is recovered rather than propagated; the
    /// recorded notices are still the ones that were sent.
    #[must_use]
    pub fn sent(&self) -> Vec<Notice> {
        self.sent
            .lock()
            .map_or_else(|e| e.into_inner().clone(), |g| g.clone())
    }

    /// Returns how many notices have been sent.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent().len()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, notice: &Notice) -> Result<(), String> {
        match self.sent.lock() {
            Ok(mut guard) => {
                guard.push(notice.clone());
                Ok(())
            }
            Err(_) => Err(String::from("recording notifier lock poisoned")),
        }
    }
}

#[cfg(test)]
mod tests;
