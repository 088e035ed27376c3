// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Background processing of confirmed bulk uploads.
//!
//! Jobs travel over a Tokio mpsc channel. Delivery is at-least-once
//! from the worker's point of view (a retried job may find its source
//! already loaded), so the processing handler's `has_been_loaded` guard
//! is what makes the pipeline safe.

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{error, info, warn};

use calc_api::handlers::{fail_bulk_upload, process_bulk_upload};
use calc_api::schedules::ConverterRegistry;
use calc_notify::Notifier;
use calc_persistence::Persistence;

/// One queued processing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// The bulk upload source to process.
    pub source_id: i64,
    /// The opaque token handed back to the confirming caller.
    pub job_id: String,
}

/// Generates an opaque job token.
///
/// The token is purely for log correlation; nothing parses it.
#[must_use]
pub fn new_job_id() -> String {
    let token: u64 = rand::random();
    format!("job-{token:016x}")
}

/// Shared resources the worker needs to process jobs.
pub struct WorkerContext {
    /// The shared persistence adapter.
    pub persistence: Arc<Mutex<Persistence>>,
    /// The schedule converter registry.
    pub registry: Arc<ConverterRegistry>,
    /// The notice sender.
    pub notifier: Arc<dyn Notifier + Send + Sync>,
    /// How many attempts a job gets before it is failed permanently.
    pub max_attempts: u32,
}

/// Runs the worker loop until the job channel closes.
///
/// Each job gets up to `max_attempts` tries. Exhaustion marks the
/// source failed and sends the failure notice; the loop itself never
/// gives up.
pub async fn run(context: WorkerContext, mut jobs: mpsc::Receiver<Job>) {
    info!(max_attempts = context.max_attempts, "Bulk upload worker started");

    while let Some(job) = jobs.recv().await {
        process_with_retries(&context, &job).await;
    }

    info!("Bulk upload worker stopped: job channel closed");
}

async fn process_with_retries(context: &WorkerContext, job: &Job) {
    let mut last_error: String = String::new();

    for attempt in 1..=context.max_attempts {
        let result: Result<usize, calc_api::ApiError> = {
            let mut persistence = context.persistence.lock().await;
            process_bulk_upload(
                &mut persistence,
                &context.registry,
                context.notifier.as_ref(),
                job.source_id,
            )
        };

        match result {
            Ok(contracts_created) => {
                info!(
                    job_id = %job.job_id,
                    source_id = job.source_id,
                    contracts_created,
                    attempt,
                    "Bulk upload job finished"
                );
                return;
            }
            Err(err) => {
                last_error = err.to_string();
                warn!(
                    job_id = %job.job_id,
                    source_id = job.source_id,
                    attempt,
                    error = %last_error,
                    "Bulk upload attempt failed"
                );
            }
        }
    }

    error!(
        job_id = %job.job_id,
        source_id = job.source_id,
        error = %last_error,
        "Bulk upload failed permanently"
    );

    let mut persistence = context.persistence.lock().await;
    if let Err(err) = fail_bulk_upload(
        &mut persistence,
        context.notifier.as_ref(),
        job.source_id,
        &last_error,
    ) {
        error!(
            source_id = job.source_id,
            error = %err,
            "Could not record permanent bulk upload failure"
        );
    }
}
