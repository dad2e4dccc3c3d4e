//! Side channel for duplicate notices under the `warn` policy.

use tracing::warn;

use super::DuplicateInfo;

/// Receives the duplicate list when a merge runs with
/// [`DuplicateHandling::Warn`](super::DuplicateHandling::Warn).
///
/// Reporting never changes the merge result.
pub trait DuplicateReporter {
    fn report(&self, duplicates: &[DuplicateInfo]);
}

/// Emits the notices as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl DuplicateReporter for TracingReporter {
    fn report(&self, duplicates: &[DuplicateInfo]) {
        warn!(count = duplicates.len(), "Found {} duplicate event(s)", duplicates.len());
        for dup in duplicates {
            warn!(uid = %dup.uid, "{}", dup.describe());
        }
    }
}

/// Discards all notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl DuplicateReporter for SilentReporter {
    fn report(&self, _duplicates: &[DuplicateInfo]) {}
}

impl<F> DuplicateReporter for F
where
    F: Fn(&[DuplicateInfo]),
{
    fn report(&self, duplicates: &[DuplicateInfo]) {
        self(duplicates)
    }
}
