use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate result of one pipeline run, written once at run end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Products found by extraction (or catalog size), before slicing.
    pub discovered_count: usize,
    /// Products actually fed to dossier generation: `min(discovered, cap)`.
    pub analyzed_count: usize,
    /// Dossiers that were generated AND persisted.
    pub successful_count: usize,
    /// `successful / analyzed × 100`; defined as `0.0` when nothing was
    /// analyzed rather than propagating NaN.
    pub success_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl RunReport {
    #[must_use]
    pub fn new(discovered_count: usize, analyzed_count: usize, successful_count: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let success_rate = if analyzed_count == 0 {
            0.0
        } else {
            successful_count as f64 / analyzed_count as f64 * 100.0
        };
        Self {
            discovered_count,
            analyzed_count,
            successful_count,
            success_rate,
            timestamp: Utc::now(),
        }
    }
}
