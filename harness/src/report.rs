//! Run report artifact.

use std::io;
use std::path::Path;

use statewalk_vm::PropertyViolation;

use crate::stats::StatsCounters;

/// Summary of one exploration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Name of the ranking strategy that drove the run.
    pub strategy: String,
    /// Notification counters.
    pub stats: StatsCounters,
    /// Every property violation recorded.
    pub errors: Vec<PropertyViolation>,
    /// The last resource constraint hit, rendered.
    pub last_constraint: Option<String>,
}

impl RunReport {
    /// Render the report as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let errors: Vec<serde_json::Value> = self
            .errors
            .iter()
            .map(|e| {
                serde_json::json!({
                    "detail": e.detail,
                    "property": e.property,
                })
            })
            .collect();

        serde_json::json!({
            "errors": errors,
            "last_constraint": self.last_constraint,
            "schema_version": "run_report.v1",
            "stats": {
                "backtracks": self.stats.backtracks,
                "constraints_hit": self.stats.constraints_hit,
                "end_states": self.stats.end_states,
                "max_depth": self.stats.max_depth,
                "max_queue_len": self.stats.max_queue_len,
                "new_states": self.stats.new_states,
                "processed_states": self.stats.processed_states,
                "restored_states": self.stats.restored_states,
                "revisited_states": self.stats.revisited_states,
                "stored_states": self.stats.stored_states,
                "violations": self.stats.violations,
            },
            "strategy": self.strategy,
        })
    }

    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from writing the file.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json();
        let bytes = serde_json::to_vec_pretty(&json).map_err(io::Error::other)?;
        std::fs::write(path, bytes)
    }
}
