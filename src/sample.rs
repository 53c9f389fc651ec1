//! Sample struct for decoded time series data.

use serde::{Deserialize, Serialize};

/// A decoded time-series sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample timestamp
    pub ts: u64,
    /// Sample value
    pub value: f64,
}
