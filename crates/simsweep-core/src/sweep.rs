//! Parameter points and the ordered sweep they form.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Distances of the published baseline sweep.
pub const BASELINE_DISTANCES: [u64; 8] = [10, 20, 30, 50, 75, 100, 150, 200];

/// Duration passed to every run of the baseline sweep.
pub const BASELINE_TIME: u64 = 10;

/// Values passed to one simulation invocation.
///
/// The values are opaque to the orchestrator and forwarded verbatim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ParameterPoint {
    pub distance: u64,
    pub time: u64,
}

impl ParameterPoint {
    pub fn new(distance: u64, time: u64) -> Self {
        Self { distance, time }
    }

    /// Command-line flags, always in `--distance`, `--time` order.
    pub fn args(&self) -> Vec<String> {
        vec![
            format!("--distance={}", self.distance),
            format!("--time={}", self.time),
        ]
    }
}

impl fmt::Display for ParameterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance: {}m", self.distance)
    }
}

/// Fixed, ordered sequence of parameter points for one batch.
///
/// Order is the published sweep order and is never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Sweep {
    points: Vec<ParameterPoint>,
}

impl Sweep {
    pub fn new(points: Vec<ParameterPoint>) -> Self {
        Self { points }
    }

    /// The baseline sweep: eight distances at a fixed duration.
    pub fn baseline() -> Self {
        Self::from_distances(&BASELINE_DISTANCES, BASELINE_TIME)
    }

    /// One point per distance, all sharing `time`.
    pub fn from_distances(distances: &[u64], time: u64) -> Self {
        Self {
            points: distances
                .iter()
                .map(|&d| ParameterPoint::new(d, time))
                .collect(),
        }
    }

    pub fn points(&self) -> &[ParameterPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points paired with their 1-based run index.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &ParameterPoint)> {
        self.points.iter().enumerate().map(|(i, p)| (i + 1, p))
    }

    /// SHA-256 over the ordered rendered arguments (order-sensitive).
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for point in &self.points {
            for arg in point.args() {
                hasher.update(arg.as_bytes());
                hasher.update(b" ");
            }
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize())
    }
}

impl From<Vec<ParameterPoint>> for Sweep {
    fn from(points: Vec<ParameterPoint>) -> Self {
        Self::new(points)
    }
}
