//! Scenario recording and replay.
//!
//! A scenario is the recorded output of a generator run: the seed it was
//! produced with and every batch in order. Replaying pushes the same
//! batches through the engine, reproducing the exact alert sequence.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gridvakt_core::events::ReadingBatch;

use crate::TelemetryGenerator;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scenario format error: {0}")]
    Format(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub seed: u64,
    pub batches: Vec<ReadingBatch>,
}

impl Scenario {
    /// Records `ticks` batches from a fresh generator.
    pub fn record(mut generator: TelemetryGenerator, seed: u64, ticks: usize) -> Self {
        let batches = (0..ticks).map(|_| generator.next_batch()).collect();
        Self { seed, batches }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ScenarioError> {
        let file = File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Batches in recorded order.
    pub fn replay(&self) -> impl Iterator<Item = ReadingBatch> + '_ {
        self.batches.iter().cloned()
    }
}
