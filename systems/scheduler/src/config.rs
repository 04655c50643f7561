//! Serializable settings for sessions and the scheduler.

use std::time::Duration;

use maze_lab_core::{Command, GridSize};
use serde::{Deserialize, Serialize};

/// Number of rows and columns used when none is configured.
pub const DEFAULT_GRID_DIMENSION: u32 = 20;

/// Pause after every published search or terrain step when none is configured.
pub const DEFAULT_STEP_DELAY_MS: u64 = 15;

/// Pause after every carved passage when none is configured.
pub const DEFAULT_GENERATION_DELAY_MS: u64 = 5;

/// Dimensions and randomness of a single maze session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of columns in the lattice.
    pub columns: u32,
    /// Number of rows in the lattice.
    pub rows: u32,
    /// Seed shared by every random concern; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Lattice dimensions described by the configuration.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.columns, self.rows)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_DIMENSION,
            rows: DEFAULT_GRID_DIMENSION,
            seed: None,
        }
    }
}

/// Session settings plus the pacing applied by the background worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Settings of the session driven by the scheduler.
    pub session: SessionConfig,
    /// Milliseconds the worker sleeps after each search or terrain step.
    pub step_delay_ms: u64,
    /// Milliseconds the worker sleeps after each carved passage.
    pub generation_delay_ms: u64,
}

impl SchedulerConfig {
    /// Pause inserted after each published search or terrain step.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Pause inserted after each carved passage.
    #[must_use]
    pub const fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    /// Pause applied after every step of `command`; zero disables pacing.
    #[must_use]
    pub const fn delay_for(&self, command: Command) -> Duration {
        match command {
            Command::Generate => self.generation_delay(),
            Command::Reset | Command::RandomizeTerrain | Command::Solve { .. } => {
                self.step_delay()
            }
        }
    }

    /// Configuration that never sleeps between steps.
    #[must_use]
    pub fn headless(session: SessionConfig) -> Self {
        Self {
            session,
            step_delay_ms: 0,
            generation_delay_ms: 0,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            generation_delay_ms: DEFAULT_GENERATION_DELAY_MS,
        }
    }
}
