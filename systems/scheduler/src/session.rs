//! Synchronous command execution over a single maze.

use log::debug;
use maze_lab_core::{Command, Event, GridError, RunReport};
use maze_lab_system_generation::generate;
use maze_lab_system_search::solve;
use maze_lab_system_terrain::TerrainAssigner;
use maze_lab_world::Maze;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SessionConfig;

const GENERATION_STREAM: u64 = 1;
const TERRAIN_STREAM: u64 = 2;

/// A maze together with the random sources that shape it.
///
/// Every command runs to completion on the calling thread and reports each
/// algorithmic step through a callback. Generation and terrain draw from
/// separate ChaCha streams of the same seed, so re-rolling terrain never
/// disturbs the sequence of carved mazes.
#[derive(Clone, Debug)]
pub struct Session {
    maze: Maze,
    seed: u64,
    terrain: TerrainAssigner,
    generation_rng: ChaCha8Rng,
    terrain_rng: ChaCha8Rng,
}

impl Session {
    /// Creates a session over a freshly reset maze.
    pub fn new(config: &SessionConfig) -> Result<Self, GridError> {
        let maze = Maze::new(config.size())?;
        let seed = config.seed.unwrap_or_else(rand::random);

        Ok(Self {
            maze,
            seed,
            terrain: TerrainAssigner::new(),
            generation_rng: stream(seed, GENERATION_STREAM),
            terrain_rng: stream(seed, TERRAIN_STREAM),
        })
    }

    /// Seed the random streams were derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Maze owned by the session.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Runs `command` to completion, invoking `on_step` after every step.
    pub fn execute<F>(&mut self, command: Command, mut on_step: F) -> Result<RunReport, GridError>
    where
        F: FnMut(&Event, &Maze),
    {
        let report = match command {
            Command::Reset => {
                self.maze.reset_structure();
                RunReport::GridReset
            }
            Command::Generate => {
                self.maze.reset_structure();
                let passages = generate(&mut self.maze, &mut self.generation_rng, |from, to, maze| {
                    on_step(&Event::PassageCarved { from, to }, maze);
                })?;
                RunReport::MazeGenerated { passages }
            }
            Command::RandomizeTerrain => {
                let cells = self.terrain.assign(&mut self.maze, &mut self.terrain_rng)?;
                on_step(&Event::TerrainAssigned { cells }, &self.maze);
                RunReport::TerrainRandomized { cells }
            }
            Command::Solve { algorithm } => {
                RunReport::SearchFinished(solve(&mut self.maze, algorithm, on_step))
            }
        };

        debug!("{command:?} finished: {}", report.status_message());
        Ok(report)
    }
}

fn stream(seed: u64, id: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(id);
    rng
}
