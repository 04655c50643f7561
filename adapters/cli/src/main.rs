#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates, weights and solves a maze.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use maze_lab_core::{Algorithm, Command};
use maze_lab_rendering::{AsciiPresenter, Presenter};
use maze_lab_system_scheduler::{Phase, Publication, Scheduler, SchedulerConfig, Submission};
use serde::Deserialize;

/// How long the adapter waits for a publication before checking on the worker.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "maze-lab", version, about = "Generate, weight and solve grid mazes")]
struct Args {
    /// TOML file with scheduler settings and a default run plan.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of columns in the grid.
    #[arg(long)]
    columns: Option<u32>,

    /// Number of rows in the grid.
    #[arg(long)]
    rows: Option<u32>,

    /// Seed for maze and terrain randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds to pause after each animated search or terrain step.
    #[arg(long = "delay-ms")]
    delay_ms: Option<u64>,

    /// Milliseconds to pause after each animated carving step.
    #[arg(long = "generation-delay-ms")]
    generation_delay_ms: Option<u64>,

    /// Randomize terrain after the maze is generated.
    #[arg(long)]
    terrain: bool,

    /// Redraw the grid after every step instead of once per command.
    #[arg(long)]
    animate: bool,

    /// Search strategies to run, in order. Defaults to all four.
    #[arg(value_enum)]
    algorithms: Vec<AlgorithmArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Bfs,
    Dfs,
    Dijkstra,
    Astar,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Bfs => Self::Bfs,
            AlgorithmArg::Dfs => Self::Dfs,
            AlgorithmArg::Dijkstra => Self::Dijkstra,
            AlgorithmArg::Astar => Self::AStar,
        }
    }
}

/// Contents of the optional configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    #[serde(flatten)]
    scheduler: SchedulerConfig,
    run: RunPlan,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunPlan {
    terrain: bool,
    algorithms: Vec<Algorithm>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    scheduler: SchedulerConfig,
    commands: Vec<Command>,
    animate: bool,
}

impl Invocation {
    fn resolve(args: &Args, file: FileConfig) -> Self {
        let mut scheduler = file.scheduler;
        if let Some(columns) = args.columns {
            scheduler.session.columns = columns;
        }
        if let Some(rows) = args.rows {
            scheduler.session.rows = rows;
        }
        if args.seed.is_some() {
            scheduler.session.seed = args.seed;
        }
        if let Some(delay_ms) = args.delay_ms {
            scheduler.step_delay_ms = delay_ms;
        }
        if let Some(delay_ms) = args.generation_delay_ms {
            scheduler.generation_delay_ms = delay_ms;
        }
        if !args.animate {
            scheduler.step_delay_ms = 0;
            scheduler.generation_delay_ms = 0;
        }

        let algorithms: Vec<Algorithm> = if !args.algorithms.is_empty() {
            args.algorithms.iter().copied().map(Algorithm::from).collect()
        } else if !file.run.algorithms.is_empty() {
            file.run.algorithms
        } else {
            Algorithm::ALL.to_vec()
        };

        let mut commands = vec![Command::Generate];
        if args.terrain || file.run.terrain {
            commands.push(Command::RandomizeTerrain);
        }
        commands.extend(
            algorithms
                .into_iter()
                .map(|algorithm| Command::Solve { algorithm }),
        );

        Self {
            scheduler,
            commands,
            animate: args.animate,
        }
    }
}

fn parse_config(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("failed to parse maze-lab configuration")
}

fn load_config(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Entry point for the maze-lab command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let file = match &args.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let invocation = Invocation::resolve(&args, file);
    debug!("resolved invocation: {invocation:?}");

    let (mut scheduler, publications) =
        Scheduler::new(invocation.scheduler).context("failed to start the maze session")?;
    info!("session seed {}", scheduler.seed()?);

    let stdout = io::stdout().lock();
    let mut presenter = if invocation.animate {
        AsciiPresenter::animated(stdout)
    } else {
        AsciiPresenter::new(stdout)
    };

    for command in invocation.commands {
        run_command(
            &mut scheduler,
            &publications,
            &mut presenter,
            command,
            invocation.animate,
        )?;
    }

    Ok(())
}

fn run_command<W: Write>(
    scheduler: &mut Scheduler,
    publications: &Receiver<Publication>,
    presenter: &mut AsciiPresenter<W>,
    command: Command,
    animate: bool,
) -> Result<()> {
    if let Submission::Rejected(command) = scheduler.submit(command)? {
        bail!("scheduler rejected {command:?} while busy");
    }

    loop {
        let publication = match publications.recv_timeout(POLL_INTERVAL) {
            Ok(publication) => publication,
            Err(RecvTimeoutError::Timeout) if scheduler.phase() == Phase::Busy => continue,
            // The worker may have published its last messages right before returning.
            Err(RecvTimeoutError::Timeout) => match publications.try_recv() {
                Ok(publication) => publication,
                Err(_) => {
                    scheduler.wait_idle()?;
                    bail!("worker stopped before finishing {command:?}");
                }
            },
            Err(RecvTimeoutError::Disconnected) => bail!("publication channel closed"),
        };

        match publication {
            Publication::Started { command } => debug!("running {command:?}"),
            Publication::Step { snapshot, .. } => {
                if animate {
                    presenter.present(&snapshot, None)?;
                }
            }
            Publication::Finished {
                report, snapshot, ..
            } => {
                let status = report.status_message();
                info!("{status}");
                presenter.present(&snapshot, Some(&status))?;
                break;
            }
            Publication::Failed { command, error } => {
                scheduler.wait_idle()?;
                bail!("{command:?} failed: {error}");
            }
        }
    }

    scheduler.wait_idle()?;
    Ok(())
}
