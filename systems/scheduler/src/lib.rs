#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-worker execution of maze commands.
//!
//! The [`Scheduler`] is a two-state machine. While idle it accepts a command
//! and hands the [`Session`] to a freshly spawned worker thread, becoming busy.
//! Commands submitted while busy are rejected without touching the maze. The
//! worker publishes an immutable snapshot after every step, sleeps for the
//! configured delay, and publishes the final report once the run completes.
//! The worker releases the maze and clears the busy flag before sending that
//! report, so a caller may submit the next command as soon as it arrives.

mod config;
mod session;

pub use config::{
    SchedulerConfig, SessionConfig, DEFAULT_GENERATION_DELAY_MS, DEFAULT_GRID_DIMENSION,
    DEFAULT_STEP_DELAY_MS,
};
pub use session::Session;

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, trace, warn};
use maze_lab_core::{Command, Event, GridError, GridSnapshot, RunReport};
use thiserror::Error;

/// Whether a run is currently in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No run is active; the next command will be accepted.
    Idle,
    /// A worker owns the maze; new commands are rejected.
    Busy,
}

/// Answer to a submitted command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The command now runs on the worker thread.
    Accepted,
    /// Another run was still in progress; the command was dropped.
    Rejected(Command),
}

/// Message emitted by the worker thread while it runs a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Publication {
    /// The worker picked up a command.
    Started {
        /// Command that is about to run.
        command: Command,
    },
    /// A single algorithmic step completed.
    Step {
        /// What changed during the step.
        event: Event,
        /// Grid state right after the step.
        snapshot: Arc<GridSnapshot>,
    },
    /// The command ran to completion.
    Finished {
        /// Command that completed.
        command: Command,
        /// Terminal result of the run.
        report: RunReport,
        /// Grid state at the end of the run.
        snapshot: Arc<GridSnapshot>,
    },
    /// The command stopped on a grid error.
    Failed {
        /// Command that failed.
        command: Command,
        /// Reason the run stopped.
        error: GridError,
    },
}

impl Publication {
    /// Snapshot carried by the publication, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&GridSnapshot> {
        match self {
            Self::Step { snapshot, .. } | Self::Finished { snapshot, .. } => Some(snapshot.as_ref()),
            Self::Started { .. } | Self::Failed { .. } => None,
        }
    }
}

/// Errors raised by the scheduler itself.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The session could not be created.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The operating system refused to start the worker thread.
    #[error("failed to spawn worker thread")]
    WorkerSpawn(#[source] io::Error),
    /// A worker thread panicked and left the maze in an unknown state.
    #[error("worker thread panicked")]
    WorkerPanicked,
}

impl<T> From<PoisonError<T>> for SchedulerError {
    fn from(_: PoisonError<T>) -> Self {
        Self::WorkerPanicked
    }
}

/// Serializes commands onto at most one background worker.
#[derive(Debug)]
pub struct Scheduler {
    session: Arc<Mutex<Session>>,
    busy: Arc<AtomicBool>,
    worker: Option<Worker>,
    publisher: Sender<Publication>,
    config: SchedulerConfig,
}

#[derive(Debug)]
struct Worker {
    command: Command,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Creates an idle scheduler and the receiving end of its publications.
    pub fn new(config: SchedulerConfig) -> Result<(Self, Receiver<Publication>), SchedulerError> {
        let session = Session::new(&config.session)?;
        debug!(
            "scheduler ready: {}x{} grid, seed {}, step delay {:?}, generation delay {:?}",
            config.session.columns,
            config.session.rows,
            session.seed(),
            config.step_delay(),
            config.generation_delay()
        );

        let (publisher, receiver) = mpsc::channel();
        let scheduler = Self {
            session: Arc::new(Mutex::new(session)),
            busy: Arc::new(AtomicBool::new(false)),
            worker: None,
            publisher,
            config,
        };
        Ok((scheduler, receiver))
    }

    /// Reports whether a run is still in progress.
    ///
    /// A worker that panicked never clears the busy flag, so a finished
    /// thread always counts as idle.
    #[must_use]
    pub fn phase(&self) -> Phase {
        let running = self
            .worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished());
        if running && self.busy.load(Ordering::Acquire) {
            Phase::Busy
        } else {
            Phase::Idle
        }
    }

    /// Starts `command` on a worker thread unless another run is in progress.
    ///
    /// Fails with [`SchedulerError::WorkerPanicked`] once a worker has
    /// panicked while holding the maze.
    pub fn submit(&mut self, command: Command) -> Result<Submission, SchedulerError> {
        if self.phase() == Phase::Busy {
            debug!(
                "rejected {command:?} while {:?} is running",
                self.worker.as_ref().map(|worker| worker.command)
            );
            return Ok(Submission::Rejected(command));
        }
        self.reclaim()?;
        if self.session.is_poisoned() {
            return Err(SchedulerError::WorkerPanicked);
        }

        let session = Arc::clone(&self.session);
        let busy = Arc::clone(&self.busy);
        let publisher = self.publisher.clone();
        let step_delay = self.config.delay_for(command);
        busy.store(true, Ordering::Release);
        let spawned = thread::Builder::new()
            .name("maze-lab-worker".to_owned())
            .spawn(move || run_worker(&session, &busy, command, &publisher, step_delay));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(error) => {
                self.busy.store(false, Ordering::Release);
                return Err(SchedulerError::WorkerSpawn(error));
            }
        };

        debug!("accepted {command:?}");
        self.worker = Some(Worker { command, handle });
        Ok(Submission::Accepted)
    }

    /// Blocks until the current run, if any, has finished.
    pub fn wait_idle(&mut self) -> Result<(), SchedulerError> {
        self.reclaim()
    }

    /// Copies the grid, or returns `None` while a run is in progress.
    pub fn snapshot(&self) -> Result<Option<GridSnapshot>, SchedulerError> {
        if self.phase() == Phase::Busy {
            return Ok(None);
        }
        let session = self.session.lock()?;
        Ok(Some(session.maze().snapshot()))
    }

    /// Seed of the underlying session.
    pub fn seed(&self) -> Result<u64, SchedulerError> {
        Ok(self.session.lock()?.seed())
    }

    fn reclaim(&mut self) -> Result<(), SchedulerError> {
        match self.worker.take() {
            Some(worker) => worker
                .handle
                .join()
                .map_err(|_| SchedulerError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

fn run_worker(
    session: &Mutex<Session>,
    busy: &AtomicBool,
    command: Command,
    publisher: &Sender<Publication>,
    step_delay: Duration,
) {
    let Ok(mut session) = session.lock() else {
        warn!("session poisoned by an earlier run; dropping {command:?}");
        busy.store(false, Ordering::Release);
        return;
    };

    publish(publisher, Publication::Started { command });
    let result = session.execute(command, |event, maze| {
        trace!("{command:?} step: {event:?}");
        publish(
            publisher,
            Publication::Step {
                event: event.clone(),
                snapshot: Arc::new(maze.snapshot()),
            },
        );
        if !step_delay.is_zero() {
            thread::sleep(step_delay);
        }
    });

    let publication = match result {
        Ok(report) => Publication::Finished {
            command,
            report,
            snapshot: Arc::new(session.maze().snapshot()),
        },
        Err(error) => {
            warn!("{command:?} failed: {error}");
            Publication::Failed { command, error }
        }
    };
    drop(session);
    busy.store(false, Ordering::Release);
    publish(publisher, publication);
}

fn publish(publisher: &Sender<Publication>, publication: Publication) {
    // Nobody listening is not an error; the run still completes.
    let _ = publisher.send(publication);
}
