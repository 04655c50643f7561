use std::sync::mpsc::Receiver;

use maze_lab_core::{Algorithm, Command, Event, RunReport, SearchOutcome};
use maze_lab_system_scheduler::{
    Phase, Publication, Scheduler, SchedulerConfig, SessionConfig, Submission,
};

fn headless(columns: u32, rows: u32, seed: u64) -> (Scheduler, Receiver<Publication>) {
    Scheduler::new(SchedulerConfig::headless(SessionConfig {
        columns,
        rows,
        seed: Some(seed),
    }))
    .expect("valid configuration")
}

fn run(scheduler: &mut Scheduler, command: Command) {
    assert_eq!(
        scheduler.submit(command).expect("worker spawns"),
        Submission::Accepted
    );
    scheduler.wait_idle().expect("worker completes");
}

fn drain(receiver: &Receiver<Publication>) -> Vec<Publication> {
    receiver.try_iter().collect()
}

fn finished_report(publications: &[Publication]) -> RunReport {
    match publications.last() {
        Some(Publication::Finished { report, .. }) => *report,
        other => panic!("expected a terminal report, got {other:?}"),
    }
}

#[test]
fn commands_are_rejected_while_busy() {
    let (mut scheduler, _receiver) = Scheduler::new(SchedulerConfig {
        session: SessionConfig {
            columns: 10,
            rows: 10,
            seed: Some(4),
        },
        step_delay_ms: 5,
        generation_delay_ms: 5,
    })
    .expect("valid configuration");

    assert_eq!(
        scheduler.submit(Command::Generate).expect("worker spawns"),
        Submission::Accepted
    );
    assert_eq!(scheduler.phase(), Phase::Busy);
    assert_eq!(scheduler.snapshot().expect("healthy worker"), None);

    let solve = Command::Solve {
        algorithm: Algorithm::Bfs,
    };
    assert_eq!(
        scheduler.submit(solve).expect("rejection is not an error"),
        Submission::Rejected(solve)
    );

    scheduler.wait_idle().expect("worker completes");
    assert_eq!(scheduler.phase(), Phase::Idle);

    let snapshot = scheduler
        .snapshot()
        .expect("healthy worker")
        .expect("idle scheduler");
    assert!(snapshot.iter().all(|cell| !cell.visited && !cell.on_path));
    assert_eq!(
        scheduler.submit(solve).expect("worker spawns"),
        Submission::Accepted
    );
    scheduler.wait_idle().expect("worker completes");
}

fn await_report(receiver: &Receiver<Publication>) -> RunReport {
    loop {
        match receiver.recv().expect("scheduler keeps the channel open") {
            Publication::Finished { report, .. } => return report,
            Publication::Failed { command, error } => panic!("{command:?} failed: {error}"),
            Publication::Started { .. } | Publication::Step { .. } => {}
        }
    }
}

#[test]
fn next_command_is_accepted_as_soon_as_a_report_arrives() {
    let (mut scheduler, receiver) = headless(3, 3, 21);
    let solve = Command::Solve {
        algorithm: Algorithm::Bfs,
    };

    for _ in 0..100 {
        for command in [Command::Generate, solve] {
            assert_eq!(
                scheduler.submit(command).expect("worker spawns"),
                Submission::Accepted
            );
            let _ = await_report(&receiver);
            assert_eq!(scheduler.phase(), Phase::Idle);
        }
    }
    scheduler.wait_idle().expect("worker completes");
}

#[test]
fn generation_publishes_one_step_per_passage() {
    let (mut scheduler, receiver) = headless(10, 10, 8);
    run(&mut scheduler, Command::Generate);

    let publications = drain(&receiver);
    assert_eq!(
        publications.first(),
        Some(&Publication::Started {
            command: Command::Generate
        })
    );

    let carved = publications
        .iter()
        .filter(|publication| {
            matches!(
                publication,
                Publication::Step {
                    event: Event::PassageCarved { .. },
                    ..
                }
            )
        })
        .count();
    assert_eq!(carved, 99);

    let report = finished_report(&publications);
    assert_eq!(report, RunReport::MazeGenerated { passages: 99 });
    assert_eq!(report.status_message(), "Maze Generated.");
}

#[test]
fn step_snapshots_grow_the_maze_monotonically() {
    let (mut scheduler, receiver) = headless(6, 5, 3);
    run(&mut scheduler, Command::Generate);

    let open_walls: Vec<u32> = drain(&receiver)
        .iter()
        .filter(|publication| matches!(publication, Publication::Step { .. }))
        .filter_map(Publication::snapshot)
        .map(|snapshot| snapshot.iter().map(|cell| cell.walls.open_count()).sum())
        .collect();

    assert_eq!(open_walls.len(), 29);
    for (index, count) in open_walls.iter().enumerate() {
        assert_eq!(*count as usize, 2 * (index + 1));
    }
}

#[test]
fn solve_reports_path_matching_final_snapshot() {
    let (mut scheduler, receiver) = headless(8, 8, 12);
    run(&mut scheduler, Command::Generate);
    run(&mut scheduler, Command::RandomizeTerrain);
    let _ = drain(&receiver);

    for algorithm in Algorithm::ALL {
        run(&mut scheduler, Command::Solve { algorithm });
        let publications = drain(&receiver);

        let RunReport::SearchFinished(outcome) = finished_report(&publications) else {
            panic!("{algorithm} should report a search outcome");
        };
        assert_eq!(outcome.algorithm(), algorithm);
        let SearchOutcome::Found(report) = outcome else {
            panic!("{algorithm} should find a path in a generated maze");
        };
        let snapshot = publications
            .last()
            .and_then(Publication::snapshot)
            .expect("terminal snapshot");

        assert_eq!(report.algorithm, algorithm);
        assert_eq!(
            snapshot.iter().filter(|cell| cell.on_path).count(),
            report.steps
        );
        assert!(report.total_cost >= report.steps as u64);
    }
}

#[test]
fn reset_returns_to_a_closed_grid() {
    let (mut scheduler, receiver) = headless(5, 5, 1);
    run(&mut scheduler, Command::Generate);
    run(&mut scheduler, Command::Reset);

    let publications = drain(&receiver);
    assert_eq!(finished_report(&publications), RunReport::GridReset);

    let snapshot = scheduler
        .snapshot()
        .expect("healthy worker")
        .expect("idle scheduler");
    assert!(snapshot.iter().all(|cell| cell.walls.is_closed()));
}

#[test]
fn seeded_sessions_replay_identically() {
    let first = replay(77);
    let second = replay(77);

    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    assert!(first[0].ends_with("Maze Generated."));
}

fn replay(seed: u64) -> Vec<String> {
    let (mut scheduler, receiver) = headless(12, 9, seed);
    let commands = [
        Command::Generate,
        Command::RandomizeTerrain,
        Command::Solve {
            algorithm: Algorithm::Dijkstra,
        },
        Command::Solve {
            algorithm: Algorithm::AStar,
        },
        Command::Solve {
            algorithm: Algorithm::Dfs,
        },
    ];

    commands
        .into_iter()
        .map(|command| {
            run(&mut scheduler, command);
            let publications = drain(&receiver);
            let steps = publications
                .iter()
                .filter(|publication| matches!(publication, Publication::Step { .. }))
                .count();
            format!("{steps}: {}", finished_report(&publications).status_message())
        })
        .collect()
}

#[test]
fn configuration_parses_from_toml() {
    let config: SchedulerConfig = toml::from_str(
        r#"
        step_delay_ms = 0

        [session]
        columns = 7
        seed = 42
        "#,
    )
    .expect("valid toml");

    assert_eq!(config.step_delay_ms, 0);
    assert_eq!(config.session.columns, 7);
    assert_eq!(config.session.rows, 20);
    assert_eq!(config.session.seed, Some(42));
}
