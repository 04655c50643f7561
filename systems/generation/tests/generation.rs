use maze_lab_core::{CellCoord, GridError, GridSize};
use maze_lab_system_generation::{generate, CarveStep, PrimCarver};
use maze_lab_world::{query, Maze};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn carved(columns: u32, rows: u32, seed: u64) -> Maze {
    let mut maze = Maze::new(GridSize::new(columns, rows)).expect("valid size");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let _ = generate(&mut maze, &mut rng, |_, _, _| {}).expect("fresh maze");
    maze
}

#[test]
fn generated_mazes_are_spanning_trees() {
    for (columns, rows) in [(2, 2), (5, 5), (3, 7), (7, 3), (1, 6), (6, 1), (12, 9)] {
        for seed in 0..8 {
            let maze = carved(columns, rows, seed);
            let cell_count = (columns * rows) as usize;

            assert_eq!(
                query::passage_count(&maze),
                cell_count - 1,
                "{columns}x{rows} seed {seed} must open exactly one passage per non-start cell",
            );
            assert!(
                query::is_connected(&maze),
                "{columns}x{rows} seed {seed} must reach every cell",
            );
            assert!(query::is_spanning_tree(&maze));
        }
    }
}

#[test]
fn every_carve_step_joins_a_new_cell() {
    let mut maze = Maze::new(GridSize::new(6, 4)).expect("valid size");
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut carver = PrimCarver::begin(&mut maze).expect("fresh maze");
    let mut joined = vec![maze.start()];

    loop {
        match carver.step(&mut maze, &mut rng).expect("valid carve") {
            CarveStep::Carved { from, to } => {
                assert!(joined.contains(&from), "{from} must already be carved");
                assert!(!joined.contains(&to), "{to} must join the maze once");
                assert_eq!(from.manhattan_distance(to), 1);
                joined.push(to);
            }
            CarveStep::Complete { passages } => {
                assert_eq!(passages, 23);
                break;
            }
        }
    }

    assert_eq!(joined.len(), 24);
    assert_eq!(query::visited_count(&maze), 0, "completion clears scratch");
}

#[test]
fn carve_callback_fires_once_per_passage() {
    let mut maze = Maze::new(GridSize::new(5, 5)).expect("valid size");
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut carved_pairs = Vec::new();

    let passages = generate(&mut maze, &mut rng, |from, to, current| {
        assert!(current.neighbors_of(from).any(|cell| cell == to));
        carved_pairs.push((from, to));
    })
    .expect("fresh maze");

    assert_eq!(passages, 24);
    assert_eq!(carved_pairs.len(), 24);
}

#[test]
fn same_seed_produces_identical_maze() {
    let first = carved(5, 5, 42);
    let second = carved(5, 5, 42);

    assert_eq!(first.snapshot(), second.snapshot());
}

#[test]
fn different_seeds_usually_produce_different_mazes() {
    let distinct = (0..6)
        .map(|seed| carved(8, 8, seed).snapshot())
        .collect::<Vec<_>>();

    assert!(
        distinct.windows(2).any(|pair| pair[0] != pair[1]),
        "seeded generation should vary with the seed",
    );
}

#[test]
fn generation_requires_fresh_grid() {
    let mut maze = carved(4, 4, 9);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    assert_eq!(
        generate(&mut maze, &mut rng, |_, _, _| {}),
        Err(GridError::NotFresh)
    );

    maze.reset_structure();
    let passages = generate(&mut maze, &mut rng, |_, _, _| {}).expect("fresh again");
    assert_eq!(passages, 15);
    assert!(query::is_spanning_tree(&maze));
}

#[test]
fn goal_is_reachable_after_generation() {
    let maze = carved(9, 7, 5);
    let distances = query::distances_from(&maze, maze.start());
    let goal_index = maze
        .size()
        .index_of(maze.goal())
        .expect("goal in bounds");

    assert_ne!(distances[goal_index], u32::MAX);
    assert_eq!(maze.goal(), CellCoord::new(8, 6));
}
