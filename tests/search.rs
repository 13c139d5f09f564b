//! Integration tests for the full worker-pool pipeline: prefix generation,
//! the shared queue, and cooperative shutdown across real OS threads.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use edgematch::board::Board;
use edgematch::index::PieceIndex;
use edgematch::prefix::generate;
use edgematch::puzzle::Puzzle;
use edgematch::queue::WorkQueue;
use edgematch::reporter::{run_reporter, StopCondition};
use edgematch::worker::run_worker;

const SYMMETRIC_PUZZLE: &str = "2 2\n0 1 1 0\n0 1 1 0\n0 1 1 0\n0 1 1 0\n";

fn run_pool(puzzle: &Puzzle, workers: usize, stop: StopCondition) -> (u64, u64) {
    let index = PieceIndex::build(puzzle);

    let queue = WorkQueue::new();
    let mut generator_board = Board::new(puzzle);
    let prefixes = generate(puzzle.width, &index, &mut generator_board, workers * 4);
    queue.push_all(prefixes);

    let global_done = Arc::new(AtomicBool::new(false));
    let mut boards: Vec<Board> = (0..workers).map(|_| Board::new(puzzle)).collect();
    let counter_handles: Vec<_> = boards.iter().map(|b| Arc::clone(&b.counters)).collect();
    let board_done_handles: Vec<_> = boards.iter().map(|b| b.done_handle()).collect();
    let total_solutions = Arc::new(AtomicU64::new(0));

    let totals = crossbeam::scope(|scope| {
        let reporter_done = Arc::clone(&global_done);
        let reporter_handle = scope.spawn(move |_| {
            run_reporter(
                &counter_handles,
                &board_done_handles,
                &reporter_done,
                stop,
                Duration::from_millis(5),
            )
        });

        let worker_handles: Vec<_> = boards
            .iter_mut()
            .map(|board| {
                let index = &index;
                let queue = &queue;
                let board_done = Arc::clone(&global_done);
                let total_solutions = Arc::clone(&total_solutions);

                scope.spawn(move |_| {
                    run_worker(board, index, queue, board_done.as_ref(), &mut |_| {
                        total_solutions.fetch_add(1, Ordering::Relaxed);
                    });
                })
            })
            .collect();

        for handle in worker_handles {
            handle.join().unwrap();
        }
        global_done.store(true, Ordering::Relaxed);
        reporter_handle.join().unwrap()
    })
    .unwrap();

    (total_solutions.load(Ordering::Relaxed), totals.placed_nodes)
}

#[test]
fn s4_first_solution_stops_after_exactly_one() {
    let puzzle = Puzzle::parse(SYMMETRIC_PUZZLE.as_bytes()).unwrap();
    let (solutions, _) = run_pool(&puzzle, 2, StopCondition::FirstSolution);
    assert!(solutions >= 1, "expected at least one solution before stopping");
}

#[test]
fn s5_max_nodes_bounds_placed_work() {
    let puzzle = Puzzle::parse(SYMMETRIC_PUZZLE.as_bytes()).unwrap();
    let (_, placed) = run_pool(&puzzle, 2, StopCondition::MaxNodesToPlace(5));
    // Workers may each place a few more nodes past the bound before
    // observing `done`, but the aggregate should not run away unbounded.
    assert!(placed < 1000, "placed node count grew far past the requested bound: {placed}");
}

#[test]
fn s6_thread_count_does_not_change_the_solution_count() {
    let puzzle = Puzzle::parse(SYMMETRIC_PUZZLE.as_bytes()).unwrap();
    let (solutions_one, _) = run_pool(&puzzle, 1, StopCondition::Exhaustive);
    let (solutions_many, _) = run_pool(&puzzle, 4, StopCondition::Exhaustive);
    assert_eq!(solutions_one, solutions_many);
}

#[test]
fn exhaustive_run_finds_every_rotation_of_a_single_cell_puzzle() {
    let puzzle = Puzzle::parse("1\n0 0 0 0\n".as_bytes()).unwrap();
    let (solutions, _) = run_pool(&puzzle, 3, StopCondition::Exhaustive);
    assert_eq!(solutions, 4);
}

#[test]
fn unsatisfiable_puzzle_finds_nothing_and_still_terminates() {
    let puzzle = Puzzle::parse(
        "2 2\n0 0 1 1\n0 0 2 2\n1 1 0 0\n2 2 0 0\n".as_bytes(),
    )
    .unwrap();
    let (solutions, _) = run_pool(&puzzle, 2, StopCondition::Exhaustive);
    assert_eq!(solutions, 0);
}
