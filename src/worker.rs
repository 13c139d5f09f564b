//! One worker thread's main loop: pull a prefix off the queue, apply it to
//! a private board, and resume the backtracker from there.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::backtrack::backtrack;
use crate::board::Board;
use crate::index::PieceIndex;
use crate::prefix::{apply_prefix, Prefix};
use crate::queue::WorkQueue;

/// How long a worker blocks on an empty queue before re-checking the global
/// `done` flag. Short enough that `--first`/`--max-nodes` shutdown and
/// ordinary queue exhaustion are both noticed promptly.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs on a dedicated OS thread for the lifetime of the search. Owns
/// `board` exclusively; nothing else ever touches it.
pub fn run_worker(
    board: &mut Board,
    index: &PieceIndex,
    queue: &WorkQueue<Prefix>,
    global_done: &std::sync::atomic::AtomicBool,
    on_solution: &mut impl FnMut(&mut Board),
) {
    loop {
        if global_done.load(Ordering::Relaxed) {
            return;
        }

        let prefix = match queue.pop_wait(POLL_INTERVAL) {
            Some(prefix) => prefix,
            None => {
                if queue.is_empty() {
                    return;
                }
                continue;
            }
        };

        board.reset_for_prefix();
        let start_depth = apply_prefix(board, &prefix);

        backtrack(board, index, start_depth, on_solution);
    }
}
