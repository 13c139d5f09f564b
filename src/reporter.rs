//! The controller thread: ticks once a second, aggregates every worker
//! board's counters, prints a status line, and enforces the chosen stop
//! condition by raising the shared `done` flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;
use parking_lot::Mutex;

use crate::counter::BoardCounters;
use crate::format::humanize;

/// When to stop a running search, beyond plain exhaustion of the queue.
#[derive(Clone, Copy, Debug)]
pub enum StopCondition {
    /// Run until every prefix has been fully explored.
    Exhaustive,
    /// Stop as soon as any worker reports a solution.
    FirstSolution,
    /// Stop once the aggregate placed-node count reaches the given bound.
    MaxNodesToPlace(u64),
}

/// Totals summed across every worker board at one reporting tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct Totals {
    pub checked_nodes: u64,
    pub placed_nodes: u64,
    pub solutions: u64,
    pub max_depth: u64,
}

fn aggregate(counters: &[Arc<BoardCounters>]) -> Totals {
    let mut totals = Totals::default();
    for c in counters {
        totals.checked_nodes += c.checked_nodes();
        totals.placed_nodes += c.placed_nodes();
        totals.solutions += c.solutions();
        totals.max_depth = totals.max_depth.max(c.max_depth());
    }
    totals
}

fn should_stop(condition: StopCondition, totals: Totals) -> bool {
    match condition {
        StopCondition::Exhaustive => false,
        StopCondition::FirstSolution => totals.solutions > 0,
        StopCondition::MaxNodesToPlace(bound) => totals.placed_nodes >= bound,
    }
}

/// Serializes the human-readable progress lines that the reporter and any
/// worker diagnostics print, so concurrent writers never interleave output.
pub static PRINT_MUTEX: Mutex<()> = Mutex::new(());

/// Runs the reporting loop until the queue is drained (signalled externally
/// by setting `global_done`) or a stop condition fires. Call this on its own
/// thread; it blocks for the duration of the search and returns final
/// totals once `global_done` is observed true.
///
/// When a stop condition fires, every board's own `done` flag is raised too,
/// so a worker mid-recursion abandons its current subtree instead of running
/// it out to completion before noticing `global_done` on its next queue pop.
pub fn run_reporter(
    counters: &[Arc<BoardCounters>],
    board_dones: &[Arc<AtomicBool>],
    global_done: &Arc<AtomicBool>,
    condition: StopCondition,
    tick: Duration,
) -> Totals {
    let start = Instant::now();

    loop {
        std::thread::sleep(tick);

        let totals = aggregate(counters);
        report_line(&totals, start.elapsed());

        if should_stop(condition, totals) {
            for done in board_dones {
                done.store(true, Ordering::Relaxed);
            }
            global_done.store(true, Ordering::Relaxed);
            return aggregate(counters);
        }

        if global_done.load(Ordering::Relaxed) {
            return aggregate(counters);
        }
    }
}

fn report_line(totals: &Totals, elapsed: Duration) {
    let _guard = PRINT_MUTEX.lock();
    info!(
        "t={:>6.1}s checked={} placed={} solutions={} depth={}",
        elapsed.as_secs_f64(),
        humanize(totals.checked_nodes),
        humanize(totals.placed_nodes),
        totals.solutions,
        totals.max_depth,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters_with(checked: u64, placed: u64, solutions: u64) -> Arc<BoardCounters> {
        let counters = Arc::new(BoardCounters::zero());
        for _ in 0..checked {
            counters.increment_checked();
        }
        for _ in 0..placed {
            counters.increment_placed();
        }
        for _ in 0..solutions {
            counters.increment_solutions();
        }
        counters
    }

    #[test]
    fn aggregate_sums_across_boards() {
        let counters = vec![counters_with(10, 5, 0), counters_with(20, 8, 1)];
        let totals = aggregate(&counters);
        assert_eq!(totals.checked_nodes, 30);
        assert_eq!(totals.placed_nodes, 13);
        assert_eq!(totals.solutions, 1);
    }

    #[test]
    fn first_solution_condition_fires_only_after_a_solution() {
        let none = Totals { solutions: 0, ..Totals::default() };
        let one = Totals { solutions: 1, ..Totals::default() };
        assert!(!should_stop(StopCondition::FirstSolution, none));
        assert!(should_stop(StopCondition::FirstSolution, one));
    }

    #[test]
    fn max_nodes_condition_fires_at_bound() {
        let under = Totals { placed_nodes: 99, ..Totals::default() };
        let at = Totals { placed_nodes: 100, ..Totals::default() };
        assert!(!should_stop(StopCondition::MaxNodesToPlace(100), under));
        assert!(should_stop(StopCondition::MaxNodesToPlace(100), at));
    }

    #[test]
    fn exhaustive_condition_never_fires_on_its_own() {
        let totals = Totals { solutions: 100, placed_nodes: u64::MAX, ..Totals::default() };
        assert!(!should_stop(StopCondition::Exhaustive, totals));
    }

    #[test]
    fn run_reporter_returns_once_global_done_is_set_externally() {
        let counters = vec![counters_with(1, 1, 0)];
        let board_dones: Vec<Arc<AtomicBool>> = vec![];
        let global_done = Arc::new(AtomicBool::new(false));
        let done_clone = Arc::clone(&global_done);

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            done_clone.store(true, Ordering::Relaxed);
        });

        let totals = run_reporter(
            &counters,
            &board_dones,
            &global_done,
            StopCondition::Exhaustive,
            Duration::from_millis(5),
        );
        handle.join().unwrap();

        assert_eq!(totals.checked_nodes, 1);
    }

    #[test]
    fn run_reporter_raises_every_board_done_flag_when_a_stop_condition_fires() {
        let counters = vec![counters_with(0, 0, 1)];
        let board_dones = vec![Arc::new(AtomicBool::new(false)), Arc::new(AtomicBool::new(false))];
        let global_done = Arc::new(AtomicBool::new(false));

        run_reporter(
            &counters,
            &board_dones,
            &global_done,
            StopCondition::FirstSolution,
            Duration::from_millis(1),
        );

        assert!(board_dones.iter().all(|d| d.load(Ordering::Relaxed)));
        assert!(global_done.load(Ordering::Relaxed));
    }
}
