use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use env_logger::{Builder, Target};
use log::{debug, info, warn, LevelFilter};

use edgematch::board::Board;
use edgematch::format::{humanize, print_board, viewer_url};
use edgematch::index::PieceIndex;
use edgematch::prefix::generate;
use edgematch::puzzle::Puzzle;
use edgematch::queue::WorkQueue;
use edgematch::reporter::{run_reporter, StopCondition, PRINT_MUTEX};
use edgematch::worker::run_worker;
use edgematch::PuzzleError;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Parallel backtracking solver for edge-matching puzzles")]
struct Opt {
    /// Input puzzle file path
    #[clap(short, long)]
    puzzle: PathBuf,

    /// Stop after the first solution
    #[clap(short, long)]
    first: bool,

    /// Print each solution to standard output
    #[clap(short, long)]
    display: bool,

    /// Print a viewer URL for each displayed solution
    #[clap(short = 'u', long)]
    bucas: bool,

    /// Abort once total placed nodes reaches this bound (disabled if <= 0)
    #[clap(short, long, default_value_t = -1)]
    max_nodes: i64,

    /// Maximum worker threads (clamped to available_parallelism - 1, minimum 1)
    #[clap(short, long, default_value_t = 1)]
    number_threads: i64,

    /// Raises log verbosity: -v info, -vv debug, -vvv trace
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Error,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter(None, level)
        .default_format()
        .target(Target::Stderr)
        .init();
}

fn thread_count(requested: i64) -> usize {
    let hw = num_cpus::get().max(2);
    let ceiling = hw - 1;
    if requested <= 0 {
        1
    } else {
        (requested as usize).min(ceiling).max(1)
    }
}

fn run() -> Result<ExitCode, PuzzleError> {
    let opt = Opt::parse();
    init_logging(opt.verbose);

    let puzzle = Puzzle::load(&opt.puzzle)?;
    info!(
        "loaded puzzle {}x{} ({} pieces)",
        puzzle.width,
        puzzle.height,
        puzzle.pieces.len()
    );

    let index = PieceIndex::build(&puzzle);
    debug!("piece index built");

    let workers = thread_count(opt.number_threads);
    info!("using {workers} worker thread(s)");

    let stop_condition = if opt.first {
        StopCondition::FirstSolution
    } else if opt.max_nodes > 0 {
        StopCondition::MaxNodesToPlace(opt.max_nodes as u64)
    } else {
        StopCondition::Exhaustive
    };

    let queue = WorkQueue::new();
    let mut generator_board = Board::new(&puzzle);
    let prefixes = generate(puzzle.width, &index, &mut generator_board, workers * 4);
    info!("generated {} prefixes for {workers} worker(s)", prefixes.len());
    queue.push_all(prefixes);

    let global_done = Arc::new(AtomicBool::new(false));
    let mut boards: Vec<Board> = (0..workers).map(|_| Board::new(&puzzle)).collect();
    let counter_handles: Vec<_> = boards.iter().map(|b| Arc::clone(&b.counters)).collect();
    let board_done_handles: Vec<_> = boards.iter().map(|b| b.done_handle()).collect();

    let totals = crossbeam::scope(|scope| {
        let reporter_done = Arc::clone(&global_done);
        let reporter_handle = scope.spawn(move |_| {
            run_reporter(
                &counter_handles,
                &board_done_handles,
                &reporter_done,
                stop_condition,
                Duration::from_secs(1),
            )
        });

        let worker_handles: Vec<_> = boards
            .iter_mut()
            .map(|board| {
                let index = &index;
                let queue = &queue;
                let puzzle_ref = &puzzle;
                let board_done = Arc::clone(&global_done);
                let display = opt.display;
                let bucas = opt.bucas;

                scope.spawn(move |_| {
                    run_worker(board, index, queue, board_done.as_ref(), &mut |board| {
                        if display {
                            let _guard = PRINT_MUTEX.lock();
                            println!("{}", print_board(board));
                            if bucas {
                                println!("{}", viewer_url(board, puzzle_ref, board.total_cells));
                            }
                        }
                    });
                })
            })
            .collect();

        for handle in worker_handles {
            handle.join().unwrap();
        }

        // Every worker has drained the queue (or a stop condition already
        // raised this flag). Either way it is now safe to tell the Reporter
        // to stop: no worker can produce another counter update past here.
        global_done.store(true, std::sync::atomic::Ordering::Relaxed);

        reporter_handle.join().unwrap()
    })
    .unwrap();

    info!(
        "search finished: {} solutions, {} placed nodes",
        totals.solutions,
        humanize(totals.placed_nodes)
    );

    if totals.solutions == 0 {
        warn!("no solutions found");
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
