//! senku: CLI binary for the Monte-Carlo peg solitaire solver.
//!
//! Subcommands:
//! - run
//! - replay
//! - board

mod events;
mod render;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use sk_core::{legal_moves, Board, Config, Move, TrialSink};
use sk_logging::{hash_config_bytes, make_run_id, now_ms, write_json_atomic, NdjsonWriter};
use sk_search::{replay_trial, RunReport, SearchParams, Searcher};

use events::EventLog;
use render::Glyphs;

/// Value following `args[i]`, parsed, or exit with a message.
fn flag_value<T: FromStr>(args: &[String], i: usize) -> T {
    let flag = &args[i];
    if i + 1 >= args.len() {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    }
    args[i + 1].parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {}", args[i + 1]);
        process::exit(1);
    })
}

fn load_board_file(path: &Path) -> Board {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read board file {}: {e}", path.display());
        process::exit(1);
    });
    Board::parse(&text).unwrap_or_else(|e| {
        eprintln!("Invalid board file {}: {e}", path.display());
        process::exit(1);
    })
}

fn print_help() {
    eprintln!(
        r#"senku - Monte-Carlo peg solitaire solver

USAGE:
    senku <COMMAND> [OPTIONS]

COMMANDS:
    run         Play random trials until one leaves a single peg
    replay      Replay one trial of a run move by move
    board       Print a board and its legal moves

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `senku <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("senku {}", env!("CARGO_PKG_VERSION"));
}

fn print_trial(label: &str, rec: &sk_search::TrialRecord, g: Glyphs) {
    println!(
        "{label:<13}{} pegs (try #{}, {} moves, {})",
        rec.outcome.remaining,
        render::thousands(rec.index),
        rec.outcome.moves_played,
        rec.outcome.end.as_str()
    );
    print!("{}", render::board(&rec.outcome.board, g, "    "));
}

fn print_report(r: &RunReport, g: Glyphs) {
    println!();
    println!("Tries:       {}", render::thousands(r.tries));
    println!("Solved:      {}", render::yes_no(r.solved));
    println!("Stopped:     {}", r.end.as_str());
    println!("Total moves: {}", render::thousands(r.total_moves));
    print_trial("Best:", &r.best, g);
    print_trial("Worst:", &r.worst, g);
    println!(
        "End reasons: solved={} stuck={} move_cap={}",
        render::thousands(r.end_reasons.solved),
        render::thousands(r.end_reasons.stuck),
        render::thousands(r.end_reasons.move_cap)
    );
    println!("Remaining pegs:");
    for (pegs, n) in &r.remaining_histogram {
        println!("  {pegs:>2}: {}", render::thousands(*n));
    }
    println!("Seed:        {}", r.seed);
    println!("Time:        {}", render::elapsed(r.elapsed));
}

fn cmd_run(args: &[String]) {
    let mut config_path: Option<PathBuf> = None;
    let mut tries: Option<u64> = None;
    let mut move_cap: Option<u32> = None;
    let mut seed: Option<u64> = None;
    let mut threads: Option<usize> = None;
    let mut batch: Option<usize> = None;
    let mut board_path: Option<PathBuf> = None;
    let mut events_path: Option<PathBuf> = None;
    let mut report_path: Option<PathBuf> = None;
    let mut ascii = false;
    let mut show_moves = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"senku run

USAGE:
    senku run [OPTIONS]

OPTIONS:
    --config PATH        YAML config (default: built-in defaults)
    --tries N            Try cap for the run (default: 1000000)
    --move-cap N         Move cap per trial (default: 32)
    --seed S             Run seed (default: random, printed)
    --threads N          0 = all cores, 1 = sequential (default: 0)
    --batch N            Tries per batch (default: 4096)
    --board FILE         Start from a custom board (7 rows: o peg, . hole)
    --events PATH        Append NDJSON run events to PATH
    --report-json PATH   Write the final report as JSON
    --ascii              Draw boards with o/. instead of emoji
    --show-moves         Print the move list of the last trial
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(flag_value(args, i));
                i += 2;
            }
            "--tries" => {
                tries = Some(flag_value(args, i));
                i += 2;
            }
            "--move-cap" => {
                move_cap = Some(flag_value(args, i));
                i += 2;
            }
            "--seed" => {
                seed = Some(flag_value(args, i));
                i += 2;
            }
            "--threads" => {
                threads = Some(flag_value(args, i));
                i += 2;
            }
            "--batch" => {
                batch = Some(flag_value(args, i));
                i += 2;
            }
            "--board" => {
                board_path = Some(flag_value(args, i));
                i += 2;
            }
            "--events" => {
                events_path = Some(flag_value(args, i));
                i += 2;
            }
            "--report-json" => {
                report_path = Some(flag_value(args, i));
                i += 2;
            }
            "--ascii" => {
                ascii = true;
                i += 1;
            }
            "--show-moves" => {
                show_moves = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `senku run`: {}", other);
                eprintln!("Run `senku run --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (mut cfg, config_hash) = match &config_path {
        Some(p) => {
            let bytes = fs::read(p).unwrap_or_else(|e| {
                eprintln!("Failed to read config {}: {e}", p.display());
                process::exit(1);
            });
            let text = String::from_utf8_lossy(&bytes);
            let cfg = Config::from_yaml(&text).unwrap_or_else(|e| {
                eprintln!("Invalid config {}: {e}", p.display());
                process::exit(1);
            });
            (cfg, Some(hash_config_bytes(&bytes)))
        }
        None => (Config::default(), None),
    };

    if let Some(v) = tries {
        cfg.search.max_tries = v;
    }
    if let Some(v) = move_cap {
        cfg.search.move_cap = v;
    }
    if seed.is_some() {
        cfg.search.seed = seed;
    }
    if let Some(v) = threads {
        cfg.search.threads = v;
    }
    if let Some(v) = batch {
        cfg.search.batch_size = v;
    }
    if let Some(p) = &board_path {
        cfg.board.layout = Some(load_board_file(p).rows());
    }
    if events_path.is_some() {
        cfg.logging.events_path = events_path;
    }
    if let Err(e) = cfg.validate() {
        eprintln!("Invalid run settings: {e}");
        process::exit(1);
    }

    let params = SearchParams::from_config(&cfg).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    let searcher = Searcher::new(params.clone()).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    let g = Glyphs::pick(ascii);
    let run_id = make_run_id(params.seed, now_ms());

    println!(
        "Solving: {} pegs, up to {} tries, move cap {}, seed {}",
        params.start.remaining_pegs(),
        render::thousands(params.max_tries),
        params.move_cap,
        params.seed
    );
    print!("{}", render::board(&params.start, g, "    "));

    let result = match &cfg.logging.events_path {
        Some(path) => {
            let w = NdjsonWriter::open_append_with_flush(path, cfg.logging.flush_every_lines)
                .unwrap_or_else(|e| {
                    eprintln!("Failed to open events log {}: {e}", path.display());
                    process::exit(1);
                });
            let mut log = EventLog::new(w, run_id.clone(), cfg.logging.progress_every_batches);
            log.started(&params, config_hash);
            let result = searcher.run_observed(&mut log);
            if let Ok(report) = &result {
                if let Err(e) = log.finish(report) {
                    eprintln!("Failed to write events log: {e}");
                    process::exit(1);
                }
            }
            result
        }
        None => searcher.run(),
    };
    let report = result.unwrap_or_else(|e| {
        eprintln!("Search failed: {e}");
        process::exit(1);
    });

    print_report(&report, g);

    if show_moves {
        let mut history: Vec<Move> = Vec::new();
        replay_trial(&params, report.last.index, &mut history);
        println!("Moves of try #{}:", render::thousands(report.last.index));
        for (k, mv) in history.iter().enumerate() {
            println!("  {:>2}. {mv}", k + 1);
        }
    }

    if let Some(path) = &report_path {
        let ev = events::run_finished(&report, &run_id);
        if let Err(e) = write_json_atomic(path, &ev) {
            eprintln!("Failed to write report {}: {e}", path.display());
            process::exit(1);
        }
        println!("Report written to {}", path.display());
    }
}

/// Prints the board after every move.
struct PrintMoves {
    g: Glyphs,
}

impl TrialSink for PrintMoves {
    fn on_move(&mut self, ply: u32, mv: &Move, board: &Board) {
        println!();
        println!("Move {}: {mv} ({} pegs left)", ply + 1, board.remaining_pegs());
        print!("{}", render::board(board, self.g, "    "));
    }
}

fn cmd_replay(args: &[String]) {
    let mut seed: Option<u64> = None;
    let mut try_index: Option<u64> = None;
    let mut move_cap: Option<u32> = None;
    let mut board_path: Option<PathBuf> = None;
    let mut ascii = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"senku replay

USAGE:
    senku replay --seed S --try N [OPTIONS]

OPTIONS:
    --seed S         Run seed printed by `senku run`
    --try N          Try number within the run (0-based)
    --move-cap N     Move cap per trial (default: 32)
    --board FILE     Custom start board used by the run
    --ascii          Draw boards with o/. instead of emoji
"#
                );
                return;
            }
            "--seed" => {
                seed = Some(flag_value(args, i));
                i += 2;
            }
            "--try" => {
                try_index = Some(flag_value(args, i));
                i += 2;
            }
            "--move-cap" => {
                move_cap = Some(flag_value(args, i));
                i += 2;
            }
            "--board" => {
                board_path = Some(flag_value(args, i));
                i += 2;
            }
            "--ascii" => {
                ascii = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `senku replay`: {}", other);
                eprintln!("Run `senku replay --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(seed) = seed else {
        eprintln!("Missing --seed");
        process::exit(1);
    };
    let Some(try_index) = try_index else {
        eprintln!("Missing --try");
        process::exit(1);
    };

    let mut params = SearchParams::new(seed);
    if let Some(v) = move_cap {
        params.move_cap = v;
    }
    if let Some(p) = &board_path {
        params.start = load_board_file(p);
    }

    let g = Glyphs::pick(ascii);
    println!(
        "Replaying try #{} of seed {} ({} pegs)",
        render::thousands(try_index),
        seed,
        params.start.remaining_pegs()
    );
    print!("{}", render::board(&params.start, g, "    "));

    let rec = replay_trial(&params, try_index, &mut PrintMoves { g });
    println!();
    println!(
        "Result: {} pegs after {} moves ({})",
        rec.outcome.remaining,
        rec.outcome.moves_played,
        rec.outcome.end.as_str()
    );
}

fn cmd_board(args: &[String]) {
    let mut board_path: Option<PathBuf> = None;
    let mut ascii = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"senku board

USAGE:
    senku board [--board FILE] [--ascii]

OPTIONS:
    --board FILE     Board file (default: standard start)
    --ascii          Draw with o/. instead of emoji
"#
                );
                return;
            }
            "--board" => {
                board_path = Some(flag_value(args, i));
                i += 2;
            }
            "--ascii" => {
                ascii = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `senku board`: {}", other);
                eprintln!("Run `senku board --help` for usage.");
                process::exit(1);
            }
        }
    }

    let b = match &board_path {
        Some(p) => load_board_file(p),
        None => Board::new(),
    };
    print!("{}", render::board(&b, Glyphs::pick(ascii), ""));
    println!("Pegs: {}", b.remaining_pegs());
    let moves = legal_moves(&b);
    println!("Legal moves: {}", moves.len());
    for mv in &moves {
        println!("  {mv}");
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "run" => {
            cmd_run(&args[2..]);
        }
        "replay" => {
            cmd_replay(&args[2..]);
        }
        "board" => {
            cmd_board(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `senku --help` for usage.");
            process::exit(1);
        }
    }
}
