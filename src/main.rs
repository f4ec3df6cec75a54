use std::io::{stdin, stdout, BufRead, Write};
use std::time::Instant;

use anyhow::{bail, Context};

use clap::arg;
use clap::command;
use clap::ArgMatches;
use clap::Command;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use gambit::engines::RandomEngine;
use gambit::perft::{perft, perft_divide};
use gambit::session::{GameSession, PlayerKind};
use gambit::{ChessError, GameState, Move};

const DEFAULT_MAX_PLIES: usize = 200;

fn main() -> anyhow::Result<()> {
    let matches = command!()
        .version("v0.1.0")
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Print the board and the legal moves after every ply"
        ))
        .subcommand(
            Command::new("play")
                .about("Play a game in the terminal")
                .arg(arg!(--white <player> "Who plays white").value_parser(["human", "computer"]).default_value("human"))
                .arg(arg!(--black <player> "Who plays black").value_parser(["human", "computer"]).default_value("computer"))
                .arg(seed_arg())
                .arg(max_plies_arg()),
        )
        .subcommand(
            Command::new("selfplay")
                .about("Let two random players play each other")
                .arg(seed_arg())
                .arg(max_plies_arg()),
        )
        .subcommand(
            Command::new("perft")
                .about("Run Perft test")
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8).range(1..)),
                )
                .arg(
                    arg!(
                    -m --moves <moves> "List of moves"
                            )
                    .num_args(1..)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("benchmark").about("Runs a perft benchmark").arg(
                arg!(
                -x --depth <d> "Maximal depth"
                        )
                .default_value("4")
                .value_parser(clap::value_parser!(u8).range(1..)),
            ),
        )
        .get_matches();

    let debug = matches.get_flag("debug");

    match matches.subcommand() {
        Some(("play", arg_matches)) => {
            let white = player_kind(arg_matches, "white");
            let black = player_kind(arg_matches, "black");
            play(white, black, seed(arg_matches), max_plies(arg_matches), debug)
        }
        Some(("selfplay", arg_matches)) => selfplay(seed(arg_matches), max_plies(arg_matches), debug),
        Some(("perft", arg_matches)) => {
            let depth = *arg_matches.get_one::<u8>("depth").unwrap_or(&3);
            let moves = arg_matches
                .get_many::<String>("moves")
                .unwrap_or_default()
                .filter(|&v| !v.is_empty())
                .collect::<Vec<_>>();
            run_perft(moves, depth)
        }
        Some(("benchmark", arg_matches)) => {
            benchmark(*arg_matches.get_one::<u8>("depth").unwrap_or(&4));
            Ok(())
        }
        None => play(PlayerKind::Human, PlayerKind::Computer, None, DEFAULT_MAX_PLIES, debug),
        _ => unreachable!("Exhausted list of subcommands"),
    }
}

fn seed_arg() -> clap::Arg {
    arg!(
    --seed <n> "Seed for the random player"
            )
    .value_parser(clap::value_parser!(u64))
}

fn max_plies_arg() -> clap::Arg {
    arg!(
    --"max-plies" <n> "Stop a game between two computers after this many plies"
            )
    .default_value("200")
    .value_parser(clap::value_parser!(usize))
}

fn max_plies(arg_matches: &ArgMatches) -> usize {
    *arg_matches.get_one::<usize>("max-plies").unwrap_or(&DEFAULT_MAX_PLIES)
}

fn seed(arg_matches: &ArgMatches) -> Option<u64> {
    arg_matches.get_one::<u64>("seed").copied()
}

fn player_kind(arg_matches: &ArgMatches, id: &str) -> PlayerKind {
    match arg_matches.get_one::<String>(id).map(String::as_str) {
        Some("computer") => PlayerKind::Computer,
        _ => PlayerKind::Human,
    }
}

fn new_engine(seed: Option<u64>) -> RandomEngine {
    match seed {
        Some(seed) => RandomEngine::seeded(seed),
        None => RandomEngine::new(),
    }
}

fn show(session: &GameSession, debug: bool) {
    if debug {
        println!("{}", session.game().render_to_string());
        println!("Legal moves: {}", notation_list(session.valid_moves()));
    }
    if let Some(outcome) = session.outcome() {
        println!("{}", outcome);
    } else if session.game().in_check() {
        println!("Check!");
    }
}

fn describe(mv: &Move) -> String {
    if mv.is_capture() {
        format!("{} (capture)", mv)
    } else {
        mv.to_string()
    }
}

fn notation_list(moves: &[Move]) -> String {
    let mut notations: Vec<_> = moves.iter().map(|m| m.get_chess_notation()).collect();
    notations.sort();
    notations.join(" ")
}

fn play(white: PlayerKind, black: PlayerKind, seed: Option<u64>, max_plies: usize, debug: bool) -> anyhow::Result<()> {
    let mut session = GameSession::new(white, black, Box::new(new_engine(seed)));
    let computers_only = white == PlayerKind::Computer && black == PlayerKind::Computer;
    println!("{}", session.game().render_to_string());
    println!("Enter moves like e2e4, or undo, reset, moves, quit.");

    let mut lines = stdin().lock().lines();
    loop {
        if computers_only {
            let plies = session.game().move_log().len();
            if session.is_game_over() {
                break;
            }
            if plies >= max_plies {
                println!("No result after {} plies", plies);
                break;
            }
        }

        if !session.is_game_over() && !session.is_human_turn() {
            let color = session.game().active_color();
            let Some(mv) = session.play_computer_move() else {
                bail!("no move from the computer player");
            };
            println!("{} ({}) plays {}", color, session.engine_name(), describe(&mv));
            show(&session, debug);
            continue;
        }

        print!("{}> ", session.game().active_color());
        stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading the next command")?;

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "undo" => {
                session.undo();
                // against a computer, take back its reply as well
                if !session.is_human_turn() && !session.game().move_log().is_empty() {
                    session.undo();
                }
                println!("{}", session.game().render_to_string());
            }
            "reset" => {
                session.reset();
                println!("{}", session.game().render_to_string());
            }
            "moves" => println!("{}", notation_list(session.valid_moves())),
            text => {
                let color = session.game().active_color();
                match session.submit(text) {
                    Ok(mv) => {
                        println!("{} plays {}", color, describe(&mv));
                        show(&session, debug);
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
        }
    }
    Ok(())
}

fn selfplay(seed: Option<u64>, max_plies: usize, debug: bool) -> anyhow::Result<()> {
    let mut session = GameSession::new(PlayerKind::Computer, PlayerKind::Computer, Box::new(new_engine(seed)));
    let mut plies = 0;
    while !session.is_game_over() && plies < max_plies {
        let Some(mv) = session.play_computer_move() else {
            bail!("no move from the computer player");
        };
        plies += 1;
        println!("{}. {}", plies, describe(&mv));
        if debug {
            println!("{}", session.game().render_to_string());
        }
    }

    println!("{}", session.game().render_to_string());
    match session.outcome() {
        Some(outcome) => println!("{} after {} plies", outcome, plies),
        None => println!("No result after {} plies", plies),
    }
    Ok(())
}

fn run_perft(moves: Vec<&String>, depth: u8) -> anyhow::Result<()> {
    println!("Perft test for moves {:?} with depth {}", moves, depth);
    let mut game = GameState::new();
    for m in moves {
        let candidate = Move::from_algebraic(m, game.board())?;
        match game.get_valid_moves().into_iter().find(|legal| *legal == candidate) {
            Some(mv) => game.make_move(mv),
            None => return Err(ChessError::IllegalMove(m.clone()).into()),
        }
    }

    let mut num_nodes = 0;
    for (m, c) in perft_divide(&mut game, depth) {
        println!("{}: {}", m, c);
        num_nodes += c;
    }
    println!("\nNodes searched: {}", num_nodes);
    Ok(())
}

#[derive(Tabled)]
struct BenchmarkRow {
    depth: u8,
    node_count: u64,
    elapsed_time: f32,
    knodes_per_sec: f32,
}

fn benchmark(max_depth: u8) {
    let mut game = GameState::new();
    let mut table_rows = Vec::new();
    for depth in 1..=max_depth {
        let start_time = Instant::now();
        let node_count = perft(&mut game, depth);
        let elapsed = start_time.elapsed();
        table_rows.push(BenchmarkRow {
            depth,
            node_count,
            elapsed_time: elapsed.as_secs_f32(),
            knodes_per_sec: node_count as f32 / elapsed.as_secs_f32().max(f32::EPSILON) / 1000f32,
        });
        if elapsed.as_secs() > 10 {
            break;
        }
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
}
