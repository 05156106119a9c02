// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::fs::OpenOptions;
use std::io;
use std::process;
use std::time::Instant;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use parlor::console::ConsoleSession;
use parlor::eval::PieceSquareEvaluator;
use parlor::search::{CsvDataRecorder, DataRecorder, NullDataRecorder, Searcher, DEFAULT_DEPTH};
use parlor::{perft, Game, GameConfig, Position};

fn main() {
    env_logger::init();
    let fen_arg = || {
        Arg::with_name("FEN")
            .help("FEN string for a board position")
            .required(true)
            .index(1)
    };

    let depth_arg = || {
        Arg::with_name("depth")
            .help("Depth of move tree to search")
            .value_name("DEPTH")
            .short("d")
            .long("depth")
            .takes_value(true)
    };

    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::VersionlessSubcommands)
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(depth_arg().required(true)),
        )
        .subcommand(
            SubCommand::with_name("evaluate")
                .about("Pick the engine's move for a board position")
                .arg(fen_arg())
                .arg(depth_arg())
                .arg(
                    Arg::with_name("record")
                        .help("Append search statistics to this CSV file")
                        .value_name("FILE")
                        .long("record")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a game over stdin/stdout, one JSON reply per line")
                .arg(
                    Arg::with_name("config")
                        .help("JSON table configuration")
                        .value_name("FILE")
                        .short("c")
                        .long("config")
                        .takes_value(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("evaluate", Some(matches)) => run_evaluate(matches),
        ("play", Some(matches)) => run_play(matches),
        _ => run_play(&ArgMatches::default()),
    }
}

fn parse_position(matches: &ArgMatches) -> Position {
    let fen = matches.value_of("FEN").unwrap_or_default();
    match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            eprintln!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let pos = parse_position(matches);
    let depth = value_t_or_exit!(matches, "depth", u32);

    println!("fen:   {}", pos.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    for i in 1..=depth {
        let start = Instant::now();
        let results = perft(&pos, i);
        let duration = start.elapsed();
        let ms = duration.as_secs() * 1000 + u64::from(duration.subsec_millis());
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

fn run_evaluate(matches: &ArgMatches) -> ! {
    let pos = parse_position(matches);
    let depth = if matches.is_present("depth") {
        value_t_or_exit!(matches, "depth", u32)
    } else {
        DEFAULT_DEPTH
    };

    println!("fen:   {}", pos.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);

    let recorder: Box<dyn DataRecorder> = match matches.value_of("record") {
        Some(path) => match OpenOptions::new().append(true).create(true).open(path) {
            Ok(file) => match file.metadata() {
                Ok(ref meta) if meta.len() > 0 => Box::new(CsvDataRecorder::continuing(file)),
                _ => Box::new(CsvDataRecorder::new(file)),
            },
            Err(err) => {
                eprintln!("cannot create {}: {}", path, err);
                process::exit(1);
            }
        },
        None => Box::new(NullDataRecorder),
    };

    let mut searcher: Searcher<PieceSquareEvaluator> = Searcher::with_depth(depth);
    match searcher.search_recorded(&pos, recorder.as_ref()) {
        Some(result) => {
            println!("best move: {}", result.best_move);
            println!("    score: {}", result.score);
            println!("    nodes: {}", result.nodes_searched);
        }
        None => println!("no legal moves"),
    }

    process::exit(0);
}

fn run_play(matches: &ArgMatches) -> ! {
    let config = match matches.value_of("config") {
        Some(path) => match GameConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let game = match Game::from_config(&config) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    info!("starting game: {:?}", config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = ConsoleSession::new(config, game);
    if let Err(err) = session.run(stdin.lock(), stdout.lock()) {
        error!("session ended: {}", err);
        process::exit(1);
    }

    process::exit(0);
}
