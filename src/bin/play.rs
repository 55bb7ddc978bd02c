//! Terminal front end: one game session on the local board.
//!
//! The lobby (player count and primary name) comes from the environment; the
//! remaining player names are asked for on stdin. Wins are saved through the
//! durable history in the background while the prompt stays responsive.

use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task::JoinSet;
use tracing::{error, warn};

use ladders::board::DetailLevel;
use ladders::constants::GOAL_CELL;
use ladders::dice::RandomDie;
use ladders::env_config;
use ladders::history::{DurableHistory, HistorySource, LocalHistory, RemoteHistory, Saved};
use ladders::session::{lobby_names, Session};
use ladders::types::{HistoryRecord, Movement};
use ladders::{Error, Result};

const HELP: &str = "\
commands:
  roll                 roll the die for the current player
  path                 shortest path to 100 for the current player
  clear                clear the highlighted path
  mode icons|simple|full
  overlay              show/hide snakes and ladders
  hover <cell>         inspect the snake/ladder starting at <cell>
  leave                stop inspecting
  board                redraw the board
  svg <file>           write the board as SVG
  history              show recent wins
  quit";

type SaveResult = (String, Result<Saved>);

#[tokio::main]
async fn main() {
    env_config::init_tracing();
    let _base = env_config::init_base_path();

    let graph = match env_config::board() {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "cannot load board");
            std::process::exit(1);
        }
    };
    let history = DurableHistory::new(
        env_config::history_url().map(|url| RemoteHistory::new(&url)),
        LocalHistory::new(env_config::local_history_path()),
    );

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let count = env_config::player_count();
    let mut extra = Vec::new();
    for i in 2..=count {
        println!("Enter Player {i} Name:");
        extra.push(read_line(&mut input).await.unwrap_or_default());
    }
    let names = lobby_names(count, &env_config::player_name(), extra);

    let mut session = match Session::new(&names, graph, RandomDie::from_entropy()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "cannot start session");
            std::process::exit(1);
        }
    };

    let mut saves: JoinSet<SaveResult> = JoinSet::new();
    print_board(&session);
    println!("{}", session.turn_label());
    println!("type 'help' for commands");

    while let Some(line) = read_line(&mut input).await {
        while let Some(done) = saves.try_join_next() {
            report_save(done);
        }
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        match command {
            "roll" | "r" => {
                let outcome = match session.roll() {
                    Ok(o) => o,
                    Err(e) => {
                        error!(error = %e, "roll failed");
                        continue;
                    }
                };
                let Some(roll) = outcome.roll else {
                    println!("The game is over. {}", session.turn_label());
                    continue;
                };
                println!("{roll}");
                match roll.movement {
                    Movement::Ladder | Movement::Snake => {
                        println!("  {} -> {} -> {}", roll.from, roll.tentative, roll.landed_cell)
                    }
                    Movement::Overshoot => println!("  needs exactly {} to finish", GOAL_CELL - roll.from),
                    Movement::Plain => println!("  {} -> {}", roll.from, roll.landed_cell),
                }
                print_scoreboard(&session);
                if let Some(win) = roll.win {
                    println!("{} wins the game!", win.name);
                    let history = history.clone();
                    saves.spawn(async move {
                        let saved = history.save(&win.to_history_record()).await;
                        (win.name, saved)
                    });
                } else {
                    println!("{}", session.turn_label());
                }
            }
            "path" | "p" => match session.shortest_path() {
                Ok(path) => {
                    print_board(&session);
                    println!(
                        "{} shortest path: {}",
                        session.state().current_player().name,
                        path
                    );
                }
                Err(Error::PathNotFound { from }) => {
                    println!("No path to 100 found from {from}.");
                }
                Err(e) => println!("{e}"),
            },
            "clear" => {
                session.clear_path();
                print_board(&session);
            }
            "mode" => match words.next().map(str::parse::<DetailLevel>) {
                Some(Ok(level)) => {
                    session.set_detail(level);
                    println!("overlay detail: {level}");
                }
                Some(Err(msg)) => println!("{msg}"),
                None => println!("overlay detail: {}", session.options().detail),
            },
            "overlay" => {
                let shown = session.toggle_overlay();
                println!(
                    "{} snakes/ladders",
                    if shown { "showing" } else { "hiding" }
                );
                print_board(&session);
            }
            "hover" => {
                let cell = words.next().and_then(|w| w.parse::<u8>().ok());
                match cell.and_then(|c| session.hover(c)) {
                    Some(tip) => {
                        print_board(&session);
                        println!("{tip}");
                    }
                    None => println!("no visible snake or ladder starts there"),
                }
            }
            "leave" => {
                session.leave();
                print_board(&session);
            }
            "board" | "b" => {
                session.redraw();
                print_board(&session);
                print_scoreboard(&session);
            }
            "svg" => match words.next() {
                Some(file) => write_svg(&session, Path::new(file)),
                None => println!("usage: svg <file>"),
            },
            "history" | "h" => {
                let (source, records) = history.load().await;
                print_history(source, &records);
            }
            "help" | "?" => println!("{HELP}"),
            "quit" | "q" | "exit" => break,
            other => println!("unknown command '{other}' (try 'help')"),
        }
    }

    while let Some(done) = saves.join_next().await {
        report_save(done);
    }
}

async fn read_line(input: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match input.next_line().await {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %e, "stdin closed");
            None
        }
    }
}

fn report_save(done: std::result::Result<SaveResult, tokio::task::JoinError>) {
    match done {
        Ok((name, Ok(Saved::Remote { .. }))) => println!("{name} saved to history."),
        Ok((name, Ok(Saved::Local))) => println!("Saved locally: {name}"),
        Ok((name, Err(e))) => warn!(player = %name, error = %e, "win not saved"),
        Err(e) => warn!(error = %e, "history task failed"),
    }
}

fn print_board<D: ladders::dice::DieRoller>(session: &Session<D>) {
    print!("{}", session.view().to_text());
}

fn print_scoreboard<D: ladders::dice::DieRoller>(session: &Session<D>) {
    println!("{:<16} {:>8} {:>6}", "Player", "Position", "Moves");
    for row in session.scoreboard() {
        let marker = if row.to_move { ">" } else { " " };
        println!(
            "{marker}{:<15} {:>8} {:>6}",
            row.name, row.position, row.moves
        );
    }
}

fn write_svg<D: ladders::dice::DieRoller>(session: &Session<D>, path: &Path) {
    match std::fs::write(path, session.view().to_svg()) {
        Ok(()) => println!("board written to {}", path.display()),
        Err(e) => println!("cannot write {}: {e}", path.display()),
    }
}

fn print_history(source: HistorySource, records: &[HistoryRecord]) {
    if records.is_empty() {
        println!("No history found.");
        return;
    }
    if source == HistorySource::Local {
        println!("(local history)");
    }
    println!("{:<16} {:>6} {:<8} Date", "Player", "Score", "Result");
    for r in records.iter().take(20) {
        println!(
            "{:<16} {:>6} {:<8} {}",
            r.username,
            r.score,
            r.result,
            r.played_on.format("%Y-%m-%d %H:%M")
        );
    }
}
