use std::fs;
use std::io::{self, BufRead, Write};

use super::TerminalDisplay;
use crate::BoardDisplay;
use crate::feedback::compute_feedback;
use crate::game_logic::{GameState, Phase};
use crate::game_state::{Board, Color, Square};
use crate::persistence;

/// Longest player name accepted at the prompt.
const MAX_NAME_LEN: usize = 10;

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// Runs an interactive two-player game in the terminal.
///
/// Invalid input is reported and the prompt repeats; the engine is only
/// called once per entered move.
pub fn run_interactive_terminal() {
    let mut display = TerminalDisplay::new();
    let stdin = io::stdin();
    let white = prompt_name(&mut stdin.lock(), "Player 1");
    let black = prompt_name(&mut stdin.lock(), "Player 2");
    let mut game = GameState::with_names(white, black);
    let mut selected: Option<Square> = None;

    clear_screen();
    draw_interface(&mut display, &game, selected);

    loop {
        print!("{} > ", game.turn());
        if let Err(e) = io::stdout().flush() {
            eprintln!("Failed to flush stdout: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "m" | "move" => {
                if parts.len() < 3 {
                    println!("Usage: m <from> <to>");
                    continue;
                }
                let (from, to) = match (parts[1].parse::<Square>(), parts[2].parse::<Square>()) {
                    (Ok(from), Ok(to)) => (from, to),
                    (Err(e), _) | (_, Err(e)) => {
                        println!("Invalid square: {}", e);
                        continue;
                    }
                };
                match game.play(game.turn(), from, to) {
                    Ok(record) => {
                        selected = None;
                        clear_screen();
                        draw_interface(&mut display, &game, selected);
                        println!("\n{} played {}", record.mv.color, record.mv);
                    }
                    Err(e) => println!("❌ {}", e),
                }
            }
            "s" | "select" => {
                let Some(square) = parts.get(1) else {
                    println!("Usage: s <square>");
                    continue;
                };
                match square.parse::<Square>() {
                    Ok(square) => match game.select(game.turn(), square) {
                        Ok(selection) => {
                            selected = Some(square);
                            clear_screen();
                            draw_interface(&mut display, &game, selected);
                            println!("\n{} legal destination(s)", selection.destinations.len());
                        }
                        Err(e) => println!("❌ {}", e),
                    },
                    Err(e) => println!("Invalid square: {}", e),
                }
            }
            "save" => {
                let Some(path) = parts.get(1) else {
                    println!("Usage: save <file>");
                    continue;
                };
                let written = persistence::to_json(&game)
                    .map_err(|e| e.to_string())
                    .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
                match written {
                    Ok(()) => println!("💾 Game saved to {}", path),
                    Err(e) => println!("❌ Could not save: {}", e),
                }
            }
            "load" => {
                let Some(path) = parts.get(1) else {
                    println!("Usage: load <file>");
                    continue;
                };
                let loaded = fs::read_to_string(path)
                    .map_err(|e| e.to_string())
                    .and_then(|json| persistence::from_json(&json).map_err(|e| e.to_string()));
                match loaded {
                    Ok(restored) => {
                        game = restored;
                        selected = None;
                        clear_screen();
                        draw_interface(&mut display, &game, selected);
                        println!("\n✅ Game loaded from {}", path);
                    }
                    Err(e) => println!("❌ Could not load: {}", e),
                }
            }
            "setup" => {
                if parts.len() < 2 {
                    println!("Usage: setup <fen>");
                    continue;
                }
                // Rejoin the rest of the parts as FEN might contain spaces
                let fen = parts[1..].join(" ");
                match setup_from_fen(&fen) {
                    Ok(mut restored) => {
                        for color in Color::ALL {
                            restored.set_name(color, game.player(color).name.clone());
                        }
                        game = restored;
                        selected = None;
                        clear_screen();
                        draw_interface(&mut display, &game, selected);
                        println!("\n✅ Position loaded from FEN");
                    }
                    Err(e) => println!("❌ {}", e),
                }
            }
            "fen" => println!("{}", game.board().board_fen()),
            "names" => {
                let [_, white, black] = parts[..] else {
                    println!("Usage: names <white> <black>");
                    continue;
                };
                match (valid_name(white), valid_name(black)) {
                    (Some(white), Some(black)) => {
                        game.set_name(Color::White, white);
                        game.set_name(Color::Black, black);
                        clear_screen();
                        draw_interface(&mut display, &game, selected);
                    }
                    _ => println!("Names must be 1 to {MAX_NAME_LEN} characters"),
                }
            }
            "r" => {
                let white = game.player(Color::White).name.clone();
                let black = game.player(Color::Black).name.clone();
                game = GameState::with_names(white, black);
                selected = None;
                clear_screen();
                draw_interface(&mut display, &game, selected);
                println!("\n🔄 New game");
            }
            "p" => {
                clear_screen();
                draw_interface(&mut display, &game, selected);
            }
            "q" => break,
            _ => println!("Unknown command"),
        }
    }
}

/// Build a game from a FEN string; the side to move defaults to White.
fn setup_from_fen(fen: &str) -> Result<GameState, String> {
    let board = Board::from_board_fen(fen).map_err(|e| e.to_string())?;
    let turn = match fen.split_whitespace().nth(1) {
        Some("b") => Color::Black,
        _ => Color::White,
    };
    GameState::with_board(board, turn).map_err(|e| e.to_string())
}

/// Ask for a player name until a valid one is entered. Empty input keeps `default`.
fn prompt_name(input: &mut impl BufRead, default: &str) -> String {
    loop {
        print!("{default}, please enter a name (up to {MAX_NAME_LEN} characters): ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return default.to_string(),
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() {
            return default.to_string();
        }
        match valid_name(line) {
            Some(name) => return name.to_string(),
            None => println!("Names must be 1 to {MAX_NAME_LEN} characters"),
        }
    }
}

fn valid_name(name: &str) -> Option<&str> {
    let name = name.trim();
    (!name.is_empty() && name.chars().count() <= MAX_NAME_LEN).then_some(name)
}

/// Draws the complete interface: help text, status and board.
fn draw_interface(display: &mut TerminalDisplay, game: &GameState, selected: Option<Square>) {
    println!("♟️  Command Line Chess");
    println!();
    println!(
        "Commands: m <from> <to> | s <square> | save <file> | load <file> | setup <fen> | fen | names <white> <black> | r (new game) | p (refresh) | q (quit)"
    );
    println!();

    let feedback = compute_feedback(&game.view(selected));
    if let Err(e) = display.show(&game.snapshot(), &feedback) {
        eprintln!("Failed to draw board: {}", e);
    }

    println!();
    let turn = game.turn();
    let player = game.player(turn);
    match game.phase() {
        Phase::Checkmate { winner } => {
            println!("Checkmate. {} ({}) is the winner.", game.player(winner).name, winner)
        }
        Phase::Stalemate => println!("Stalemate. {} ({}) has no legal move.", player.name, turn),
        Phase::InProgress if player.in_check() => {
            println!("Check. {} ({}) it's your move.", player.name, turn)
        }
        Phase::InProgress => println!("{} ({}), it's your move.", player.name, turn),
    }
}
