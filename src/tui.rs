//! The text front-end: pick a game, then play it from the terminal.

use crossterm::style::Stylize;
use std::io::{self, Write};
use tabletop::board::PieceKind;
use tabletop::shogi::ShogiKind;
use tabletop::sudoku::{generate_puzzle_async, Difficulty, Entry, SudokuSession};
use tabletop::{new_game, Game, GameError, Square, Status, Variant};

/// Runs the main menu loop.
pub fn run() {
    println!("{}", "--- Tabletop: chess, xiangqi, shogi and sudoku ---".bold());

    loop {
        println!();
        println!("Choose a game: chess, xiangqi, shogi, sudoku. Type 'exit' to quit.");
        let Some(choice) = prompt("> ") else {
            break;
        };
        match choice.to_ascii_lowercase().as_str() {
            "chess" => play_board(Variant::Chess),
            "xiangqi" => play_board(Variant::Xiangqi),
            "shogi" => play_board(Variant::Shogi),
            "sudoku" => play_sudoku(),
            "exit" | "quit" => break,
            "" => {}
            other => println!("Unknown game '{}'.", other),
        }
    }
}

/// Reads one trimmed line; `None` on end of input.
fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

fn report(message: impl std::fmt::Display) {
    println!("{}", message.to_string().red());
}

fn print_board_help(variant: Variant) {
    println!("Moves are typed as two squares, e.g. e2e4. Commands:");
    println!("  moves <square>   list legal destinations");
    println!("  undo | history | new | help | exit");
    if variant == Variant::Shogi {
        println!("  drop <piece> <square>   e.g. 'drop p e5'");
        println!("  append + or = to a move to promote or decline, e.g. c7c8+");
    }
}

/// Splits `e2e4` (or `b3b10`) into its two squares plus an optional
/// promotion suffix.
fn parse_move(text: &str, rows: usize, cols: usize) -> Option<(Square, Square, Option<bool>)> {
    let (body, promote) = match text.strip_suffix('+') {
        Some(body) => (body, Some(true)),
        None => match text.strip_suffix('=') {
            Some(body) => (body, Some(false)),
            None => (text, None),
        },
    };
    let split = body.char_indices().skip(1).find(|(_, c)| c.is_ascii_alphabetic())?.0;
    let from = Square::from_coord(&body[..split], rows, cols)?;
    let to = Square::from_coord(&body[split..], rows, cols)?;
    Some((from, to, promote))
}

fn announce(game: &Game) {
    let variant = game.variant();
    match game.status() {
        Status::Checkmate(loser) => {
            let msg = format!("Checkmate! {} wins.", loser.opponent().name(variant));
            println!("{}", msg.green().bold());
        }
        Status::Stalemate(_) => println!("{}", "Stalemate! No legal moves.".yellow()),
        Status::Check(side) => println!("{}", format!("{} is in check.", side.name(variant)).yellow()),
        Status::ToMove(_) => {}
    }
}

fn try_move(game: &mut Game, from: Square, to: Square, promote: Option<bool>) {
    match game.apply_move(from, to, promote) {
        Ok(_) => {}
        Err(GameError::PromotionChoiceRequired) => {
            let answer = prompt("Promote? [y/n] ").unwrap_or_default();
            let promote = answer.to_ascii_lowercase().starts_with('y');
            if let Err(e) = game.apply_move(from, to, Some(promote)) {
                report(e);
            }
        }
        Err(e) => report(e),
    }
}

fn play_board(variant: Variant) {
    let mut game = new_game(variant);
    let (rows, cols) = game.dimensions();
    print_board_help(variant);

    loop {
        println!();
        println!("{}", game.render());
        announce(&game);

        let side = game.side_to_move().name(variant);
        let Some(line) = prompt(&format!("{} to move: ", side)) else {
            return;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["exit"] | ["quit"] => return,
            ["help"] => print_board_help(variant),
            ["undo"] => {
                game.undo();
            }
            ["new"] => game.reset(),
            ["history"] => println!("{}", game.move_list().join(" ")),
            ["moves", square] => match Square::from_coord(square, rows, cols) {
                Some(sq) => match game.select_square(sq) {
                    Ok(moves) if moves.is_empty() => println!("No legal moves from {}.", square),
                    Ok(moves) => {
                        let targets: Vec<String> = moves.iter().map(|c| c.to.to_coord(rows)).collect();
                        println!("{}", targets.join(" "));
                    }
                    Err(e) => report(e),
                },
                None => report(format!("'{}' is not a square on this board", square)),
            },
            ["drop", piece, square] => {
                let kind = piece
                    .chars()
                    .next()
                    .and_then(|c| ShogiKind::from_char(c.to_ascii_uppercase()));
                match (kind, Square::from_coord(square, rows, cols)) {
                    (Some(kind), Some(sq)) => {
                        if let Err(e) = game.drop_piece(kind, sq) {
                            report(e);
                        }
                    }
                    _ => report("Usage: drop <piece letter> <square>"),
                }
            }
            [text] => match parse_move(text, rows, cols) {
                Some((from, to, promote)) => try_move(&mut game, from, to, promote),
                None => report("Invalid input. Type 'help' for commands."),
            },
            _ => report("Invalid input. Type 'help' for commands."),
        }
    }
}

fn play_sudoku() {
    let size = prompt("Board size [9]: ")
        .and_then(|s| if s.is_empty() { Some(9) } else { s.parse().ok() })
        .unwrap_or(9);
    let difficulty: Difficulty = prompt("Difficulty (easy/medium/hard) [medium]: ")
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report(format!("could not start the runtime: {}", e));
            return;
        }
    };
    println!("Generating a {}x{} {} puzzle...", size, size, difficulty);
    let puzzle = match runtime.block_on(generate_puzzle_async(size, difficulty)) {
        Ok(p) => p,
        Err(e) => {
            report(e);
            return;
        }
    };
    let mut session = SudokuSession::new(puzzle);

    println!("Enter '<row> <col> <digit>' (1-based, digit 0 clears).");
    println!("Commands: clear <row> <col> | hint | check | solve | exit");
    loop {
        println!();
        print!("{}", session.grid());
        let secs = session.elapsed().as_secs();
        println!(
            "Moves: {}  Errors: {}  Time: {:02}:{:02}",
            session.moves(),
            session.errors(),
            secs / 60,
            secs % 60
        );

        let Some(line) = prompt("sudoku> ") else {
            return;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let cell = |r: &str, c: &str| -> Option<(usize, usize)> {
            let r: usize = r.parse().ok()?;
            let c: usize = c.parse().ok()?;
            Some((r.checked_sub(1)?, c.checked_sub(1)?))
        };
        match words.as_slice() {
            [] => {}
            ["exit"] | ["quit"] => return,
            ["hint"] => match session.hint() {
                Some((r, c, d)) => println!("Hint: row {} col {} is {}.", r + 1, c + 1, d),
                None => println!("No empty cells left."),
            },
            ["check"] => {
                if session.check() {
                    println!("{}", "Solved! Well done.".green().bold());
                } else {
                    report("Not solved yet, or the grid contains mistakes.");
                }
            }
            ["solve"] => session.reveal_solution(),
            ["clear", r, c] => match cell(*r, *c) {
                Some((r, c)) => {
                    if let Err(e) = session.clear(r, c) {
                        report(e);
                    }
                }
                None => report("Usage: clear <row> <col>"),
            },
            [r, c, d] => match (cell(*r, *c), d.parse::<u8>()) {
                (Some((r, c)), Ok(d)) => match session.enter(r, c, d) {
                    Ok(Entry::Conflict) => report("That digit clashes with its row, column or block."),
                    Ok(_) => {
                        if session.is_filled() && session.check() {
                            println!("{}", "Solved! Well done.".green().bold());
                        }
                    }
                    Err(e) => report(e),
                },
                _ => report("Usage: <row> <col> <digit>"),
            },
            _ => report("Invalid input."),
        }
    }
}
