//! Text save/load of a tournament.
//!
//! The layout is a fixed compatibility contract: a round line, one block per
//! player (type heading, score, current-game color), a row-major board dump
//! with each cell as `O`, `W`/`WW` or `B`/`BB`, and a next-player trailer.

use crate::board::{Board, BoardError, Color};
use crate::dice::DiceSource;
use crate::game::Game;
use crate::player::{Player, PlayerKind};
use crate::tournament::{Tournament, TournamentPlayer};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A save file that could not be written or read back.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed save data: {0}")]
    Malformed(String),
    #[error("malformed board data: {0}")]
    Board(#[from] BoardError),
}

fn malformed(what: &str) -> SaveError {
    SaveError::Malformed(what.to_string())
}

/// The heading player 2 is filed under: the human is always player 1, so
/// player 2 is either the computer or a second human.
fn player2_label(kind: PlayerKind) -> &'static str {
    match kind {
        PlayerKind::Human => "Human 2",
        PlayerKind::Computer => "Computer",
    }
}

/// Renders the tournament into the save-file text layout.
pub fn serialize(tournament: &Tournament) -> String {
    let game = tournament.game();
    let board = game.board();
    let p2_label = player2_label(tournament.player(2).kind);
    let p2_color = game.player(2).color();

    let mut out = String::new();
    out.push_str(&format!("Round: {}\n\n", tournament.round()));

    out.push_str(&format!("{p2_label}:\n"));
    out.push_str(&format!("   Score: {}\n", tournament.player(2).score));
    out.push_str(&format!("   Color: {p2_color}\n\n"));

    out.push_str("Human:\n");
    out.push_str(&format!("   Score: {}\n", tournament.player(1).score));
    out.push_str(&format!("   Color: {}\n\n", p2_color.opponent()));

    out.push_str("Board:");
    for (i, token) in board.to_tokens().iter().enumerate() {
        if i % board.size() == 0 {
            out.push_str("\n   ");
        }
        out.push_str(&format!("{token:<3}"));
    }
    out.push_str("\n\n");

    out.push_str("Next Player: ");
    if game.next_player() == 1 {
        out.push_str("Human");
    } else {
        out.push_str(p2_label);
    }
    out.push('\n');
    out
}

/// Parses save-file text back into a tournament.
///
/// The rebuilt tournament rolls dice with [`DiceSource::TrueRandom`]; swap in
/// a recorded source with [`Tournament::set_dice`] to replay. Cumulative
/// scores come from the file; the per-game running points are re-seeded from
/// the board, as at any game start.
pub fn deserialize(text: &str) -> Result<Tournament, SaveError> {
    let mut round: Option<u32> = None;
    let mut p1: Option<(PlayerKind, i32, Color)> = None;
    let mut p2: Option<(PlayerKind, i32, Color)> = None;
    let mut tokens: Option<Vec<String>> = None;
    let mut next_player: Option<usize> = None;

    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = fields.first() else {
            continue;
        };
        match head {
            "Round:" => {
                let value = fields.get(1).ok_or_else(|| malformed("round number"))?;
                round = Some(
                    value
                        .parse()
                        .map_err(|_| malformed("round number"))?,
                );
            }
            "Human:" => p1 = Some(read_player(&mut lines, PlayerKind::Human)?),
            "Computer:" => p2 = Some(read_player(&mut lines, PlayerKind::Computer)?),
            "Human" if fields.get(1) == Some(&"2:") => {
                p2 = Some(read_player(&mut lines, PlayerKind::Human)?);
            }
            "Board:" => tokens = Some(read_board(&mut lines)),
            "Next" if fields.get(1) == Some(&"Player:") => {
                let first = fields.get(2) == Some(&"Human") && fields.len() == 3;
                next_player = Some(if first { 1 } else { 2 });
            }
            _ => {}
        }
    }

    let round = round.ok_or_else(|| malformed("missing round line"))?;
    let (k1, score1, color1) = p1.ok_or_else(|| malformed("missing player 1 block"))?;
    let (k2, score2, color2) = p2.ok_or_else(|| malformed("missing player 2 block"))?;
    let tokens = tokens.ok_or_else(|| malformed("missing board"))?;
    let next_player = next_player.ok_or_else(|| malformed("missing next player"))?;
    if color1 == color2 {
        return Err(malformed("players share a color"));
    }

    let board = Board::from_tokens(&tokens)?;
    let game = Game::new(
        Player::new(k1, color1),
        Player::new(k2, color2),
        next_player,
        board,
    );
    Ok(Tournament::new(
        TournamentPlayer::new(k1, score1),
        TournamentPlayer::new(k2, score2),
        game,
        round,
        next_player,
        DiceSource::TrueRandom,
    ))
}

/// Writes the tournament to a file.
pub fn save_to_file(tournament: &Tournament, path: impl AsRef<Path>) -> Result<(), SaveError> {
    fs::write(path, serialize(tournament))?;
    Ok(())
}

/// Reads a tournament back from a file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Tournament, SaveError> {
    deserialize(&fs::read_to_string(path)?)
}

/// Reads the two lines of a player block: score, then current-game color.
fn read_player<'a, I>(lines: &mut I, kind: PlayerKind) -> Result<(PlayerKind, i32, Color), SaveError>
where
    I: Iterator<Item = &'a str>,
{
    let line = lines.next().ok_or_else(|| malformed("player score"))?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.first() != Some(&"Score:") {
        return Err(malformed("player score"));
    }
    let score: i32 = fields
        .get(1)
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| malformed("player score"))?;

    let line = lines.next().ok_or_else(|| malformed("player color"))?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.first() != Some(&"Color:") {
        return Err(malformed("player color"));
    }
    let color = match fields.get(1) {
        Some(&"White") => Color::White,
        Some(&"Black") => Color::Black,
        _ => return Err(malformed("player color")),
    };
    Ok((kind, score, color))
}

/// Collects board tokens up to the blank line ending the board section.
fn read_board<'a, I>(lines: &mut I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut tokens = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            break;
        }
        tokens.extend(fields.into_iter().map(str::to_string));
    }
    tokens
}
