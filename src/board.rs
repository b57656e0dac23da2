use crate::moves::{Action, Move, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Board sizes supported by the rules.
pub const BOARD_SIZES: [usize; 3] = [5, 7, 9];

/// The two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// A game piece occupying a cell, or the absence of one.
///
/// Capture ability is monotonic: the only mutator sets it, nothing clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    color: Option<Color>,
    can_capture: bool,
}

impl Piece {
    pub fn new(color: Color) -> Piece {
        Piece {
            color: Some(color),
            can_capture: false,
        }
    }

    pub fn empty() -> Piece {
        Piece {
            color: None,
            can_capture: false,
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none()
    }

    pub fn can_capture(&self) -> bool {
        self.can_capture
    }

    /// Grants capture ability. Never revoked for the rest of the game.
    pub fn allow_capture(&mut self) {
        self.can_capture = true;
    }
}

impl Default for Piece {
    fn default() -> Piece {
        Piece::empty()
    }
}

/// A rule violation reported back to whoever submitted the move. These are
/// ordinary outcomes of play; they never abort a match and carry the text
/// shown to the player.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveError {
    #[error("There is no piece at that location.")]
    Empty,
    #[error("You can not move the opponent's piece.")]
    WrongOwner,
    #[error("You cannot move off of the board.")]
    OffBoard,
    #[error("You can not capture your own piece.")]
    Occupied,
    #[error("This piece does not have the ability to capture.")]
    CannotCapture,
    #[error("The player quits the game.")]
    Quit,
    #[error("The computer would like to keep playing.")]
    NoQuit,
}

/// Outcome of asking the board to execute one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Points the acting player gains (or loses) from this move.
    pub points: i32,
    /// The rule violation, if the move was not executed.
    pub error: Option<MoveError>,
}

impl MoveResult {
    fn rejected(error: MoveError) -> MoveResult {
        MoveResult {
            points: 0,
            error: Some(error),
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(Color),
    Tie,
}

/// A construction or data-integrity fault. Unlike [`MoveError`], these are
/// not part of normal play; callers translate them into a failed setup/load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board size {0}, must be 5, 7, or 9")]
    InvalidSize(usize),
    #[error("invalid cell count {0}, must be 25, 49, or 81")]
    BadCellCount(usize),
    #[error("unrecognized cell token {0:?}")]
    BadToken(String),
}

/// One square of the grid. The owner and point value are fixed at
/// construction; only the occupant changes during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
struct Cell {
    owner: Option<Color>,
    occupant: Piece,
    point_value: i32,
}

/// A Kono board: a size×size grid of cells addressed with 1-indexed
/// positions. Rows 1–2 are White's home band (row 1 the back edge), the last
/// two rows are Black's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Lays out a fresh board with each side's pieces on its home cells.
    pub fn new(size: usize) -> Result<Board, BoardError> {
        if !BOARD_SIZES.contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        let mut cells = vec![Cell::default(); size * size];

        for row in 0..size {
            let band = if row <= 1 {
                Some(Color::White)
            } else if row >= size - 2 {
                Some(Color::Black)
            } else {
                None
            };
            let Some(color) = band else { continue };
            let back_edge = row == 0 || row == size - 1;

            for col in 0..size {
                // The inner home row holds pieces only at the two flanks.
                if !back_edge && col != 0 && col != size - 1 {
                    continue;
                }
                let point_value = if !back_edge || col == 1 || col == size - 2 {
                    1
                } else if col == 0 || col == size - 1 {
                    3
                } else {
                    (col.min(size - 1 - col) as i32 + 1) * 2 - 1
                };
                cells[row * size + col] = Cell {
                    owner: Some(color),
                    occupant: Piece::new(color),
                    point_value,
                };
            }
        }
        Ok(Board { size, cells })
    }

    /// Rebuilds a board from a flat row-major occupant dump, as produced by
    /// [`Board::to_tokens`]. Owners and point values come from the fresh
    /// layout; only the occupants are overwritten.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Board, BoardError> {
        let size = match tokens.len() {
            25 => 5,
            49 => 7,
            81 => 9,
            n => return Err(BoardError::BadCellCount(n)),
        };
        let mut board = Board::new(size)?;
        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let occupant = match token {
                "O" => Piece::empty(),
                "W" => Piece::new(Color::White),
                "B" => Piece::new(Color::Black),
                "WW" => {
                    let mut piece = Piece::new(Color::White);
                    piece.allow_capture();
                    piece
                }
                "BB" => {
                    let mut piece = Piece::new(Color::Black);
                    piece.allow_capture();
                    piece
                }
                _ => return Err(BoardError::BadToken(token.to_string())),
            };
            board.cells[i].occupant = occupant;
        }
        Ok(board)
    }

    /// Dumps the occupants row-major as `O`/`W`/`WW`/`B`/`BB` tokens.
    pub fn to_tokens(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|cell| {
                match (cell.occupant.color(), cell.occupant.can_capture()) {
                    (Some(Color::White), false) => "W",
                    (Some(Color::White), true) => "WW",
                    (Some(Color::Black), false) => "B",
                    (Some(Color::Black), true) => "BB",
                    (None, _) => "O",
                }
                .to_string()
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// True iff the position lies on this board.
    pub fn is_valid_location(&self, loc: Position) -> bool {
        loc.row >= 1 && loc.row <= self.size as i32 && loc.col >= 1 && loc.col <= self.size as i32
    }

    pub fn occupant(&self, loc: Position) -> &Piece {
        &self.cell(loc).occupant
    }

    pub fn occupant_color(&self, loc: Position) -> Option<Color> {
        self.cell(loc).occupant.color()
    }

    /// The home color this cell belongs to, if any.
    pub fn owner(&self, loc: Position) -> Option<Color> {
        self.cell(loc).owner
    }

    pub fn value(&self, loc: Position) -> i32 {
        self.cell(loc).point_value
    }

    /// The given color's score on the current board: point values of
    /// opponent home cells it occupies, plus 5 for every opposing piece no
    /// longer on the board.
    pub fn total_points(&self, color: Color) -> i32 {
        let mut points = 0;
        let mut opponents = 0;
        for cell in &self.cells {
            match cell.occupant.color() {
                Some(c) if c == color => {
                    if cell.owner == Some(color.opponent()) {
                        points += cell.point_value;
                    }
                }
                Some(_) => opponents += 1,
                None => {}
            }
        }
        let full_side = self.size as i32 + 2;
        points + 5 * (full_side - opponents)
    }

    /// Scans the board for a finished game.
    ///
    /// `None` means play continues; it is not a tie. A side with no pieces
    /// left loses outright. Otherwise a side has won only when every one of
    /// its pieces sits on an opponent home cell; if both sides manage that
    /// at once the higher point total wins and equal totals tie.
    pub fn winner(&self) -> Option<GameOutcome> {
        if self.count_pieces(Color::White) == 0 {
            return Some(GameOutcome::Winner(Color::Black));
        }
        if self.count_pieces(Color::Black) == 0 {
            return Some(GameOutcome::Winner(Color::White));
        }

        let mut white_done = true;
        let mut black_done = true;
        for cell in &self.cells {
            match cell.occupant.color() {
                Some(Color::White) if cell.owner != Some(Color::Black) => white_done = false,
                Some(Color::Black) if cell.owner != Some(Color::White) => black_done = false,
                _ => {}
            }
        }
        if !white_done && !black_done {
            return None;
        }

        let white_points = self.total_points(Color::White);
        let black_points = self.total_points(Color::Black);
        if white_points > black_points {
            Some(GameOutcome::Winner(Color::White))
        } else if black_points > white_points {
            Some(GameOutcome::Winner(Color::Black))
        } else {
            Some(GameOutcome::Tie)
        }
    }

    /// Validates and executes one move for the acting color.
    ///
    /// A `Quit` action short-circuits with the quit sentinel and a 5-point
    /// penalty, touching nothing. Rule violations are returned in the
    /// result and leave the board untouched. On success the returned points
    /// reflect the cell values involved (only when an endpoint is opponent
    /// home territory) plus a flat 5 for a capture, and a piece arriving on
    /// opponent home territory is granted capture ability before it lands.
    pub fn make_move(&mut self, mv: &Move, acting: Color) -> MoveResult {
        if mv.action == Action::Quit {
            return MoveResult {
                points: -5,
                error: Some(MoveError::Quit),
            };
        }

        let origin = mv.origin.expect("move has no origin");
        let direction = mv.direction.expect("move has no direction");

        let source = self.cell(origin);
        let Some(mover) = source.occupant.color() else {
            return MoveResult::rejected(MoveError::Empty);
        };
        if mover != acting {
            return MoveResult::rejected(MoveError::WrongOwner);
        }

        let destination = origin.step(direction);
        if !self.is_valid_location(destination) {
            return MoveResult::rejected(MoveError::OffBoard);
        }

        let source = self.cell(origin);
        let target = self.cell(destination);
        if target.occupant.color() == Some(acting) {
            return MoveResult::rejected(MoveError::Occupied);
        }
        if !target.occupant.is_empty() && !source.occupant.can_capture() {
            return MoveResult::rejected(MoveError::CannotCapture);
        }

        let opponent_home = Some(acting.opponent());
        let mut points = 0;
        if target.owner == opponent_home || source.owner == opponent_home {
            points += target.point_value - source.point_value;
        }
        if !target.occupant.is_empty() {
            points += 5;
        }
        let reaches_opponent_home = target.owner == opponent_home;

        let mut piece = source.occupant;
        if reaches_opponent_home {
            piece.allow_capture();
        }
        self.cell_mut(origin).occupant = Piece::empty();
        self.cell_mut(destination).occupant = piece;

        MoveResult { points, error: None }
    }

    /// A console rendering of the grid: occupant tokens, with the point
    /// value shown on empty scoring cells.
    pub fn display(&self) -> String {
        let mut out = String::new();
        out.push_str("    ");
        for col in 1..=self.size {
            out.push_str(&format!("{col:<3}"));
        }
        out.push('\n');
        for row in 1..=self.size {
            out.push_str(&format!("{row:<3} "));
            for col in 1..=self.size {
                let cell = self.cell(Position::new(row as i32, col as i32));
                let text: String = match (cell.occupant.color(), cell.occupant.can_capture()) {
                    (Some(Color::White), false) => "W".into(),
                    (Some(Color::White), true) => "WW".into(),
                    (Some(Color::Black), false) => "B".into(),
                    (Some(Color::Black), true) => "BB".into(),
                    (None, _) if cell.point_value > 0 => cell.point_value.to_string(),
                    (None, _) => ".".into(),
                };
                out.push_str(&format!("{text:<3}"));
            }
            out.push('\n');
        }
        out
    }

    fn count_pieces(&self, color: Color) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.occupant.color() == Some(color))
            .count()
    }

    fn cell(&self, loc: Position) -> &Cell {
        assert!(self.is_valid_location(loc), "position {loc} is off the board");
        &self.cells[(loc.row as usize - 1) * self.size + (loc.col as usize - 1)]
    }

    fn cell_mut(&mut self, loc: Position) -> &mut Cell {
        assert!(self.is_valid_location(loc), "position {loc} is off the board");
        &mut self.cells[(loc.row as usize - 1) * self.size + (loc.col as usize - 1)]
    }
}
