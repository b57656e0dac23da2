use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-indexed board coordinate. Row 1 is White's back edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// The coordinate one diagonal step away in the given direction.
    /// May land off the board; callers validate against a Board.
    pub fn step(&self, direction: Direction) -> Position {
        let (dr, dc) = direction.offset();
        Position::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four diagonal directions a piece can move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Direction {
    /// The (row, col) unit offset for this direction.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Nw => (-1, -1),
            Direction::Ne => (-1, 1),
            Direction::Se => (1, 1),
            Direction::Sw => (1, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Nw => "NW",
            Direction::Ne => "NE",
            Direction::Se => "SE",
            Direction::Sw => "SW",
        };
        write!(f, "{name}")
    }
}

/// What a submitted move is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Play,
    Quit,
    Save,
    Help,
    /// Sentinel answer from a computer refusing a requested quit.
    NoQuit,
}

/// Why a move was chosen. Weight totally orders reasons; ties among
/// equally-weighted candidate moves are broken by uniform random choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionReason {
    Random,
    Advance,
    Capture,
    Block,
    Escape,
}

impl ActionReason {
    /// The relative urgency of this reason.
    pub fn weight(&self) -> i32 {
        match self {
            ActionReason::Random => 0,
            ActionReason::Advance => 1,
            ActionReason::Capture => 2,
            ActionReason::Block => 3,
            ActionReason::Escape => 4,
        }
    }

    /// Plain-English justification, used in move narration.
    pub fn justification(&self) -> &'static str {
        match self {
            ActionReason::Random => "to continue the game",
            ActionReason::Advance => "to advance towards the opponent's home location",
            ActionReason::Capture => "to capture the opponent",
            ActionReason::Block => "to block the opponent",
            ActionReason::Escape => "to escape capture from the opponent",
        }
    }
}

/// A move on a board: where from, which way, what for.
///
/// `target` is informational only (display and narration); the board never
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub origin: Option<Position>,
    pub direction: Option<Direction>,
    pub action: Action,
    pub reason: Option<ActionReason>,
    pub target: Option<Position>,
}

impl Move {
    /// A play from `origin` in `direction`, without a named target.
    pub fn play(origin: Position, direction: Direction, reason: ActionReason) -> Move {
        Move {
            origin: Some(origin),
            direction: Some(direction),
            action: Action::Play,
            reason: Some(reason),
            target: None,
        }
    }

    /// A play from `origin` in `direction`, aimed at `target`.
    pub fn play_toward(
        origin: Position,
        direction: Direction,
        reason: ActionReason,
        target: Position,
    ) -> Move {
        Move {
            target: Some(target),
            ..Move::play(origin, direction, reason)
        }
    }

    /// A move that only carries an action, e.g. a save request.
    pub fn command(action: Action) -> Move {
        Move {
            origin: None,
            direction: None,
            action,
            reason: None,
            target: None,
        }
    }

    /// A concession.
    pub fn quit() -> Move {
        Move::command(Action::Quit)
    }

    /// The computer's refusal of a requested concession.
    pub fn no_quit() -> Move {
        Move::command(Action::NoQuit)
    }

    /// Replaces the reason tag, keeping everything else.
    pub fn with_reason(mut self, reason: ActionReason) -> Move {
        self.reason = Some(reason);
        self
    }

    /// A move is well-formed only if it has both an origin and a direction.
    pub fn is_valid(&self) -> bool {
        self.origin.is_some() && self.direction.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Play => {
                let (Some(origin), Some(direction)) = (self.origin, self.direction) else {
                    return write!(f, "an ill-formed move");
                };
                write!(f, "a move {direction} from {origin}")?;
                if let Some(reason) = self.reason {
                    write!(f, " to {}", reason.justification())?;
                }
                match self.target {
                    Some(target) => write!(f, " at {target}."),
                    None => write!(f, "."),
                }
            }
            Action::Quit => write!(f, "quits the game."),
            Action::NoQuit => write!(f, "refuses to quit."),
            Action::Save => write!(f, "saves the game."),
            Action::Help => write!(f, "asks for a hint."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_order_reasons_by_urgency() {
        let ordered = [
            ActionReason::Random,
            ActionReason::Advance,
            ActionReason::Capture,
            ActionReason::Block,
            ActionReason::Escape,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].weight() < pair[1].weight());
        }
        assert_eq!(ActionReason::Random.weight(), 0);
        assert_eq!(ActionReason::Escape.weight(), 4);
    }

    #[test]
    fn test_move_validity_requires_origin_and_direction() {
        let mv = Move::play(Position::new(1, 1), Direction::Se, ActionReason::Advance);
        assert!(mv.is_valid());
        assert!(!Move::quit().is_valid());
        assert!(!Move::no_quit().is_valid());
    }

    #[test]
    fn test_step_follows_diagonal_offsets() {
        let start = Position::new(3, 3);
        assert_eq!(start.step(Direction::Nw), Position::new(2, 2));
        assert_eq!(start.step(Direction::Ne), Position::new(2, 4));
        assert_eq!(start.step(Direction::Se), Position::new(4, 4));
        assert_eq!(start.step(Direction::Sw), Position::new(4, 2));
    }

    #[test]
    fn test_narration_for_play_with_target() {
        let mv = Move::play_toward(
            Position::new(1, 1),
            Direction::Se,
            ActionReason::Advance,
            Position::new(5, 1),
        );
        assert_eq!(
            mv.to_string(),
            "a move SE from (1, 1) to advance towards the opponent's home location at (5, 1)."
        );
    }

    #[test]
    fn test_narration_for_play_without_target() {
        let mv = Move::play(Position::new(2, 2), Direction::Nw, ActionReason::Random);
        assert_eq!(
            mv.to_string(),
            "a move NW from (2, 2) to continue the game."
        );
    }

    #[test]
    fn test_narration_for_quit() {
        assert_eq!(Move::quit().to_string(), "quits the game.");
    }
}
