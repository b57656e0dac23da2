use crate::board::{Board, Color, GameOutcome, MoveError};
use crate::moves::Move;
use crate::player::Player;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One match between two players on one board.
///
/// The game owns the board and the players for its lifetime. A turn is one
/// `pre_play` + `play` pair for the side to move; nothing in between is
/// observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    players: [Player; 2],
    board: Board,
    /// Index of the side to move next (0 or 1).
    current: usize,
    /// Set when a side quits; overrides the board scan from then on.
    quit_winner: Option<Color>,
}

impl Game {
    /// Starts a game. Both players' running scores are seeded from the
    /// board's current point distribution.
    ///
    /// # Panics
    ///
    /// Panics when `first_mover` is not 1 or 2.
    pub fn new(p1: Player, p2: Player, first_mover: usize, board: Board) -> Game {
        assert!(
            (1..=2).contains(&first_mover),
            "invalid player number {first_mover}"
        );
        let mut players = [p1, p2];
        for player in &mut players {
            let points = board.total_points(player.color());
            player.set_points(points);
        }
        Game {
            players,
            board,
            current: first_mover - 1,
            quit_winner: None,
        }
    }

    /// The player with the given number (1 or 2).
    ///
    /// # Panics
    ///
    /// Panics when `num` is not 1 or 2.
    pub fn player(&self, num: usize) -> &Player {
        assert!((1..=2).contains(&num), "invalid player number {num}");
        &self.players[num - 1]
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The number (1 or 2) of the side to move next.
    pub fn next_player(&self) -> usize {
        self.current + 1
    }

    /// True once the game is decided, whether by a quit or by the board.
    pub fn is_winner(&self) -> bool {
        self.quit_winner.is_some() || self.board.winner().is_some()
    }

    /// The decided outcome, if any. A quit fixes the winner permanently;
    /// otherwise the board is consulted.
    pub fn winner(&self) -> Option<GameOutcome> {
        match self.quit_winner {
            Some(color) => Some(GameOutcome::Winner(color)),
            None => self.board.winner(),
        }
    }

    /// Asks the side to move what it will actually play, given an externally
    /// requested move (if any).
    pub fn pre_play<R: Rng>(&self, requested: Option<Move>, rng: &mut R) -> Option<Move> {
        self.players[self.current].pre_play(requested, &self.board, rng)
    }

    /// Plays one move for the side to move. The turn passes on success and
    /// on a quit; a quit also fixes the other side as the winner. Any other
    /// rule violation leaves the turn where it is, so the same side retries.
    pub fn play(&mut self, mv: &Move) -> Result<(), MoveError> {
        let result = self.players[self.current].play(mv, &mut self.board);
        if matches!(result, Ok(()) | Err(MoveError::Quit)) {
            self.current ^= 1;
            if matches!(result, Err(MoveError::Quit)) {
                self.quit_winner = Some(self.players[self.current].color());
            }
        }
        result
    }
}
