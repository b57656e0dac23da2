use crate::dice::{DiceSource, FirstMoverRoll};
use crate::game::Game;
use crate::player::PlayerKind;
use serde::{Deserialize, Serialize};

/// One contestant's standing across the rounds of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentPlayer {
    pub kind: PlayerKind,
    pub score: i32,
}

impl TournamentPlayer {
    pub fn new(kind: PlayerKind, score: i32) -> TournamentPlayer {
        TournamentPlayer { kind, score }
    }
}

/// A sequence of games between the same two contestants, with cumulative
/// scoring and dice-based first-mover selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    players: [TournamentPlayer; 2],
    current_game: Game,
    round: u32,
    /// The side that moves first in the current game.
    next_player: usize,
    /// Set once the current game's score difference has been credited, so
    /// repeated winner polls do not credit twice.
    round_settled: bool,
    dice: DiceSource,
}

impl Tournament {
    /// # Panics
    ///
    /// Panics when `next_player` is not 1 or 2.
    pub fn new(
        p1: TournamentPlayer,
        p2: TournamentPlayer,
        game: Game,
        round: u32,
        next_player: usize,
        dice: DiceSource,
    ) -> Tournament {
        assert!(
            (1..=2).contains(&next_player),
            "invalid player number {next_player}"
        );
        Tournament {
            players: [p1, p2],
            current_game: game,
            round,
            next_player,
            round_settled: false,
            dice,
        }
    }

    /// The contestant with the given number (1 or 2).
    ///
    /// # Panics
    ///
    /// Panics when `num` is not 1 or 2.
    pub fn player(&self, num: usize) -> &TournamentPlayer {
        assert!((1..=2).contains(&num), "invalid player number {num}");
        &self.players[num - 1]
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn game(&self) -> &Game {
        &self.current_game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.current_game
    }

    /// The side that moves first in the current game.
    pub fn next_player(&self) -> usize {
        self.next_player
    }

    /// Replaces the dice source, e.g. with a recorded log for replaying a
    /// tournament.
    pub fn set_dice(&mut self, dice: DiceSource) {
        self.dice = dice;
    }

    /// Swaps in the game for the next round and re-arms score crediting.
    pub fn set_new_game(&mut self, game: Game) {
        self.current_game = game;
        self.round += 1;
        self.round_settled = false;
    }

    /// The current game's winner: 1 or 2, 0 for a tie, -1 while undecided.
    ///
    /// The first poll that observes a decided game credits the winner's
    /// cumulative score with the difference between the two players' running
    /// points; later polls report the same winner without crediting again.
    pub fn game_winner(&mut self) -> i32 {
        if !self.current_game.is_winner() {
            return -1;
        }
        let p1_points = self.current_game.player(1).points();
        let p2_points = self.current_game.player(2).points();

        let winner = if p1_points > p2_points {
            1
        } else if p2_points > p1_points {
            2
        } else {
            return 0;
        };
        if !self.round_settled {
            self.players[winner - 1].score += (p1_points - p2_points).abs();
            self.round_settled = true;
        }
        winner as i32
    }

    /// The side leading on cumulative score: 1 or 2, 0 for a tie.
    pub fn tournament_winner(&self) -> usize {
        if self.players[0].score > self.players[1].score {
            1
        } else if self.players[1].score > self.players[0].score {
            2
        } else {
            0
        }
    }

    /// One die value from the tournament's dice source.
    pub fn throw_dice(&mut self) -> u32 {
        self.dice.throw()
    }

    /// Runs the first-mover ritual on the tournament's dice and records who
    /// will open the next game.
    pub fn roll_first_mover(&mut self) -> FirstMoverRoll {
        let roll = self.dice.roll_first_mover();
        self.next_player = roll.first_mover;
        roll
    }
}
