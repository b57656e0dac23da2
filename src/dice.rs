use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A dice-log file that could not be turned into a recorded source.
#[derive(Debug, Error)]
pub enum DiceLogError {
    #[error("could not read dice log: {0}")]
    Io(#[from] std::io::Error),
    #[error("dice log line {line} does not hold exactly two values")]
    RaggedLine { line: usize },
    #[error("dice log line {line} holds a non-numeric value {value:?}")]
    BadValue { line: usize, value: String },
    #[error("dice log holds no rolls")]
    EmptyLog,
}

/// The four face values of a first-mover roll-off, and who it put first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstMoverRoll {
    /// Player 1's pair followed by player 2's pair.
    pub rolls: [u32; 4],
    pub first_mover: usize,
}

/// Where dice values come from.
///
/// Recorded sources replay a fixed sequence and wrap back to the start after
/// the last value, so a short log can drive an arbitrarily long tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceSource {
    TrueRandom,
    Recorded { rolls: Vec<u32>, cursor: usize },
}

impl DiceSource {
    /// A source replaying the given rolls in order.
    ///
    /// # Panics
    ///
    /// Panics when `rolls` is empty.
    pub fn recorded(rolls: Vec<u32>) -> DiceSource {
        assert!(!rolls.is_empty(), "recorded dice sequence is empty");
        DiceSource::Recorded { rolls, cursor: 0 }
    }

    /// Parses a dice log: whitespace-separated integer pairs, one throw pair
    /// per line, blank lines skipped.
    pub fn from_log(text: &str) -> Result<DiceSource, DiceLogError> {
        let mut rolls = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != 2 {
                return Err(DiceLogError::RaggedLine { line: index + 1 });
            }
            for field in fields {
                let value = field.parse::<u32>().map_err(|_| DiceLogError::BadValue {
                    line: index + 1,
                    value: field.to_string(),
                })?;
                rolls.push(value);
            }
        }
        if rolls.is_empty() {
            return Err(DiceLogError::EmptyLog);
        }
        Ok(DiceSource::recorded(rolls))
    }

    /// Reads and parses a dice-log file.
    pub fn from_log_file(path: impl AsRef<Path>) -> Result<DiceSource, DiceLogError> {
        DiceSource::from_log(&fs::read_to_string(path)?)
    }

    /// Produces one die value: 1–6 for the random source, the next recorded
    /// value otherwise.
    pub fn throw(&mut self) -> u32 {
        match self {
            DiceSource::TrueRandom => rand::thread_rng().gen_range(1..=6),
            DiceSource::Recorded { rolls, cursor } => {
                let roll = rolls[*cursor];
                *cursor = if *cursor + 1 < rolls.len() {
                    *cursor + 1
                } else {
                    0
                };
                roll
            }
        }
    }

    /// The first-mover ritual: two dice per player, both pairs re-rolled
    /// entirely while the sums tie, the higher sum moving first.
    pub fn roll_first_mover(&mut self) -> FirstMoverRoll {
        let mut rolls = [0u32; 4];
        loop {
            for roll in &mut rolls {
                *roll = self.throw();
            }
            if rolls[0] + rolls[1] != rolls[2] + rolls[3] {
                break;
            }
        }
        let first_mover = if rolls[0] + rolls[1] > rolls[2] + rolls[3] {
            1
        } else {
            2
        };
        FirstMoverRoll { rolls, first_mover }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_rolls_replay_in_order() {
        let mut dice = DiceSource::recorded(vec![4, 2, 6]);
        assert_eq!(dice.throw(), 4);
        assert_eq!(dice.throw(), 2);
        assert_eq!(dice.throw(), 6);
    }

    #[test]
    fn test_recorded_rolls_wrap_around() {
        let mut dice = DiceSource::recorded(vec![1, 2, 3]);
        for expected in [1, 2, 3, 1, 2, 3, 1] {
            assert_eq!(dice.throw(), expected);
        }
    }

    #[test]
    fn test_random_rolls_stay_in_die_range() {
        let mut dice = DiceSource::TrueRandom;
        for _ in 0..200 {
            let roll = dice.throw();
            assert!((1..=6).contains(&roll), "rolled {roll}");
        }
    }

    #[test]
    fn test_first_mover_goes_to_the_higher_sum() {
        let mut dice = DiceSource::recorded(vec![2, 3, 6, 4]);
        let roll = dice.roll_first_mover();
        assert_eq!(roll.first_mover, 2);
        assert_eq!(roll.rolls, [2, 3, 6, 4]);
    }

    #[test]
    fn test_tied_sums_reroll_both_pairs() {
        // The first pass ties 6 to 6 and is thrown away entirely.
        let mut dice = DiceSource::recorded(vec![3, 3, 2, 4, 6, 1, 2, 2]);
        let roll = dice.roll_first_mover();
        assert_eq!(roll.rolls, [6, 1, 2, 2]);
        assert_eq!(roll.first_mover, 1);
    }

    #[test]
    fn test_log_parsing_accepts_pairs_and_blank_lines() {
        let dice = DiceSource::from_log("3 4\n\n2 5\n").unwrap();
        assert_eq!(
            dice,
            DiceSource::Recorded {
                rolls: vec![3, 4, 2, 5],
                cursor: 0
            }
        );
    }

    #[test]
    fn test_log_parsing_rejects_ragged_lines() {
        let err = DiceSource::from_log("1 2 3\n").unwrap_err();
        assert!(matches!(err, DiceLogError::RaggedLine { line: 1 }));
    }

    #[test]
    fn test_log_parsing_rejects_bad_values() {
        let err = DiceSource::from_log("3 4\nsix 2\n").unwrap_err();
        assert!(matches!(err, DiceLogError::BadValue { line: 2, .. }));
    }

    #[test]
    fn test_log_parsing_rejects_an_empty_log() {
        assert!(matches!(
            DiceSource::from_log("\n\n"),
            Err(DiceLogError::EmptyLog)
        ));
    }
}
