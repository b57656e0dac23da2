use crate::board::{Board, Color, MoveError};
use crate::moves::{Action, ActionReason, Direction, Move, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The two kinds of contestant. A closed set: there are no other ways to
/// produce moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    Computer,
}

/// A diagonal neighbor of a cell, with the direction that reaches it.
#[derive(Debug, Clone, Copy)]
struct Neighbor {
    loc: Position,
    dir: Direction,
}

/// One side of a game: a color, a running point total for the current game,
/// and a kind deciding where its moves come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    kind: PlayerKind,
    color: Color,
    points: i32,
}

impl Player {
    pub fn new(kind: PlayerKind, color: Color) -> Player {
        Player {
            kind,
            color,
            points: 0,
        }
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// This game's running score.
    pub fn points(&self) -> i32 {
        self.points
    }

    pub(crate) fn set_points(&mut self, points: i32) {
        self.points = points;
    }

    /// Decides the move that will actually be attempted this turn.
    ///
    /// A human plays whatever was requested, untouched. A computer always
    /// runs the move search; if the request was a quit and the search found
    /// a playable move, it answers with the `NoQuit` sentinel instead.
    pub fn pre_play<R: Rng>(
        &self,
        requested: Option<Move>,
        board: &Board,
        rng: &mut R,
    ) -> Option<Move> {
        match self.kind {
            PlayerKind::Human => requested,
            PlayerKind::Computer => {
                let picked = self.find_best_move(board, rng);
                let quit_requested = requested.is_some_and(|mv| mv.action == Action::Quit);
                if quit_requested && picked.action != Action::Quit {
                    Some(Move::no_quit())
                } else {
                    Some(picked)
                }
            }
        }
    }

    /// Attempts the move on the board and folds the resulting points into
    /// this player's running score. A `NoQuit` sentinel is bounced straight
    /// back without touching anything.
    pub fn play(&mut self, mv: &Move, board: &mut Board) -> Result<(), MoveError> {
        if mv.action == Action::NoQuit {
            return Err(MoveError::NoQuit);
        }
        let result = board.make_move(mv, self.color);
        self.points += result.points;
        match result.error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }

    /// Picks a move for this color with the heuristic cascade.
    ///
    /// Each own piece proposes at most one move: escape a threatened capture,
    /// else block an opponent from an empty home cell, else capture an
    /// adjacent opponent, else advance on the nearest reachable opponent home
    /// cell (unless it should stay put to keep blocking). Only the proposals
    /// with the highest reason weight survive; if no piece proposed anything,
    /// a last pass takes any move to an empty neighbor. The final pick among
    /// the survivors is uniformly random, and with nothing at all to play the
    /// computer concedes.
    pub fn find_best_move<R: Rng>(&self, board: &Board, rng: &mut R) -> Move {
        let mut proposals: Vec<Move> = Vec::new();

        for loc in positions(board) {
            if board.occupant_color(loc) != Some(self.color) {
                continue;
            }
            if self.can_be_captured(board, loc) {
                proposals.extend(self.escape_capture(board, loc));
                continue;
            }
            if let Some(mv) = self.block_opponent(board, loc) {
                proposals.push(mv);
                continue;
            }
            if let Some(mv) = self.capture_opponent(board, loc) {
                proposals.push(mv);
                continue;
            }
            if !self.should_stay_blocking(board, loc) {
                proposals.extend(self.advance(board, loc));
            }
        }

        let highest = proposals.iter().map(weight_of).max().unwrap_or(-1);
        proposals.retain(|mv| weight_of(mv) >= highest);

        if proposals.is_empty() {
            for loc in positions(board) {
                if board.occupant_color(loc) == Some(self.color) {
                    proposals.extend(self.move_to_empty_space(board, loc));
                }
            }
        }
        if proposals.is_empty() {
            return Move::quit();
        }
        proposals[rng.gen_range(0..proposals.len())]
    }

    /// True if the piece at `loc` is in danger: some diagonal neighbor is an
    /// opposing piece that can capture. A piece that can itself capture is
    /// never considered at risk.
    fn can_be_captured(&self, board: &Board, loc: Position) -> bool {
        if board.occupant(loc).can_capture() {
            return false;
        }
        neighbors(board, loc).iter().any(|n| {
            board.occupant(n.loc).can_capture() && board.occupant_color(n.loc) != Some(self.color)
        })
    }

    /// A move out of capture danger: the first adjacent empty cell that is
    /// itself safe. With no safe square, fall back to advancing, still
    /// ranked with escape urgency.
    fn escape_capture(&self, board: &Board, start: Position) -> Option<Move> {
        for n in neighbors(board, start) {
            if board.occupant_color(n.loc).is_none() && !self.can_be_captured(board, n.loc) {
                return Some(Move::play_toward(
                    start,
                    n.dir,
                    ActionReason::Escape,
                    n.loc,
                ));
            }
        }
        self.advance(board, start)
            .map(|mv| mv.with_reason(ActionReason::Escape))
    }

    /// True if this piece sits in its own home territory with an opponent
    /// adjacent: moving away would hand over the cell.
    fn should_stay_blocking(&self, board: &Board, start: Position) -> bool {
        if board.owner(start) != Some(self.color) {
            return false;
        }
        neighbors(board, start)
            .iter()
            .any(|n| matches!(board.occupant_color(n.loc), Some(c) if c != self.color))
    }

    /// A move into an adjacent empty home cell of ours that a weaker
    /// (capture-less) opposing piece is lurking next to.
    fn block_opponent(&self, board: &Board, start: Position) -> Option<Move> {
        for n in neighbors(board, start) {
            if board.occupant_color(n.loc).is_some() || board.owner(n.loc) != Some(self.color) {
                continue;
            }
            for enemy in neighbors(board, n.loc) {
                let piece = board.occupant(enemy.loc);
                if matches!(piece.color(), Some(c) if c != self.color) && !piece.can_capture() {
                    return Some(Move::play_toward(
                        start,
                        n.dir,
                        ActionReason::Block,
                        enemy.loc,
                    ));
                }
            }
        }
        None
    }

    /// A capture of an adjacent opposing piece, skipped when taking it would
    /// leave us capturable on that square.
    fn capture_opponent(&self, board: &Board, start: Position) -> Option<Move> {
        if !board.occupant(start).can_capture() {
            return None;
        }
        for n in neighbors(board, start) {
            if matches!(board.occupant_color(n.loc), Some(c) if c != self.color)
                && !self.can_be_captured(board, n.loc)
            {
                return Some(Move::play_toward(
                    start,
                    n.dir,
                    ActionReason::Capture,
                    n.loc,
                ));
            }
        }
        None
    }

    /// A step towards the nearest opponent home cell this piece can reach.
    /// Falls back to any empty neighbor when no home cell is approachable.
    fn advance(&self, board: &Board, start: Position) -> Option<Move> {
        // A piece already sitting on opponent territory stays where it is.
        if let (Some(occupant), Some(owner)) = (board.occupant_color(start), board.owner(start)) {
            if occupant != owner {
                return None;
            }
        }
        for goal in positions(board) {
            if board.owner(goal) == Some(self.color.opponent())
                && board.occupant_color(goal) != Some(self.color)
                && can_reach(start, goal)
            {
                if let Some(dir) = self.step_toward(board, start, goal) {
                    return Some(Move::play_toward(start, dir, ActionReason::Advance, goal));
                }
            }
        }
        self.move_to_empty_space(board, start)
    }

    /// Last resort: a move to any adjacent empty cell.
    fn move_to_empty_space(&self, board: &Board, start: Position) -> Option<Move> {
        neighbors(board, start)
            .into_iter()
            .find(|n| board.occupant(n.loc).is_empty())
            .map(|n| Move::play(start, n.dir, ActionReason::Random))
    }

    /// The single diagonal step that closes the distance from `start` to
    /// `end` without walking into danger or onto a blocked square.
    fn step_toward(&self, board: &Board, start: Position, end: Position) -> Option<Direction> {
        let hor = (start.col - end.col).abs();
        let vert = (start.row - end.row).abs();

        for n in neighbors(board, start) {
            if self.can_be_captured(board, n.loc) {
                continue;
            }
            let n_hor = (n.loc.col - end.col).abs();
            let n_vert = (n.loc.row - end.row).abs();

            // Close whichever axis is longer, never overshooting the other.
            let closer = if hor <= vert {
                n_vert < vert && n_hor <= n_vert
            } else {
                n_hor < hor && n_vert <= n_hor
            };
            if !closer {
                continue;
            }

            let destination = board.occupant(n.loc);
            if destination.is_empty() {
                return Some(n.dir);
            }
            if destination.color() != board.occupant_color(start)
                && board.occupant(start).can_capture()
            {
                return Some(n.dir);
            }
        }
        None
    }
}

/// Every board position, row-major.
fn positions(board: &Board) -> impl Iterator<Item = Position> {
    let size = board.size() as i32;
    (1..=size).flat_map(move |row| (1..=size).map(move |col| Position::new(row, col)))
}

/// Diagonal movement preserves the parity of row+col, so a target is
/// reachable only when both ends share it.
fn can_reach(start: Position, end: Position) -> bool {
    (start.row + start.col) % 2 == (end.row + end.col) % 2
}

/// The on-board diagonal neighbors of `start`, scanned NW, NE, SW, SE.
fn neighbors(board: &Board, start: Position) -> Vec<Neighbor> {
    [Direction::Nw, Direction::Ne, Direction::Sw, Direction::Se]
        .into_iter()
        .filter_map(|dir| {
            let loc = start.step(dir);
            board.is_valid_location(loc).then_some(Neighbor { loc, dir })
        })
        .collect()
}

fn weight_of(mv: &Move) -> i32 {
    mv.reason.map_or(-1, |reason| reason.weight())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Builds a 5x5 board with the given occupants and nothing else.
    fn board_with(occupants: &[((i32, i32), &str)]) -> Board {
        let mut tokens = vec!["O".to_string(); 25];
        for &((row, col), token) in occupants {
            tokens[(row as usize - 1) * 5 + (col as usize - 1)] = token.to_string();
        }
        Board::from_tokens(&tokens).unwrap()
    }

    fn white_computer() -> Player {
        Player::new(PlayerKind::Computer, Color::White)
    }

    #[test]
    fn test_parity_rules_reachability() {
        assert!(can_reach(Position::new(1, 1), Position::new(5, 1)));
        assert!(can_reach(Position::new(2, 3), Position::new(4, 1)));
        assert!(!can_reach(Position::new(1, 1), Position::new(4, 1)));
    }

    #[test]
    fn test_neighbors_stay_on_the_board() {
        let board = Board::new(5).unwrap();
        let corner = neighbors(&board, Position::new(1, 1));
        assert_eq!(corner.len(), 1);
        assert_eq!(corner[0].loc, Position::new(2, 2));

        let center = neighbors(&board, Position::new(3, 3));
        assert_eq!(center.len(), 4);
    }

    #[test]
    fn test_piece_next_to_armed_opponent_is_in_danger() {
        let board = board_with(&[((3, 3), "W"), ((2, 2), "BB")]);
        let player = white_computer();
        assert!(player.can_be_captured(&board, Position::new(3, 3)));

        // An unarmed opponent is no threat.
        let board = board_with(&[((3, 3), "W"), ((2, 2), "B")]);
        assert!(!player.can_be_captured(&board, Position::new(3, 3)));

        // A piece that can itself capture never worries.
        let board = board_with(&[((3, 3), "WW"), ((2, 2), "BB")]);
        assert!(!player.can_be_captured(&board, Position::new(3, 3)));
    }

    #[test]
    fn test_escape_picks_a_safe_empty_cell() {
        let board = board_with(&[((3, 3), "W"), ((2, 2), "BB")]);
        let mv = white_computer().find_best_move(&board, &mut rng());
        assert_eq!(mv.reason, Some(ActionReason::Escape));
        assert_eq!(mv.origin, Some(Position::new(3, 3)));
        assert_eq!(mv.direction, Some(Direction::Ne));
        assert_eq!(mv.target, Some(Position::new(2, 4)));
    }

    #[test]
    fn test_cornered_escape_advances_with_escape_urgency() {
        // Every empty neighbor of (3, 3) is covered by an armed opponent, so
        // the escape falls through to the advance step, whose empty-space
        // fallback inherits the escape tag.
        let board = board_with(&[
            ((3, 3), "W"),
            ((2, 2), "BB"),
            ((1, 3), "BB"),
            ((5, 3), "BB"),
        ]);
        let player = white_computer();
        let mv = player
            .escape_capture(&board, Position::new(3, 3))
            .expect("a cornered piece still proposes something");
        assert_eq!(mv.reason, Some(ActionReason::Escape));
        assert_eq!(mv.origin, Some(Position::new(3, 3)));
        assert_eq!(mv.direction, Some(Direction::Ne));
    }

    #[test]
    fn test_block_moves_into_threatened_home_cell() {
        let board = board_with(&[((2, 2), "W"), ((2, 4), "B")]);
        let mv = white_computer().find_best_move(&board, &mut rng());
        assert_eq!(mv.reason, Some(ActionReason::Block));
        assert_eq!(mv.origin, Some(Position::new(2, 2)));
        assert_eq!(mv.direction, Some(Direction::Ne));
        assert_eq!(mv.target, Some(Position::new(2, 4)));
    }

    #[test]
    fn test_no_block_against_armed_opponent() {
        // An opponent that can already capture cannot be blocked out.
        let board = board_with(&[((2, 2), "W"), ((2, 4), "BB")]);
        let player = white_computer();
        assert_eq!(player.block_opponent(&board, Position::new(2, 2)), None);
    }

    #[test]
    fn test_capture_takes_adjacent_opponent() {
        let board = board_with(&[((3, 3), "WW"), ((2, 2), "B")]);
        let mv = white_computer().find_best_move(&board, &mut rng());
        assert_eq!(mv.reason, Some(ActionReason::Capture));
        assert_eq!(mv.origin, Some(Position::new(3, 3)));
        assert_eq!(mv.direction, Some(Direction::Nw));
        assert_eq!(mv.target, Some(Position::new(2, 2)));
    }

    #[test]
    fn test_capture_skipped_when_square_is_guarded() {
        // Taking (2, 2) would park us next to the armed piece at (1, 1).
        let board = board_with(&[((3, 3), "WW"), ((2, 2), "B"), ((1, 1), "BB")]);
        let player = white_computer();
        assert_eq!(player.capture_opponent(&board, Position::new(3, 3)), None);
    }

    #[test]
    fn test_advance_heads_for_nearest_reachable_home_cell() {
        let board = board_with(&[((1, 1), "W")]);
        let mv = white_computer().find_best_move(&board, &mut rng());
        assert_eq!(mv.reason, Some(ActionReason::Advance));
        assert_eq!(mv.origin, Some(Position::new(1, 1)));
        assert_eq!(mv.direction, Some(Direction::Se));
        // (4, 1) and (4, 5) fail the parity check; (5, 1) is the first
        // reachable Black home cell in scan order.
        assert_eq!(mv.target, Some(Position::new(5, 1)));
    }

    #[test]
    fn test_home_guard_stays_put() {
        let board = board_with(&[((1, 1), "W"), ((2, 2), "B")]);
        let player = white_computer();
        assert!(player.should_stay_blocking(&board, Position::new(1, 1)));
        // Its only neighbor is occupied, so the fallback finds nothing and
        // the computer concedes.
        let mv = player.find_best_move(&board, &mut rng());
        assert_eq!(mv.action, Action::Quit);
    }

    #[test]
    fn test_only_top_tier_proposals_survive() {
        // One piece must escape (weight 4), another could merely advance
        // (weight 1); only the escape survives the ranking.
        let board = board_with(&[((3, 3), "W"), ((2, 2), "BB"), ((4, 4), "W")]);
        let player = white_computer();
        let mv = player.find_best_move(&board, &mut rng());
        assert_eq!(mv.reason, Some(ActionReason::Escape));
        assert_eq!(mv.origin, Some(Position::new(3, 3)));
    }

    #[test]
    fn test_random_fallback_when_no_tier_applies() {
        // A lone White piece on Black's 3-point corner: already on opponent
        // territory, nothing to escape, block, or capture.
        let board = board_with(&[((5, 1), "WW"), ((1, 5), "B")]);
        let mv = white_computer().find_best_move(&board, &mut rng());
        assert_eq!(mv.reason, Some(ActionReason::Random));
        assert_eq!(mv.origin, Some(Position::new(5, 1)));
    }

    #[test]
    fn test_search_is_deterministic_under_a_fixed_seed() {
        let board = Board::new(5).unwrap();
        let player = white_computer();
        let first = player.find_best_move(&board, &mut StdRng::seed_from_u64(42));
        let second = player.find_best_move(&board, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_human_pre_play_passes_the_request_through() {
        let board = Board::new(5).unwrap();
        let human = Player::new(PlayerKind::Human, Color::White);
        let requested = Move::play(Position::new(2, 1), Direction::Se, ActionReason::Random);
        assert_eq!(
            human.pre_play(Some(requested), &board, &mut rng()),
            Some(requested)
        );
        assert_eq!(human.pre_play(None, &board, &mut rng()), None);
    }

    #[test]
    fn test_computer_refuses_quit_while_it_can_move() {
        let board = Board::new(5).unwrap();
        let mv = white_computer()
            .pre_play(Some(Move::quit()), &board, &mut rng())
            .unwrap();
        assert_eq!(mv.action, Action::NoQuit);
    }

    #[test]
    fn test_computer_accepts_quit_with_no_move_left() {
        // The lone piece is pinned in its home corner.
        let board = board_with(&[((1, 1), "W"), ((2, 2), "B")]);
        let mv = white_computer()
            .pre_play(Some(Move::quit()), &board, &mut rng())
            .unwrap();
        assert_eq!(mv.action, Action::Quit);
    }

    #[test]
    fn test_play_folds_points_into_the_running_score() {
        let mut board = board_with(&[((4, 2), "W")]);
        let mut player = white_computer();
        let mv = Move::play(Position::new(4, 2), Direction::Sw, ActionReason::Advance);
        assert_eq!(player.play(&mv, &mut board), Ok(()));
        assert_eq!(player.points(), 3);
    }

    #[test]
    fn test_play_bounces_no_quit_untouched() {
        let mut board = Board::new(5).unwrap();
        let before = board.clone();
        let mut player = white_computer();
        assert_eq!(
            player.play(&Move::no_quit(), &mut board),
            Err(MoveError::NoQuit)
        );
        assert_eq!(board, before);
        assert_eq!(player.points(), 0);
    }

    #[test]
    fn test_play_surfaces_rule_violations() {
        let mut board = Board::new(5).unwrap();
        let mut player = white_computer();
        let mv = Move::play(Position::new(3, 3), Direction::Se, ActionReason::Random);
        assert_eq!(player.play(&mv, &mut board), Err(MoveError::Empty));
        assert_eq!(player.points(), 0);
    }
}
