use kono_arena::*;

/// Safety valve for the demo loop: two computers can shuffle for a long
/// while before anyone reaches the far side.
const MAX_MOVES: usize = 400;
const ROUNDS: u32 = 3;

fn main() {
    println!("Kono Arena - Computer vs Computer Tournament");
    println!("============================================\n");

    let mut rng = rand::thread_rng();

    let mut dice = DiceSource::TrueRandom;
    let opening = dice.roll_first_mover();
    let mut tournament = Tournament::new(
        TournamentPlayer::new(PlayerKind::Computer, 0),
        TournamentPlayer::new(PlayerKind::Computer, 0),
        new_round_game(opening.first_mover),
        1,
        opening.first_mover,
        dice,
    );

    announce_roll(&opening);
    loop {
        println!("--- Round {} ---", tournament.round());
        println!("{}", tournament.game().board().display());

        let mut moves = 0;
        while !tournament.game().is_winner() && moves < MAX_MOVES {
            let side = tournament.game().next_player();
            let color = tournament.game().player(side).color();
            let Some(mv) = tournament.game().pre_play(None, &mut rng) else {
                break;
            };
            match tournament.game_mut().play(&mv) {
                Ok(()) => println!("{color} plays {mv}"),
                Err(MoveError::Quit) => println!("{color} {mv}"),
                Err(error) => println!("{color} rejected: {error}"),
            }
            moves += 1;
        }

        println!("\nFinal position after {moves} moves:");
        println!("{}", tournament.game().board().display());

        match tournament.game_winner() {
            winner @ (1 | 2) => {
                let winner = winner as usize;
                println!(
                    "Player {} wins the round ({} pts vs {} pts)\n",
                    winner,
                    tournament.game().player(winner).points(),
                    tournament.game().player(3 - winner).points(),
                );
            }
            0 => println!("The round is a tie; nobody scores\n"),
            _ => println!("No winner after {MAX_MOVES} moves; the round is abandoned\n"),
        }

        if tournament.round() >= ROUNDS {
            break;
        }
        let roll = tournament.roll_first_mover();
        announce_roll(&roll);
        tournament.set_new_game(new_round_game(roll.first_mover));
    }

    println!("============================================");
    println!(
        "Cumulative scores: player 1 = {}, player 2 = {}",
        tournament.player(1).score,
        tournament.player(2).score
    );
    match tournament.tournament_winner() {
        0 => println!("The tournament is a tie!"),
        winner => println!("Player {winner} wins the tournament!"),
    }
}

fn new_round_game(first_mover: usize) -> Game {
    let board = Board::new(5).expect("5 is a supported board size");
    Game::new(
        Player::new(PlayerKind::Computer, Color::White),
        Player::new(PlayerKind::Computer, Color::Black),
        first_mover,
        board,
    )
}

fn announce_roll(roll: &FirstMoverRoll) {
    println!(
        "Dice: player 1 rolled {} + {}, player 2 rolled {} + {}; player {} moves first\n",
        roll.rolls[0], roll.rolls[1], roll.rolls[2], roll.rolls[3], roll.first_mover
    );
}
