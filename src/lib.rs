pub mod board;
pub mod dice;
pub mod game;
pub mod moves;
pub mod player;
pub mod serializer;
pub mod tournament;

pub use board::*;
pub use dice::*;
pub use game::*;
pub use moves::*;
pub use player::*;
pub use tournament::*;
