pub mod player;
pub mod shot;

pub use player::*;
pub use shot::*;
