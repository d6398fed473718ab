pub use self::{board::*, dice::*, moves::*, player::*};

pub(crate) mod board;
pub(crate) mod dice;
pub(crate) mod moves;
pub(crate) mod player;
