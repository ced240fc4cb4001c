pub mod cubie;
pub mod lattice;

pub use cubie::Cubie;
pub use lattice::{Face, Move, MoveRejected, RubiksCube, ROTATION_STEP};
