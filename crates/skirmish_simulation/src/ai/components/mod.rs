//! AI components

pub mod patrol;
pub mod perception;
pub mod vision;


pub use patrol::*;
pub use perception::*;
pub use vision::*;
