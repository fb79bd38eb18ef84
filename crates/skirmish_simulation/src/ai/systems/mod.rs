//! AI systems (lifecycle + agent tick)

pub mod lifecycle;
pub mod tick;

// Re-export all systems
pub use lifecycle::*;
pub use tick::*;
