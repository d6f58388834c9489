//! Training domain: levels, turns, progress, personas, and prompt logic.

mod conviction;
mod level;
mod persona;
pub mod prompt;
mod progress;
mod turn;

pub use conviction::ConvictionResult;
pub use level::Level;
pub use persona::PersonaContext;
pub use progress::Progress;
pub use turn::{NewTurn, TurnPosition, TurnRecord};

#[cfg(test)]
pub(crate) use persona::test_context;
