// Chat module - conversation state and the streaming turn state machine
pub mod error;
pub mod events;
pub mod history;
pub mod turn;

pub use error::TurnError;
pub use events::{ChatEvent, EventBus};
pub use history::ChatHistory;
pub use turn::{TurnController, DEFAULT_MAX_ITERATIONS};
