mod error;
pub mod messages;
pub mod registry;
pub mod room;

pub use error::RoomError;
pub use registry::{RoomRegistry, RoomSummary};
pub use room::{GuessOutcome, Role};
