mod results;
mod service;
mod session;
mod view;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use results::{CELEBRATE_THRESHOLD, QuizResults, ResultRow};
pub use service::{QuizSessionService, SLOT_KEY_PREFIX, slot_key_for};
pub use session::QuizSession;
pub use view::{QuizFrame, QuizIntent};
