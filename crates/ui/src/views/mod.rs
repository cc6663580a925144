mod editor;
mod quiz;
mod results;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use editor::EditorView;
pub use quiz::QuizView;
pub use results::ResultsPanel;
pub use state::{ViewError, ViewState, view_state_from_resource};
