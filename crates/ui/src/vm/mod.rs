mod editor_vm;
mod quiz_vm;
mod results_vm;
mod time_fmt;

pub use editor_vm::{
    AnswerInputVm, QuestionForm, QuestionItemVm, SettingsForm, answer_lines, build_response,
    difficulty_from_str, kind_from_str, kind_label, map_question_items, parse_answer_lines,
    toggle_choice,
};
pub use quiz_vm::{QuizCardVm, QuizVm, RatingButtonVm, map_quiz_frame, rating_buttons, slide_class};
pub use results_vm::{CONGRATULATIONS, GAUGE_CIRCUMFERENCE, ResultRowVm, ResultsVm, map_results};
pub use time_fmt::format_datetime;
