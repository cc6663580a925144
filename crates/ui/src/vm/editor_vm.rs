use quiz_core::model::{
    AnswerKey, AnswerRow, Difficulty, Question, QuestionDraft, QuestionId, QuestionPatch,
    QuestionType, Quiz, QuizId, QuizPatch, Response,
};

use crate::views::ViewError;
use crate::vm::time_fmt::format_datetime;

//
// ─── QUESTION LIST ─────────────────────────────────────────────────────────────
//

/// How the learner answers a question in the editor preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerInputVm {
    Choice(Vec<String>),
    Choices(Vec<String>),
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionItemVm {
    pub id: QuestionId,
    pub number: usize,
    pub prompt: String,
    pub explanation: String,
    pub correct_answer: String,
    pub meta_label: String,
    pub input: AnswerInputVm,
}

#[must_use]
pub fn kind_label(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Mcq => "Multiple choice",
        QuestionType::Mmcq => "Multiple answers",
        QuestionType::OpenEnded => "Open ended",
        QuestionType::ShortAnswer => "Short answer",
        QuestionType::TrueFalse => "True / False",
    }
}

#[must_use]
pub fn map_question_items(questions: &[Question]) -> Vec<QuestionItemVm> {
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let input = match question.key() {
                AnswerKey::SingleAnswer { options, .. } => AnswerInputVm::Choice(options.clone()),
                AnswerKey::MultiAnswer { options, .. } => AnswerInputVm::Choices(options.clone()),
                AnswerKey::FreeText { .. } => AnswerInputVm::Text,
            };
            let time = question
                .time_limit_secs()
                .map_or_else(String::new, |secs| format!(" · {secs}s"));
            QuestionItemVm {
                id: question.id(),
                number: i + 1,
                prompt: question.prompt().to_owned(),
                explanation: question.explanation().to_owned(),
                correct_answer: question.key().display(),
                meta_label: format!(
                    "{} · {} · {} pts{time}",
                    kind_label(question.kind()),
                    question.difficulty().title(),
                    question.points()
                ),
                input,
            }
        })
        .collect()
}

/// Turn the preview inputs into a response; `None` when nothing was entered.
#[must_use]
pub fn build_response(input: &AnswerInputVm, selected: &[String], text: &str) -> Option<Response> {
    match input {
        AnswerInputVm::Choice(_) => selected.first().cloned().map(Response::Choice),
        AnswerInputVm::Choices(_) => (!selected.is_empty()).then(|| Response::Choices(selected.to_vec())),
        AnswerInputVm::Text => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| Response::Text(trimmed.to_owned()))
        }
    }
}

/// Toggle `option` in a multi-answer selection, keeping insertion order.
pub fn toggle_choice(selected: &mut Vec<String>, option: &str) {
    if let Some(pos) = selected.iter().position(|s| s == option) {
        selected.remove(pos);
    } else {
        selected.push(option.to_owned());
    }
}

//
// ─── QUESTION FORM ─────────────────────────────────────────────────────────────
//

/// Answers are entered one per line; a leading `*` marks a correct one.
///
/// For short answer and open ended questions the first line is the expected
/// answer.
///
/// # Errors
///
/// Returns `ViewError::Invalid` if the lines do not form a valid key.
pub fn parse_answer_lines(kind: QuestionType, text: &str) -> Result<AnswerKey, ViewError> {
    let rows: Vec<AnswerRow> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix('*') {
            Some(rest) => AnswerRow::new(rest.trim(), true),
            None => AnswerRow::new(line, false),
        })
        .collect();

    let rows = match kind {
        QuestionType::ShortAnswer | QuestionType::OpenEnded => rows
            .into_iter()
            .take(1)
            .map(|row| AnswerRow::new(row.text, true))
            .collect(),
        _ => rows,
    };
    AnswerKey::from_rows(kind, rows).map_err(|_| ViewError::Invalid)
}

#[must_use]
pub fn answer_lines(key: &AnswerKey) -> String {
    match key {
        AnswerKey::FreeText { expected } => expected.clone(),
        _ => key
            .to_rows()
            .into_iter()
            .map(|row| {
                if row.is_correct {
                    format!("*{}", row.text)
                } else {
                    row.text
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionForm {
    pub prompt: String,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub kind: QuestionType,
    pub points: String,
    pub time_limit: String,
    pub answers: String,
}

impl Default for QuestionForm {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            explanation: String::new(),
            difficulty: Difficulty::Easy,
            kind: QuestionType::Mcq,
            points: "10".into(),
            time_limit: String::new(),
            answers: String::new(),
        }
    }
}

impl QuestionForm {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            prompt: question.prompt().to_owned(),
            explanation: question.explanation().to_owned(),
            difficulty: question.difficulty(),
            kind: question.kind(),
            points: question.points().to_string(),
            time_limit: question
                .time_limit_secs()
                .map_or_else(String::new, |secs| secs.to_string()),
            answers: answer_lines(question.key()),
        }
    }

    fn parse_points(&self) -> Result<u32, ViewError> {
        self.points.trim().parse().map_err(|_| ViewError::Invalid)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Invalid` for unparsable points or answers.
    pub fn to_patch(&self) -> Result<QuestionPatch, ViewError> {
        Ok(QuestionPatch {
            prompt: Some(self.prompt.clone()),
            explanation: Some(self.explanation.clone()),
            difficulty: Some(self.difficulty),
            time_limit_secs: Some(QuizPatch::limit_from_text(&self.time_limit)),
            points: Some(self.parse_points()?),
            key: Some(parse_answer_lines(self.kind, &self.answers)?),
        })
    }

    /// # Errors
    ///
    /// Returns `ViewError::Invalid` for unparsable points or answers.
    pub fn to_draft(&self, quiz_id: QuizId) -> Result<QuestionDraft, ViewError> {
        Ok(QuestionDraft {
            quiz_id,
            prompt: self.prompt.clone(),
            explanation: self.explanation.clone(),
            difficulty: self.difficulty,
            kind: self.kind,
            time_limit_secs: QuizPatch::limit_from_text(&self.time_limit),
            points: self.parse_points()?,
            key: parse_answer_lines(self.kind, &self.answers)?,
        })
    }
}

//
// ─── SETTINGS FORM ─────────────────────────────────────────────────────────────
//

#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsForm {
    pub title: String,
    pub description: String,
    pub language: String,
    pub topic: String,
    pub subtopics: String,
    pub difficulty: Difficulty,
    pub kind: QuestionType,
    pub hide_correct_answers: bool,
    pub has_flash_cards: bool,
    pub has_preview: bool,
    pub has_multiple_attempts: bool,
    pub hide_description: bool,
    pub hide_final_report: bool,
    pub quiz_time_limit: String,
    pub question_time_limit: String,
    pub is_public: bool,
    pub updated_label: String,
}

impl SettingsForm {
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        let behavior = quiz.behavior();
        Self {
            title: quiz.title().to_owned(),
            description: quiz.description().to_owned(),
            language: quiz.language().to_owned(),
            topic: quiz.topic().to_owned(),
            subtopics: quiz.subtopics_text(),
            difficulty: quiz.difficulty(),
            kind: quiz.kind(),
            hide_correct_answers: behavior.hide_correct_answers,
            has_flash_cards: behavior.has_flash_cards,
            has_preview: behavior.has_preview,
            has_multiple_attempts: behavior.has_multiple_attempts,
            hide_description: behavior.hide_description,
            hide_final_report: behavior.hide_final_report,
            quiz_time_limit: limit_text(behavior.quiz_time_limit_mins),
            question_time_limit: limit_text(behavior.question_time_limit_secs),
            is_public: quiz.is_public(),
            updated_label: format!("Last updated {}", format_datetime(quiz.updated_at())),
        }
    }

    #[must_use]
    pub fn to_patch(&self) -> QuizPatch {
        QuizPatch {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            language: Some(self.language.clone()),
            kind: Some(self.kind),
            difficulty: Some(self.difficulty),
            topic: Some(self.topic.clone()),
            subtopics: Some(QuizPatch::subtopics_from_text(&self.subtopics)),
            hide_correct_answers: Some(self.hide_correct_answers),
            has_flash_cards: Some(self.has_flash_cards),
            has_preview: Some(self.has_preview),
            has_multiple_attempts: Some(self.has_multiple_attempts),
            hide_description: Some(self.hide_description),
            hide_final_report: Some(self.hide_final_report),
            quiz_time_limit_mins: Some(QuizPatch::limit_from_text(&self.quiz_time_limit)),
            question_time_limit_secs: Some(QuizPatch::limit_from_text(&self.question_time_limit)),
            is_public: Some(self.is_public),
        }
    }
}

fn limit_text(limit: Option<u32>) -> String {
    limit.map_or_else(String::new, |value| value.to_string())
}

#[must_use]
pub fn difficulty_from_str(raw: &str) -> Difficulty {
    raw.parse().unwrap_or(Difficulty::Easy)
}

#[must_use]
pub fn kind_from_str(raw: &str) -> QuestionType {
    raw.parse().unwrap_or(QuestionType::Mcq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn question(kind: QuestionType, key: AnswerKey) -> Question {
        QuestionDraft {
            quiz_id: QuizId::new(1),
            prompt: "Pick".into(),
            explanation: "Because.".into(),
            difficulty: Difficulty::Medium,
            kind,
            time_limit_secs: Some(30),
            points: 5,
            key,
        }
        .validate(fixed_now())
        .unwrap()
        .assign_id(QuestionId::new(7))
    }

    #[test]
    fn answer_lines_mark_correct_options() {
        let key = parse_answer_lines(QuestionType::Mmcq, "*Red\nGreen\n\n*Blue\n").unwrap();
        assert_eq!(key.correct_answers(), vec!["Red", "Blue"]);
        assert_eq!(answer_lines(&key), "*Red\nGreen\n*Blue");
    }

    #[test]
    fn free_text_uses_first_line() {
        let key = parse_answer_lines(QuestionType::ShortAnswer, "Au\nignored").unwrap();
        assert_eq!(key.display(), "Au");
        assert!(parse_answer_lines(QuestionType::ShortAnswer, "  ").is_err());
    }

    #[test]
    fn single_choice_requires_one_correct() {
        assert_eq!(
            parse_answer_lines(QuestionType::Mcq, "*A\n*B"),
            Err(ViewError::Invalid)
        );
        assert!(parse_answer_lines(QuestionType::TrueFalse, "*True\nFalse").is_ok());
    }

    #[test]
    fn items_expose_inputs_and_meta() {
        let items = map_question_items(&[question(
            QuestionType::Mcq,
            AnswerKey::single(vec!["A".into(), "B".into()], 1).unwrap(),
        )]);
        assert_eq!(items[0].number, 1);
        assert_eq!(items[0].correct_answer, "B");
        assert_eq!(items[0].meta_label, "Multiple choice · Medium · 5 pts · 30s");
        assert_eq!(
            items[0].input,
            AnswerInputVm::Choice(vec!["A".into(), "B".into()])
        );
    }

    #[test]
    fn responses_follow_input_shape() {
        let choice = AnswerInputVm::Choice(vec!["A".into()]);
        assert_eq!(
            build_response(&choice, &["A".into()], ""),
            Some(Response::Choice("A".into()))
        );
        assert_eq!(build_response(&choice, &[], ""), None);
        assert_eq!(
            build_response(&AnswerInputVm::Text, &[], "  Au "),
            Some(Response::Text("Au".into()))
        );

        let mut selected = vec!["A".to_string()];
        toggle_choice(&mut selected, "B");
        toggle_choice(&mut selected, "A");
        assert_eq!(selected, vec!["B".to_string()]);
    }

    #[test]
    fn question_form_round_trips_through_patch() {
        let original = question(
            QuestionType::Mmcq,
            AnswerKey::multi(vec!["A".into(), "B".into(), "C".into()], [0, 2]).unwrap(),
        );
        let mut form = QuestionForm::from_question(&original);
        assert_eq!(form.answers, "*A\nB\n*C");
        form.points = "12".into();
        form.time_limit = String::new();

        let patch = form.to_patch().unwrap();
        assert_eq!(patch.points, Some(12));
        assert_eq!(patch.time_limit_secs, Some(None));

        form.points = "many".into();
        assert_eq!(form.to_patch(), Err(ViewError::Invalid));
    }
}
