use dioxus::prelude::*;
use quiz_core::model::{Difficulty, QuestionType};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{QuestionForm, SettingsForm, difficulty_from_str, kind_from_str, kind_label};

//
// ─── QUESTION FORM ─────────────────────────────────────────────────────────────
//

#[component]
pub(super) fn QuestionFormPanel(
    heading: &'static str,
    initial: QuestionForm,
    allow_kind: bool,
    on_submit: EventHandler<QuestionForm>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut form = use_signal(|| initial.clone());
    let current = form.read().clone();

    rsx! {
        form {
            class: "question-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                on_submit.call(form.read().clone());
            },
            h3 { "{heading}" }
            TextField {
                label: "Question",
                value: current.prompt.clone(),
                on_input: move |value| form.write().prompt = value,
            }
            TextAreaField {
                label: "Explanation",
                value: current.explanation.clone(),
                on_input: move |value| form.write().explanation = value,
            }
            if allow_kind {
                label { class: "field",
                    span { "Type" }
                    select {
                        value: "{current.kind.as_str()}",
                        onchange: move |evt| form.write().kind = kind_from_str(&evt.value()),
                        for kind in QuestionType::ALL {
                            option { value: "{kind.as_str()}", "{kind_label(kind)}" }
                        }
                    }
                }
            }
            DifficultyField {
                value: current.difficulty,
                on_change: move |value| form.write().difficulty = value,
            }
            TextField {
                label: "Points",
                value: current.points.clone(),
                on_input: move |value| form.write().points = value,
            }
            TextField {
                label: "Time limit (seconds)",
                value: current.time_limit.clone(),
                on_input: move |value| form.write().time_limit = value,
            }
            TextAreaField {
                label: "Answers (one per line, * marks correct)",
                value: current.answers.clone(),
                on_input: move |value| form.write().answers = value,
            }
            div { class: "question-form__actions",
                button { class: "btn btn-primary", r#type: "submit", "Save" }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}

//
// ─── SETTINGS SHEET ────────────────────────────────────────────────────────────
//

#[component]
pub(super) fn SettingsSheet(
    form: SettingsForm,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_id = ctx.quiz_id();
    let editor = ctx.editor();

    let mut draft = use_signal(|| form.clone());
    let error = use_signal(|| None::<ViewError>);
    let current = draft.read().clone();

    let on_save = use_callback(move |()| {
        let mut error = error;
        let patch = draft.read().to_patch();
        let editor = editor.clone();
        spawn(async move {
            match editor.update_settings(quiz_id, patch).await {
                Ok(_) => {
                    error.set(None);
                    on_saved.call(());
                }
                Err(err) => error.set(Some(ViewError::from_editor(&err))),
            }
        });
    });

    rsx! {
        aside { class: "settings-sheet", role: "dialog", aria_labelledby: "settings-sheet-title",
            header { class: "settings-sheet__header",
                h3 { id: "settings-sheet-title", "Quiz Settings" }
                span { class: "settings-sheet__updated", "{current.updated_label}" }
            }

            section { class: "settings-sheet__section",
                h4 { "General" }
                TextField {
                    label: "Title",
                    value: current.title.clone(),
                    on_input: move |value| draft.write().title = value,
                }
                TextAreaField {
                    label: "Description",
                    value: current.description.clone(),
                    on_input: move |value| draft.write().description = value,
                }
                TextField {
                    label: "Language",
                    value: current.language.clone(),
                    on_input: move |value| draft.write().language = value,
                }
                TextField {
                    label: "Topic",
                    value: current.topic.clone(),
                    on_input: move |value| draft.write().topic = value,
                }
                TextField {
                    label: "Subtopics (comma separated)",
                    value: current.subtopics.clone(),
                    on_input: move |value| draft.write().subtopics = value,
                }
                DifficultyField {
                    value: current.difficulty,
                    on_change: move |value| draft.write().difficulty = value,
                }
                label { class: "field",
                    span { "Question type" }
                    select {
                        value: "{current.kind.as_str()}",
                        onchange: move |evt| draft.write().kind = kind_from_str(&evt.value()),
                        for kind in QuestionType::ALL {
                            option { value: "{kind.as_str()}", "{kind_label(kind)}" }
                        }
                    }
                }
            }

            section { class: "settings-sheet__section",
                h4 { "Behavior Settings" }
                ToggleField {
                    label: "Hide correct answers",
                    checked: current.hide_correct_answers,
                    on_toggle: move |value| draft.write().hide_correct_answers = value,
                }
                ToggleField {
                    label: "Flash cards",
                    checked: current.has_flash_cards,
                    on_toggle: move |value| draft.write().has_flash_cards = value,
                }
                ToggleField {
                    label: "Preview",
                    checked: current.has_preview,
                    on_toggle: move |value| draft.write().has_preview = value,
                }
                ToggleField {
                    label: "Multiple attempts",
                    checked: current.has_multiple_attempts,
                    on_toggle: move |value| draft.write().has_multiple_attempts = value,
                }
                ToggleField {
                    label: "Hide description",
                    checked: current.hide_description,
                    on_toggle: move |value| draft.write().hide_description = value,
                }
                ToggleField {
                    label: "Hide final report",
                    checked: current.hide_final_report,
                    on_toggle: move |value| draft.write().hide_final_report = value,
                }
                ToggleField {
                    label: "Public",
                    checked: current.is_public,
                    on_toggle: move |value| draft.write().is_public = value,
                }
                TextField {
                    label: "Quiz time limit (minutes)",
                    value: current.quiz_time_limit.clone(),
                    on_input: move |value| draft.write().quiz_time_limit = value,
                }
                TextField {
                    label: "Question time limit (seconds)",
                    value: current.question_time_limit.clone(),
                    on_input: move |value| draft.write().question_time_limit = value,
                }
            }

            if let Some(err) = *error.read() {
                p { class: "settings-sheet__error", "{err.message()}" }
            }

            footer { class: "settings-sheet__footer",
                button {
                    class: "btn btn-primary",
                    id: "settings-save",
                    r#type: "button",
                    onclick: move |_| on_save.call(()),
                    "Save Settings"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_close.call(()),
                    "Close"
                }
            }
        }
    }
}

//
// ─── FIELDS ────────────────────────────────────────────────────────────────────
//

#[component]
fn TextField(label: &'static str, value: String, on_input: EventHandler<String>) -> Element {
    rsx! {
        label { class: "field",
            span { "{label}" }
            input {
                r#type: "text",
                value: "{value}",
                oninput: move |evt| on_input.call(evt.value()),
            }
        }
    }
}

#[component]
fn TextAreaField(label: &'static str, value: String, on_input: EventHandler<String>) -> Element {
    rsx! {
        label { class: "field",
            span { "{label}" }
            textarea {
                rows: "4",
                value: "{value}",
                oninput: move |evt| on_input.call(evt.value()),
            }
        }
    }
}

#[component]
fn ToggleField(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        label { class: "field field--toggle",
            input {
                r#type: "checkbox",
                checked,
                onchange: move |evt| on_toggle.call(evt.checked()),
            }
            span { "{label}" }
        }
    }
}

#[component]
fn DifficultyField(value: Difficulty, on_change: EventHandler<Difficulty>) -> Element {
    rsx! {
        label { class: "field",
            span { "Difficulty" }
            select {
                value: "{value.as_str()}",
                onchange: move |evt| on_change.call(difficulty_from_str(&evt.value())),
                for difficulty in Difficulty::ALL {
                    option { value: "{difficulty.as_str()}", "{difficulty.title()}" }
                }
            }
        }
    }
}
