use dioxus::prelude::*;
use quiz_core::model::Question;
use services::{AnswerFeedback, reveal_explanation};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{AnswerInputVm, QuestionForm, QuestionItemVm, build_response, toggle_choice};

use super::forms::QuestionFormPanel;

#[component]
pub(super) fn QuestionItem(
    item: QuestionItemVm,
    question: Question,
    show_answers: bool,
    on_changed: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let editor = ctx.editor();

    let mut editing = use_signal(|| false);
    let mut selected = use_signal(Vec::<String>::new);
    let mut text = use_signal(String::new);
    let feedback = use_signal(|| None::<AnswerFeedback>);
    let error = use_signal(|| None::<ViewError>);

    let id = item.id;
    let group_name = format!("question-{id}");

    let on_check = {
        let editor = editor.clone();
        let input = item.input.clone();
        use_callback(move |()| {
            let mut feedback = feedback;
            let mut error = error;
            let Some(response) = build_response(&input, &selected.read(), &text.read()) else {
                feedback.set(Some(AnswerFeedback::TryAgain));
                return;
            };
            let editor = editor.clone();
            spawn(async move {
                match editor.check_answer(id, &response).await {
                    Ok(result) => {
                        error.set(None);
                        feedback.set(Some(result));
                    }
                    Err(err) => error.set(Some(ViewError::from_editor(&err))),
                }
            });
        })
    };

    let on_save = {
        let editor = editor.clone();
        use_callback(move |form: QuestionForm| {
            let mut error = error;
            let mut editing = editing;
            let patch = match form.to_patch() {
                Ok(patch) => patch,
                Err(err) => {
                    error.set(Some(err));
                    return;
                }
            };
            let editor = editor.clone();
            spawn(async move {
                match editor.update_question(id, patch).await {
                    Ok(_) => {
                        error.set(None);
                        editing.set(false);
                        on_changed.call(());
                    }
                    Err(err) => error.set(Some(ViewError::from_editor(&err))),
                }
            });
        })
    };

    let on_delete = {
        let editor = editor.clone();
        use_callback(move |()| {
            let mut error = error;
            let editor = editor.clone();
            spawn(async move {
                match editor.delete_question(id).await {
                    Ok(()) => on_changed.call(()),
                    Err(err) => error.set(Some(ViewError::from_editor(&err))),
                }
            });
        })
    };

    let current_feedback = feedback();
    let reveal = reveal_explanation(show_answers, current_feedback);

    if editing() {
        return rsx! {
            li { class: "question-item question-item--editing",
                QuestionFormPanel {
                    heading: "Edit Question",
                    initial: QuestionForm::from_question(&question),
                    allow_kind: false,
                    on_submit: on_save,
                    on_cancel: move |()| editing.set(false),
                }
                if let Some(err) = *error.read() {
                    p { class: "question-item__error", "{err.message()}" }
                }
            }
        };
    }

    rsx! {
        li { class: "question-item",
            div { class: "question-item__header",
                h3 { class: "question-item__prompt", "{item.number}. {item.prompt}" }
                span { class: "question-item__meta", "{item.meta_label}" }
            }

            div { class: "question-item__inputs",
                match item.input.clone() {
                    AnswerInputVm::Choice(options) => rsx! {
                        for option in options {
                            ChoiceInput {
                                key: "{option}",
                                name: group_name.clone(),
                                option: option.clone(),
                                multi: false,
                                checked: selected.read().contains(&option),
                                on_pick: move |value: String| selected.set(vec![value]),
                            }
                        }
                    },
                    AnswerInputVm::Choices(options) => rsx! {
                        for option in options {
                            ChoiceInput {
                                key: "{option}",
                                name: group_name.clone(),
                                option: option.clone(),
                                multi: true,
                                checked: selected.read().contains(&option),
                                on_pick: move |value: String| toggle_choice(&mut selected.write(), &value),
                            }
                        }
                    },
                    AnswerInputVm::Text => rsx! {
                        input {
                            class: "question-item__text",
                            r#type: "text",
                            placeholder: "Type your answer",
                            value: "{text}",
                            oninput: move |evt| text.set(evt.value()),
                        }
                    },
                }
            }

            div { class: "question-item__actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_check.call(()),
                    "Check Answer"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| editing.set(true),
                    "Edit"
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| on_delete.call(()),
                    "Delete"
                }
            }

            if let Some(result) = current_feedback {
                p {
                    class: if result.is_correct() { "question-item__feedback question-item__feedback--correct" } else { "question-item__feedback" },
                    "{result.message()}"
                }
            }
            if let Some(err) = *error.read() {
                p { class: "question-item__error", "{err.message()}" }
            }
            if show_answers {
                p { class: "question-item__answer", "Correct answer: {item.correct_answer}" }
            }
            if reveal && !item.explanation.is_empty() {
                p { class: "question-item__explanation", "{item.explanation}" }
            }
        }
    }
}

#[component]
fn ChoiceInput(
    name: String,
    option: String,
    multi: bool,
    checked: bool,
    on_pick: EventHandler<String>,
) -> Element {
    let value = option.clone();
    rsx! {
        label { class: "question-item__choice",
            input {
                r#type: if multi { "checkbox" } else { "radio" },
                name: "{name}",
                value: "{option}",
                checked,
                onchange: move |_| on_pick.call(value.clone()),
            }
            span { "{option}" }
        }
    }
}
