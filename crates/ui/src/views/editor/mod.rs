mod forms;
mod item;

use dioxus::prelude::*;
use quiz_core::model::Question;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuestionForm, QuestionItemVm, SettingsForm, map_question_items};

use forms::{QuestionFormPanel, SettingsSheet};
use item::QuestionItem;

#[derive(Clone, Debug, PartialEq, Eq)]
struct EditorData {
    title: String,
    description: String,
    settings: SettingsForm,
    questions: Vec<Question>,
    items: Vec<QuestionItemVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Panel {
    None,
    Settings,
    AddQuestion,
}

#[component]
pub fn EditorView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_id = ctx.quiz_id();
    let editor = ctx.editor();

    let mut show_answers = use_signal(|| false);
    let mut panel = use_signal(|| Panel::None);
    let error = use_signal(|| None::<ViewError>);

    let editor_for_resource = editor.clone();
    let resource = use_resource(move || {
        let editor = editor_for_resource.clone();
        async move {
            let quiz = editor
                .load_quiz(quiz_id)
                .await
                .map_err(|err| ViewError::from_editor(&err))?;
            let questions = editor
                .list_questions(quiz_id)
                .await
                .map_err(|err| ViewError::from_editor(&err))?;
            let hide_description = quiz.behavior().hide_description;
            Ok::<_, ViewError>(EditorData {
                title: quiz.title().to_owned(),
                description: if hide_description {
                    String::new()
                } else {
                    quiz.description().to_owned()
                },
                settings: SettingsForm::from_quiz(&quiz),
                items: map_question_items(&questions),
                questions,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let on_changed = use_callback(move |()| {
        let mut resource = resource;
        let mut panel = panel;
        panel.set(Panel::None);
        resource.restart();
    });

    let on_add = {
        let editor = editor.clone();
        use_callback(move |form: QuestionForm| {
            let mut error = error;
            let draft = match form.to_draft(quiz_id) {
                Ok(draft) => draft,
                Err(err) => {
                    error.set(Some(err));
                    return;
                }
            };
            let editor = editor.clone();
            spawn(async move {
                match editor.add_question(draft).await {
                    Ok(_) => {
                        error.set(None);
                        on_changed.call(());
                    }
                    Err(err) => error.set(Some(ViewError::from_editor(&err))),
                }
            });
        })
    };

    let toggle_label = if show_answers() { "Hide Answers" } else { "Show Answers" };

    rsx! {
        div { class: "page editor-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(data) => rsx! {
                    header { class: "editor-header",
                        div {
                            h2 { class: "editor-header__title", "{data.title}" }
                            if !data.description.is_empty() {
                                p { class: "editor-header__description", "{data.description}" }
                            }
                        }
                        div { class: "editor-header__actions",
                            button {
                                class: "btn btn-secondary",
                                id: "editor-toggle-answers",
                                r#type: "button",
                                onclick: move |_| {
                                    let next = !show_answers();
                                    show_answers.set(next);
                                },
                                "{toggle_label}"
                            }
                            button {
                                class: "btn btn-secondary",
                                id: "editor-open-settings",
                                r#type: "button",
                                onclick: move |_| panel.set(Panel::Settings),
                                "Quiz Settings"
                            }
                            button {
                                class: "btn btn-primary",
                                id: "editor-add-question",
                                r#type: "button",
                                onclick: move |_| panel.set(Panel::AddQuestion),
                                "Add Question"
                            }
                        }
                    }

                    if let Some(err) = *error.read() {
                        p { class: "editor-error", "{err.message()}" }
                    }

                    match panel() {
                        Panel::Settings => rsx! {
                            SettingsSheet {
                                form: data.settings.clone(),
                                on_close: move |()| panel.set(Panel::None),
                                on_saved: on_changed,
                            }
                        },
                        Panel::AddQuestion => rsx! {
                            QuestionFormPanel {
                                heading: "New Question",
                                initial: QuestionForm::default(),
                                allow_kind: true,
                                on_submit: on_add,
                                on_cancel: move |()| panel.set(Panel::None),
                            }
                        },
                        Panel::None => rsx! {},
                    }

                    if data.items.is_empty() {
                        p { class: "editor-empty", "No questions yet. Add one to get started." }
                    }
                    ul { class: "question-list",
                        for (item, question) in data.items.iter().cloned().zip(data.questions.iter().cloned()) {
                            QuestionItem {
                                key: "{item.id}",
                                item,
                                question,
                                show_answers: show_answers(),
                                on_changed,
                            }
                        }
                    }
                },
            }
        }
    }
}
