use std::time::Duration;

use dioxus::prelude::*;
use quiz_core::model::ConfidenceRating;
use services::{QuizIntent, QuizSession};
use tracing::warn;

use crate::context::AppContext;
use crate::views::results::ResultsPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizVm, map_quiz_frame, map_results, rating_buttons};

/// Lets the card flip back before the next question slides in.
const RATE_DELAY: Duration = Duration::from_millis(300);

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_id = ctx.quiz_id();
    let sessions = ctx.sessions();

    let session = use_signal(|| None::<QuizSession>);
    let flipped = use_signal(|| false);
    let selected = use_signal(|| None::<ConfidenceRating>);
    let busy = use_signal(|| false);
    let error = use_signal(|| None::<ViewError>);

    let sessions_for_resource = sessions.clone();
    let resource = use_resource(move || {
        let sessions = sessions_for_resource.clone();
        let mut session = session;

        async move {
            let started = sessions
                .start(quiz_id)
                .await
                .map_err(|err| ViewError::from_session(&err))?;
            session.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let sessions = sessions.clone();
        use_callback(move |intent: QuizIntent| {
            let mut busy = busy;
            if busy() {
                return;
            }
            busy.set(true);

            let sessions = sessions.clone();
            let mut session = session;
            let mut flipped = flipped;
            let mut selected = selected;
            let mut error = error;
            spawn(async move {
                if let QuizIntent::Rate(rating) = intent {
                    selected.set(Some(rating));
                    tokio::time::sleep(RATE_DELAY).await;
                }

                let taken = session.write().take();
                let Some(mut current) = taken else {
                    error.set(Some(ViewError::Unknown));
                    busy.set(false);
                    return;
                };
                let result = sessions.apply(&mut current, intent).await;

                // Always put the session back so the view stays usable.
                session.set(Some(current));
                match result {
                    Ok(()) => error.set(None),
                    Err(err) => {
                        warn!(error = %err, ?intent, "quiz intent rejected");
                        error.set(Some(ViewError::from_session(&err)));
                    }
                }
                flipped.set(false);
                selected.set(None);
                busy.set(false);
            });
        })
    };

    let on_flip = use_callback(move |()| {
        let mut flipped = flipped;
        let next = !flipped();
        flipped.set(next);
    });

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if busy() || session.read().as_ref().is_none_or(QuizSession::is_complete) {
            return;
        }
        match evt.data.key().to_string().as_str() {
            " " | "Enter" => {
                evt.prevent_default();
                on_flip.call(());
            }
            "ArrowLeft" => dispatch_intent.call(QuizIntent::Previous),
            "ArrowRight" => dispatch_intent.call(QuizIntent::Skip),
            digit if flipped() => {
                if let Some(rating) = digit
                    .parse::<u8>()
                    .ok()
                    .and_then(|value| ConfidenceRating::from_u8(value).ok())
                {
                    dispatch_intent.call(QuizIntent::Rate(rating));
                }
            }
            _ => {}
        }
    });

    let (quiz_vm, results_vm) = {
        let guard = session.read();
        let quiz_vm = guard.as_ref().map(|s| map_quiz_frame(&s.frame()));
        let results_vm = guard
            .as_ref()
            .and_then(QuizSession::results)
            .map(|results| map_results(&results));
        (quiz_vm, results_vm)
    };

    rsx! {
        div { class: "page quiz-page", id: "quiz-root", tabindex: "0", onkeydown: on_key,
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
                ViewState::Ready(()) => rsx! {
                    if let Some(err) = *error.read() {
                        p { class: "quiz-error", "{err.message()}" }
                    }
                    if let Some(results) = results_vm {
                        ResultsPanel {
                            results,
                            on_restart: move |()| dispatch_intent.call(QuizIntent::Restart),
                        }
                    } else if let Some(vm) = quiz_vm {
                        QuizPanel {
                            vm,
                            flipped: flipped(),
                            selected: selected(),
                            busy: busy(),
                            on_flip,
                            on_intent: dispatch_intent,
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn QuizPanel(
    vm: QuizVm,
    flipped: bool,
    selected: Option<ConfidenceRating>,
    busy: bool,
    on_flip: EventHandler<()>,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let progress_style = format!("width: {:.1}%", vm.progress_percent);
    let card_class = if flipped {
        format!("quiz-card {} quiz-card--flipped", vm.slide_class)
    } else {
        format!("quiz-card {}", vm.slide_class)
    };

    rsx! {
        div { class: "quiz-progress",
            div { class: "quiz-progress__bar", style: "{progress_style}" }
        }

        if let Some(card) = vm.card {
            div { class: "quiz-stage",
                div { class: "{card_class}", onclick: move |_| on_flip.call(()),
                    div { class: "quiz-card__face quiz-card__face--front",
                        h2 { class: "quiz-card__title", "{card.title}" }
                        p { class: "quiz-card__prompt", "{card.prompt}" }
                        p { class: "quiz-card__hint", "Click to reveal answer" }
                    }
                    div { class: "quiz-card__face quiz-card__face--back",
                        h2 { class: "quiz-card__title", "Answer" }
                        p { class: "quiz-card__answer", "{card.answer}" }
                        p { class: "quiz-card__explanation", "{card.explanation}" }
                        div { class: "quiz-ratings",
                            for rating in rating_buttons() {
                                button {
                                    key: "{rating.id}",
                                    class: if selected == Some(rating.rating) { "quiz-rating quiz-rating--selected" } else { "quiz-rating" },
                                    id: "{rating.id}",
                                    r#type: "button",
                                    title: "{rating.label}",
                                    disabled: busy,
                                    onclick: move |evt: MouseEvent| {
                                        evt.stop_propagation();
                                        on_intent.call(QuizIntent::Rate(rating.rating));
                                    },
                                    "{rating.value}"
                                }
                            }
                        }
                    }
                }
            }
        }

        div { class: "quiz-nav",
            button {
                class: "btn btn-secondary",
                id: "quiz-previous",
                r#type: "button",
                disabled: busy || !vm.can_go_back,
                onclick: move |_| on_intent.call(QuizIntent::Previous),
                "Previous"
            }
            span { class: "quiz-nav__position", "{vm.position_label}" }
            button {
                class: "btn btn-secondary",
                id: "quiz-skip",
                r#type: "button",
                disabled: busy || !vm.can_skip,
                onclick: move |_| on_intent.call(QuizIntent::Skip),
                "Skip"
            }
        }
    }
}
