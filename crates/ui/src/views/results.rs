use dioxus::prelude::*;

use crate::vm::{ResultRowVm, ResultsVm};

#[component]
pub fn ResultsPanel(results: ResultsVm, on_restart: EventHandler<()>) -> Element {
    rsx! {
        div { class: "results",
            h1 { class: "results__title", "Quiz Results" }

            div { class: "results__gauge",
                svg { view_box: "0 0 100 100",
                    circle {
                        cx: "50",
                        cy: "50",
                        r: "45",
                        fill: "none",
                        stroke: "#e0e0e0",
                        stroke_width: "10",
                    }
                    circle {
                        class: "results__gauge-fill",
                        cx: "50",
                        cy: "50",
                        r: "45",
                        fill: "none",
                        stroke: "#3b82f6",
                        stroke_width: "10",
                        stroke_linecap: "round",
                        stroke_dasharray: "{results.gauge_dasharray}",
                        stroke_dashoffset: "{results.gauge_dashoffset}",
                        transform: "rotate(-90 50 50)",
                    }
                }
                span { class: "results__score", "{results.score_label}" }
            }
            p { class: "results__weighted", "{results.weighted_label}" }

            if let Some(banner) = results.banner {
                h2 { class: "results__banner", "{banner}" }
            }

            div { class: "results__rows",
                for row in results.rows.iter().cloned() {
                    ResultRowCard { row }
                }
            }

            div { class: "results__actions",
                button {
                    class: "btn btn-primary",
                    id: "results-restart",
                    r#type: "button",
                    onclick: move |_| on_restart.call(()),
                    "Take Quiz Again"
                }
            }
        }
    }
}

#[component]
fn ResultRowCard(row: ResultRowVm) -> Element {
    rsx! {
        div { class: "results__row",
            h2 { "{row.heading}" }
            p { class: "results__prompt", "{row.prompt}" }
            div { class: "results__row-meta",
                div {
                    p { class: "results__label", "Your confidence:" }
                    p { class: "results__confidence", "{row.confidence}" }
                }
                div {
                    p { class: "results__label", "Correct answer:" }
                    p { class: "results__answer", "{row.correct_answer}" }
                }
            }
        }
    }
}
