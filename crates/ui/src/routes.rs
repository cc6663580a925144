use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{EditorView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuizView)] Quiz {},
        #[route("/editor", EditorView)] Editor {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Quiz" }
            ul {
                li { Link { to: Route::Quiz {}, "Flashcards" } }
                li { Link { to: Route::Editor {}, "Questions" } }
            }
        }
    }
}
