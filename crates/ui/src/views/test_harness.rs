use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::QuizId;
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, QuizEditorService, QuizSessionService};
use storage::repository::{QuestionRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{EditorView, QuizView};

#[derive(Clone)]
struct TestApp {
    quiz_id: QuizId,
    sessions: Arc<QuizSessionService>,
    editor: Arc<QuizEditorService>,
}

impl UiApp for TestApp {
    fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    fn sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.sessions)
    }

    fn editor(&self) -> Arc<QuizEditorService> {
        Arc::clone(&self.editor)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Quiz,
    Editor,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Editor => rsx! { EditorView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub quiz_id: QuizId,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let resource futures resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over an in-memory store seeded with the sample quiz.
pub async fn setup_view_harness(view: ViewKind, storage: Storage) -> ViewHarness {
    let quiz_id = QuizId::new(1);
    let services = AppServices::from_storage(storage.clone(), Clock::fixed(fixed_now()), quiz_id)
        .await
        .expect("build services");
    let app = Arc::new(TestApp {
        quiz_id,
        sessions: services.sessions(),
        editor: services.editor(),
    });
    build_harness(view, storage, app)
}

/// Harness whose question repository is replaced, without seeding.
pub fn setup_view_harness_with_questions(
    view: ViewKind,
    storage: Storage,
    questions: Arc<dyn QuestionRepository>,
) -> ViewHarness {
    let quiz_id = QuizId::new(1);
    let app = Arc::new(TestApp {
        quiz_id,
        sessions: Arc::new(QuizSessionService::new(
            Arc::clone(&questions),
            Arc::clone(&storage.progress),
        )),
        editor: Arc::new(QuizEditorService::new(
            Clock::fixed(fixed_now()),
            Arc::clone(&storage.quizzes),
            questions,
            Arc::clone(&storage.progress),
        )),
    });
    build_harness(view, storage, app)
}

fn build_harness(view: ViewKind, storage: Storage, app: Arc<TestApp>) -> ViewHarness {
    let quiz_id = app.quiz_id;
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness {
        dom,
        storage,
        quiz_id,
    }
}
