use std::fmt;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::QuizId;
use services::{AppServices, Clock, QuizEditorService, QuizSessionService};
use storage::fixtures::seed_sample;
use storage::repository::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Parser, Debug)]
#[command(name = "quiz", version, about = "Flashcard quiz with self-rated confidence")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// SQLite database URL or file path
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3", global = true)]
    db_url: String,

    /// Quiz to open or seed
    #[arg(long, env = "QUIZ_ID", default_value_t = 1, global = true)]
    quiz_id: u64,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Launch the desktop quiz (default)
    Quiz,
    /// Load the sample quiz into the database
    Seed,
}

#[derive(Debug)]
enum AppError {
    InvalidDbUrl { raw: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for AppError {}

struct DesktopApp {
    quiz_id: QuizId,
    sessions: Arc<QuizSessionService>,
    editor: Arc<QuizEditorService>,
}

impl DesktopApp {
    fn from_services(services: &AppServices) -> Self {
        Self {
            quiz_id: services.quiz_id(),
            sessions: services.sessions(),
            editor: services.editor(),
        }
    }
}

impl UiApp for DesktopApp {
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

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| AppError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(AppError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.db_url.trim().is_empty() {
        return Err(AppError::InvalidDbUrl { raw: cli.db_url }.into());
    }
    let db_url = normalize_sqlite_url(cli.db_url);
    let quiz_id = QuizId::new(cli.quiz_id);

    // Open + migrate SQLite in the binary glue; core and services stay storage-agnostic.
    prepare_sqlite_file(&db_url)?;

    match cli.command.unwrap_or(Command::Quiz) {
        Command::Quiz => {
            let services = AppServices::new_sqlite(&db_url, Clock::default(), quiz_id).await?;
            info!(%quiz_id, db = %db_url, "launching desktop quiz");

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp::from_services(&services));
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let storage = Storage::sqlite(&db_url).await?;
            if seed_sample(&storage, quiz_id, Clock::default().now()).await? {
                println!("seeded sample quiz {quiz_id} into {db_url}");
            } else {
                println!("quiz {quiz_id} already exists in {db_url}; nothing to do");
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        // Binary boundary: report once.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
