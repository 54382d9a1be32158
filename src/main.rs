use chrono::Utc;
use color_eyre::Result;
use std::sync::Arc;

use velocollab::adapters::mock::{Endpoint, MockReply};
use velocollab::adapters::{FileKeyValueStore, MockDashboardApi};
use velocollab::config::StoreConfig;
use velocollab::logging::init_logging;
use velocollab::models::{User, UserStats, WorkoutCreate, WorkoutResponse};
use velocollab::queries::{use_create_workout, use_user_data, SharedApi};
use velocollab::state::{AppStore, NotificationKind, Profile};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Count `-v` / `-vv` / `--verbose` occurrences.
fn verbosity_from_args() -> u8 {
    std::env::args()
        .skip(1)
        .map(|arg| match arg.as_str() {
            "--verbose" => 1,
            s if s.starts_with('-') && !s.starts_with("--") && s[1..].chars().all(|c| c == 'v') => {
                u8::try_from(s.len() - 1).unwrap_or(u8::MAX)
            }
            _ => 0,
        })
        .fold(0u8, u8::saturating_add)
}

fn demo_api() -> MockDashboardApi {
    let now = Utc::now();
    let api = MockDashboardApi::new();

    api.set_default(
        Endpoint::CurrentUser,
        MockReply::ok(&User {
            id: "demo-user".to_string(),
            name: "Demo Rider".to_string(),
            email: "demo@velocollab.local".to_string(),
            avatar_url: None,
            created_at: now,
            total_workouts: 12,
            current_streak: 3,
        }),
    );
    api.set_default(
        Endpoint::UserStats,
        MockReply::ok(&UserStats {
            total_workouts: 12,
            current_streak: 3,
            longest_streak: 7,
            total_duration_hours: 9.5,
            favorite_exercises: Vec::new(),
            recent_prs: Vec::new(),
        }),
    );
    api.set_default(
        Endpoint::CreateWorkout,
        MockReply::ok(&WorkoutResponse {
            id: "workout-1".to_string(),
            user_id: "demo-user".to_string(),
            name: "Morning ride".to_string(),
            notes: None,
            started_at: now,
            completed_at: None,
            duration_seconds: None,
            exercises: Vec::new(),
            is_template: false,
            status: "planned".to_string(),
        }),
    );

    api
}

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("velocollab-state {}", VERSION);
        return Ok(());
    }

    color_eyre::install()?;
    init_logging(verbosity_from_args());

    let config = StoreConfig::from_env();
    let persistence = FileKeyValueStore::new(&config)?;
    tracing::info!("Persisting state under {}", persistence.dir().display());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let store = AppStore::new(Arc::new(persistence), config);
        let api: SharedApi = Arc::new(demo_api());

        if !store.is_authenticated() {
            store.login(Profile::new("demo-user", "Demo Rider", "demo@velocollab.local"));
        }
        store.toggle_theme();

        let user_data = use_user_data(api.clone(), store.clone());
        user_data.refetch().await;
        if let Some(user) = user_data.user() {
            store.add_notification(
                NotificationKind::Info,
                "Welcome back",
                format!("{} has a {} day streak", user.name, user.current_streak),
            );
        }

        let create = use_create_workout(api, store.clone());
        create.invoke(WorkoutCreate::new("Morning ride")).await;

        println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        Ok::<(), color_eyre::Report>(())
    })
}
