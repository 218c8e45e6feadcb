use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dietcoke_daemon::scheduler::{
    default_stages, load_stages, Scheduler, SchedulerConfig, SimulationCommand,
};
use dietcoke_daemon::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dietcoke_daemon=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting trading daemon...");

    let project_root = std::env::var("PROJECT_ROOT")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())?;

    // Refresh pipeline: built-in script list, or a YAML override
    let stages = match std::env::var("PIPELINE_CONFIG") {
        Ok(path) => load_stages(&PathBuf::from(path))?,
        Err(_) => default_stages(),
    };
    info!("Refresh pipeline: {} stages", stages.len());

    let sim_bin = std::env::var("SIM_BIN").unwrap_or_else(|_| "uiua".to_string());
    let mut simulation = SimulationCommand::new(sim_bin, &["run", "live.ua"]);
    if let Some(secs) = std::env::var("SIM_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        simulation = simulation.with_timeout(Duration::from_secs(secs));
    }

    let cycle_minutes = std::env::var("CYCLE_INTERVAL_MINS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30);

    let scheduler = Arc::new(Scheduler::new(SchedulerConfig {
        project_root: project_root.clone(),
        stages,
        simulation,
        cycle_interval: Duration::from_secs(cycle_minutes * 60),
    }));

    // Run one cycle immediately, then every interval
    tokio::spawn(scheduler.start());

    let app = server::build_app(project_root);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let addr = format!("0.0.0.0:{}", port);
    info!(
        "Dashboard: http://localhost:{}{}index.html",
        port,
        server::DASHBOARD_PATH
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
