//! Terminal monitor: polls the daemon the same way the dashboard does and
//! prints portfolio risk numbers whenever a new snapshot lands. Handy for
//! checking the sync protocol without a browser.

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dietcoke_daemon::chart::{compute_geometry, Canvas, Margins};
use dietcoke_daemon::metrics::{max_drawdown, sharpe_ratio};
use dietcoke_daemon::sync::SyncSession;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monitor=info,dietcoke_daemon=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        std::env::var("DASHBOARD_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let poll_secs = std::env::var("POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30);

    info!("Polling {} every {}s", base_url, poll_secs);

    let mut session = SyncSession::new(base_url);
    let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs));
    loop {
        ticker.tick().await;
        match session.poll_once().await {
            Ok(true) => {
                if let Some(data) = session.data() {
                    let canvas = Canvas {
                        width: 800.0,
                        height: 200.0,
                        margins: Margins {
                            top: 20.0,
                            right: 20.0,
                            bottom: 30.0,
                            left: 70.0,
                        },
                    };
                    let geometry = compute_geometry(
                        &data.equity,
                        &[],
                        &data.benchmark,
                        canvas,
                    );
                    info!(
                        "commit {} | {} day {} | capital {:.2} | sharpe {:.2} | max dd {:.2}% | chart range {:.0}..{:.0}",
                        data.commit,
                        data.state.date_string(),
                        data.state.seq as i64,
                        data.state.capital,
                        sharpe_ratio(&data.equity),
                        max_drawdown(&data.equity),
                        geometry.min,
                        geometry.max,
                    );
                }
            }
            Ok(false) => {}
            Err(e) => warn!("poll failed: {}", e),
        }
    }
}
