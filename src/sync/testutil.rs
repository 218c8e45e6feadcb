//! In-process snapshot server used by the sync-loop tests: serves a fixed
//! snapshot set on an ephemeral port, with knobs for the commit value and
//! for knocking out individual files.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

struct Inner {
    commit: AtomicI64,
    benchmark_enabled: AtomicBool,
    events_enabled: AtomicBool,
    batch_fetches: AtomicUsize,
    commit_fetches: AtomicUsize,
}

pub(crate) struct TestSnapshotServer {
    addr: SocketAddr,
    inner: Arc<Inner>,
}

impl TestSnapshotServer {
    pub async fn start() -> Self {
        let inner = Arc::new(Inner {
            commit: AtomicI64::new(1),
            benchmark_enabled: AtomicBool::new(true),
            events_enabled: AtomicBool::new(true),
            batch_fetches: AtomicUsize::new(0),
            commit_fetches: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/data/live/:file", get(serve_file))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        Self { addr, inner }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_commit(&self, value: i64) {
        self.inner.commit.store(value, Ordering::SeqCst);
    }

    pub fn disable_benchmark(&self) {
        self.inner.benchmark_enabled.store(false, Ordering::SeqCst);
    }

    pub fn disable_events(&self) {
        self.inner.events_enabled.store(false, Ordering::SeqCst);
    }

    pub fn enable_events(&self) {
        self.inner.events_enabled.store(true, Ordering::SeqCst);
    }

    /// How many full snapshot batches have been requested, counted by hits
    /// on state.json.
    pub fn batch_fetches(&self) -> usize {
        self.inner.batch_fetches.load(Ordering::SeqCst)
    }

    /// How many times the commit endpoint has been probed.
    pub fn commit_fetches(&self) -> usize {
        self.inner.commit_fetches.load(Ordering::SeqCst)
    }
}

async fn serve_file(
    State(inner): State<Arc<Inner>>,
    Path(file): Path<String>,
) -> Result<String, StatusCode> {
    match file.as_str() {
        "commit" => {
            inner.commit_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(inner.commit.load(Ordering::SeqCst).to_string())
        }
        "state.json" => {
            inner.batch_fetches.fetch_add(1, Ordering::SeqCst);
            Ok("[201543.22, 812, 2024, 3, 1]".to_string())
        }
        "strat_one.json" => Ok("[1, 0.2, 850.0, 41.3, 7, 34100.0]".to_string()),
        "strat_two.json" => Ok("[0, 4.12, 0.15, -230.0, 3.48, 9, 29770.0, 1]".to_string()),
        "strat_three.json" => Ok("[1, 0.2, 1210.0, 17890.0, 12, 34500.0]".to_string()),
        "strat_four.json" => Ok("[1, 0.25, 1520.5, 182.4, 14, 35200.0]".to_string()),
        "strat_five.json" => Ok("[-1, 0.1, -80.0, 17890.0, 22, 33050.0]".to_string()),
        "strat_six.json" => Ok("[1, 0.1, 430.0, 2034.5, 5, 34923.22]".to_string()),
        "equity.json" => Ok("[200000.0, 200500.0, 201543.22]".to_string()),
        "equity_strats.json" => Ok(concat!(
            r#"{"s1":[33000,33500,34100],"s2":[30000,29900,29770],"#,
            r#""s3":[33000,34000,34500],"s4":[33000,34600,35200],"#,
            r#""s5":[33500,33200,33050],"s6":[34000,34500,34923.22]}"#
        )
        .to_string()),
        "events.log" => {
            if inner.events_enabled.load(Ordering::SeqCst) {
                Ok("811|2024-02-29|EQUITY|200500\n812|2024-03-01|TRADE|4|ENTRY|182.40\n".to_string())
            } else {
                Err(StatusCode::NOT_FOUND)
            }
        }
        "benchmark.json" => {
            if inner.benchmark_enabled.load(Ordering::SeqCst) {
                Ok("[200000.0, 199800.0, 200900.0]".to_string())
            } else {
                Err(StatusCode::NOT_FOUND)
            }
        }
        _ => Err(StatusCode::NOT_FOUND),
    }
}
