//! Trading-simulation daemon and dashboard sync core.
//!
//! The daemon side (`scheduler`, `server`) keeps an external simulation
//! fed with fresh market data and publishes its snapshot files over HTTP.
//! The client side (`sync`, `metrics`, `chart`) is what a dashboard uses
//! to poll that state cheaply and turn raw equity series into risk numbers
//! and chart geometry.

pub mod chart;
pub mod metrics;
pub mod scheduler;
pub mod server;
pub mod sync;
