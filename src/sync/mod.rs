pub mod fetch;
pub mod parser;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use fetch::SnapshotClient;
pub use session::SyncSession;
pub use types::*;
