//! Remote synchronization
//!
//! Keeps the local quote collection in step with a remote REST collection.
//!
//! ## Flow
//!
//! 1. Fetch all remote records
//! 2. Replace the local collection (remote wins)
//! 3. Push every quote back as a creation request
//!
//! Triggered every [`SYNC_INTERVAL`] by a [`SyncTicker`] and after local
//! changes.
//!
//! ## Usage
//!
//! ```ignore
//! let agent = SyncAgent::new(Arc::new(HttpRemote::new(url)?));
//! agent.reconcile(&mut store, &mut categories, SyncTrigger::Manual).await?;
//! ```

mod agent;
mod mock;
mod remote;
mod ticker;

pub use agent::{
    PushFailure, SyncAgent, SyncOutcome, SyncReport, SyncStatus, SyncTrigger, SYNC_INTERVAL,
};
pub use mock::MockRemote;
pub use remote::{HttpRemote, RemoteCollection, RemoteRecord, DEFAULT_REMOTE_URL};
pub use ticker::{spawn_sync_ticker, SyncTicker, TickerCommand, TickerEvent};
