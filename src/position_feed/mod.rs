mod client;
mod poller;
mod watch;

pub use client::{FeedClientError, new_client};
pub use poller::{fetch_current_fix, poll};
pub use watch::watch;
