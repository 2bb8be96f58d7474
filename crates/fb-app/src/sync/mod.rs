//! Remote sync coordination.

mod coordinator;
mod policy;

pub use coordinator::SyncCoordinator;
pub use policy::SyncPolicy;
