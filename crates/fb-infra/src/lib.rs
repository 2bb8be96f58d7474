pub mod auth;
pub mod catalog;
pub mod remote;
pub mod storage;
pub mod time;

pub use auth::StaticAuthSession;
pub use catalog::StaticSportsCatalog;
pub use remote::HttpRemoteOnboardingClient;
pub use storage::{app_data_dir, logs_dir, FileStorageSlot, InMemoryStorageSlot, DEFAULT_SLOT_KEY};
pub use time::SystemClock;
