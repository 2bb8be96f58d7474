mod app_data_dir;
mod file_slot;
mod memory_slot;

pub use app_data_dir::{app_data_dir, logs_dir, DEFAULT_SLOT_KEY};
pub use file_slot::FileStorageSlot;
pub use memory_slot::InMemoryStorageSlot;
