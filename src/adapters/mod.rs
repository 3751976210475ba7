pub mod clock;
pub mod file_repository;
pub mod local_storage;
pub mod memory;
pub mod store;

pub use clock::{FixedClock, SystemClock};
pub use file_repository::FileRepository;
pub use local_storage::LocalStorage;
pub use memory::InMemoryRepository;
