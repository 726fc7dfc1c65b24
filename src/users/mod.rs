mod memory;
pub mod password;
mod pg;
pub mod repo;
pub mod repo_types;
pub mod validate;

pub use memory::MemoryUserBackend;
pub use pg::PgUserBackend;
pub use repo::{StoreError, UserBackend, UserStore};
pub use repo_types::{Role, User, UserChanges};
