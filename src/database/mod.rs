pub mod manager;
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use schema::ensure_schema;
pub use store::{Entity, NameRotation, Store};
