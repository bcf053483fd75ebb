mod memory;
mod postgres;
mod store;

pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use store::{SessionRow, Store};
