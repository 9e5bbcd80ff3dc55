pub mod bootstrap;
pub mod store;

#[cfg(test)]
mod tests;

pub use bootstrap::{logout, restore, save, Session, TOKEN_KEY, USER_DATA_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
