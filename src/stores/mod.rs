//! In-memory stores

mod accent_store;

pub use accent_store::AccentStore;
