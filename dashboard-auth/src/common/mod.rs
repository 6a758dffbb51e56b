mod models;

pub use models::{Identity, SessionSnapshot, SNAPSHOT_KEY};
