// Types shared between the client library and the emulator
pub mod common;

// Client library (public API for the dashboard)
mod client;
mod error;

pub use client::{
    config_builder, AuthSettings, FileStore, IdentityProvider, KeyValueStore, ListenerRegistry,
    MemoryStore, ProviderError, RestIdentityProvider, SessionLogin, SessionObserver,
    SessionState, Settings, SignInResult, StorageError, Subscription, FALLBACK_SIGN_IN_MESSAGE,
};
pub use common::{Identity, SessionSnapshot, SNAPSHOT_KEY};
pub use error::AuthError;

// Emulator modules (public for binary and integration tests)
#[cfg(feature = "emulator")]
pub mod emulator;
