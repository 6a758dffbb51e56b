mod config;
mod login;
mod observer;
pub(crate) mod provider;
mod storage;

pub use config::{config_builder, AuthSettings, Settings};
pub use login::{SessionLogin, SignInResult, FALLBACK_SIGN_IN_MESSAGE};
pub use observer::{SessionObserver, SessionState};
pub use provider::{
    IdentityProvider, ListenerRegistry, ProviderError, RestIdentityProvider, Subscription,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
