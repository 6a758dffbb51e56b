pub mod account_store;
pub mod token_store;

pub use account_store::AccountStore;
pub use token_store::{IssuedTokens, TokenStore};
