mod account;
mod requests;

pub use account::Account;
pub use requests::*;
