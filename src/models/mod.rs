pub mod blacklisted_token;
pub mod user;

pub use blacklisted_token::BlacklistedToken;
pub use user::{User, UserView};
