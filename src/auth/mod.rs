//! Authentication primitives: the session token issuer and the password
//! hashing capability. Neither talks to the database.

pub mod password;
pub mod token;

pub use token::TokenIssuer;
