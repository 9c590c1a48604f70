pub mod handlers;
pub mod password;
pub mod revocation;
pub mod session;
pub mod token;
