//! Auth Module
//!
//! Password hashing and bearer-token sessions.

mod password;
mod session;

pub use password::{hash_password, verify_password, MAX_COST, MIN_COST};
pub use session::{Session, SessionStore, TOKEN_BYTES};
