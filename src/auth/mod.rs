pub mod password;
pub mod policy;
pub mod token;

pub use password::{hash_password, verify_password};
pub use policy::require_role;
pub use token::TokenIssuer;
