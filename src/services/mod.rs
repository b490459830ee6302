pub mod auth;
pub mod products;

pub use auth::AuthService;
pub use products::ProductService;
