pub mod products;
pub mod users;

pub use products::ProductStore;
pub use users::UserStore;
