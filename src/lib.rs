pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod rest;
pub mod services;
pub mod store;

use sqlx::SqlitePool;

use crate::{
    config::AuthConfig,
    services::{AuthService, ProductService},
    store::{ProductStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub products: ProductService,
}

impl AppState {
    pub fn new(db: SqlitePool, auth_config: AuthConfig) -> Self {
        Self {
            auth: AuthService::new(UserStore::new(db.clone()), auth_config),
            products: ProductService::new(ProductStore::new(db)),
        }
    }
}
