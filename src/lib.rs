#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

use std::sync::Arc;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use log::info;

use crate::config::{Settings, UserStoreKind};
use crate::documents::{MemoryUserCollection, PgUserCollection, UserCollection};
use crate::models::Pool;
use crate::web::errors::{ServiceError, ServiceResult};

pub mod api_service;
pub mod coerce;
pub mod config;
pub mod documents;
pub mod models;
pub mod schema;
pub mod spreadsheet;
pub mod web;

embed_migrations!();

#[derive(Clone)]
pub struct AppData {
    pub pool: Pool,
    pub users: Arc<dyn UserCollection>,
    pub upload_limit: usize,
}

/// Connects eagerly, failing when the database is unreachable.
pub fn build_pool(database_url: &str, max_size: u32) -> ServiceResult<Pool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)?)
}

/// A pool that opens no connection until one is requested.
pub fn lazy_pool(database_url: &str, max_size: u32) -> Pool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .min_idle(Some(0))
        .build_unchecked(manager)
}

impl AppData {
    pub fn new(settings: &Settings) -> ServiceResult<Self> {
        let pool = build_pool(&settings.database_url, settings.pool_size)?;

        let users: Arc<dyn UserCollection> = match settings.user_store {
            UserStoreKind::Postgres => Arc::new(PgUserCollection::new(pool.clone())),
            UserStoreKind::Memory => Arc::new(MemoryUserCollection::default()),
        };
        info!("Using {:?} user store", settings.user_store);

        Ok(AppData::with_users(pool, users, settings.upload_limit))
    }

    pub fn with_users(pool: Pool, users: Arc<dyn UserCollection>, upload_limit: usize) -> Self {
        AppData { pool, users, upload_limit }
    }

    /// Creates the schema and every missing table.
    pub fn setup_migrations(&self) -> ServiceResult<()> {
        let conn = self.pool.get()?;
        embedded_migrations::run(&conn)
            .map_err(|x| ServiceError::InternalServerError(format!("Migration error: {}", x)))?;
        Ok(())
    }
}
