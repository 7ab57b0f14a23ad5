//! Repository layer for database operations

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Accessory, Category, Mobile, Product, Resource, Service, User},
    pagination::{PageWindow, SearchFilter},
    validation::FieldValue,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence operations for one resource.
///
/// `find_many` always returns newest records first (`created_at` then `id`,
/// both descending).
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<R::Record>>;

    /// Any record whose `field` equals `value`
    async fn find_by_unique_field(
        &self,
        field: &'static str,
        value: &FieldValue,
    ) -> AppResult<Option<R::Record>>;

    async fn find_many(&self, filter: &SearchFilter, window: PageWindow) -> AppResult<Vec<R::Record>>;

    async fn count(&self, filter: &SearchFilter) -> AppResult<i64>;

    async fn create(&self, data: &R::Create) -> AppResult<R::Record>;

    /// Fails with `NotFound` when no record has `id`
    async fn update(&self, id: i32, patch: &R::Patch) -> AppResult<R::Record>;

    /// Fails with `NotFound` when no record has `id`
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub type Store<R> = Arc<dyn ResourceStore<R>>;

/// Main repository struct holding one store per resource
#[derive(Clone)]
pub struct Repository {
    pub users: Store<User>,
    pub mobiles: Store<Mobile>,
    pub accessories: Store<Accessory>,
    pub services: Store<Service>,
    pub categories: Store<Category>,
    pub products: Store<Product>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(PgStore::<User>::new(pool.clone())),
            mobiles: Arc::new(PgStore::<Mobile>::new(pool.clone())),
            accessories: Arc::new(PgStore::<Accessory>::new(pool.clone())),
            services: Arc::new(PgStore::<Service>::new(pool.clone())),
            categories: Arc::new(PgStore::<Category>::new(pool.clone())),
            products: Arc::new(PgStore::<Product>::new(pool)),
        }
    }

    /// Repository backed by process memory, used by tests and local runs
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryStore::<User>::new()),
            mobiles: Arc::new(MemoryStore::<Mobile>::new()),
            accessories: Arc::new(MemoryStore::<Accessory>::new()),
            services: Arc::new(MemoryStore::<Service>::new()),
            categories: Arc::new(MemoryStore::<Category>::new()),
            products: Arc::new(MemoryStore::<Product>::new()),
        }
    }
}
