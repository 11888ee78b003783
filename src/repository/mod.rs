//! Repository layer for database operations
//!
//! Every repository method takes an explicit connection so a use case
//! runs all of its reads and writes against one snapshot. The
//! [`UnitOfWork`] hands out that connection: either a scoped
//! transaction (commit on success, rollback on every other exit path
//! via drop) or a plain pooled connection for read-only paths.

pub mod books;
pub mod loans;
pub mod users;

use sqlx::pool::PoolConnection;
use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Scoped transaction handle
pub type Tx = Transaction<'static, Postgres>;

/// Transactional boundary over the connection pool
///
/// `begin` acquires a transaction; dropping it without `commit` rolls
/// back, so early returns through `?` abort the whole unit of work.
#[derive(Clone)]
pub struct UnitOfWork {
    pool: Pool<Postgres>,
}

impl UnitOfWork {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> AppResult<Tx> {
        Ok(self.pool.begin().await?)
    }

    /// Plain connection for non-transactional reads
    pub async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await?)
    }
}

/// Main repository struct holding the per-entity repositories
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(),
            users: users::UsersRepository::new(),
            loans: loans::LoansRepository::new(),
            pool,
        }
    }
}
