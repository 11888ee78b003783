//! Business logic services

pub mod catalog;
pub mod clock;
pub mod eligibility;
pub mod fees;
pub mod idgen;
pub mod loans;
pub mod users;

use std::sync::Arc;

use crate::repository::{Repository, UnitOfWork};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let uow = UnitOfWork::new(repository.pool.clone());
        let ids: Arc<dyn idgen::IdGenerator> = Arc::new(idgen::RandomIdGenerator);
        let clock: Arc<dyn clock::Clock> = Arc::new(clock::SystemClock);

        Self {
            catalog: catalog::CatalogService::new(repository.clone(), uow.clone(), ids.clone()),
            users: users::UsersService::new(repository.clone(), uow.clone(), ids.clone()),
            loans: loans::LoansService::new(repository, uow, clock, ids),
        }
    }
}
