//! Member management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::ids::UserId,
    models::user::{CreateUser, User, UserDetails},
    repository::{Repository, UnitOfWork},
    services::idgen::IdGenerator,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    uow: UnitOfWork,
    ids: Arc<dyn IdGenerator>,
}

impl UsersService {
    pub fn new(repository: Repository, uow: UnitOfWork, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            repository,
            uow,
            ids,
        }
    }

    /// Register a new member with a generated 8-digit identifier
    pub async fn create_user(&self, request: CreateUser) -> AppResult<UserDetails> {
        let mut tx = self.uow.begin().await?;

        if self
            .repository
            .users
            .email_exists(&mut *tx, &request.email)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                request.email
            )));
        }

        let user = User::new(self.ids.user_id(), request.name, request.email);
        self.repository.users.save(&mut *tx, &user).await?;
        tx.commit().await?;

        tracing::info!("Member {} registered", user.id());

        Ok(UserDetails::from(&user))
    }

    /// Get member details
    pub async fn get_user(&self, id: &str) -> AppResult<UserDetails> {
        let user_id = UserId::new(id)?;
        let mut conn = self.uow.acquire().await?;

        let user = self
            .repository
            .users
            .find_by_id(&mut *conn, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {user_id} not found")))?;

        Ok(UserDetails::from(&user))
    }

    /// Suspend or reinstate a member
    pub async fn set_suspended(&self, id: &str, suspended: bool) -> AppResult<UserDetails> {
        let user_id = UserId::new(id)?;
        let mut tx = self.uow.begin().await?;

        let mut user = self
            .repository
            .users
            .find_by_id(&mut *tx, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {user_id} not found")))?;

        if suspended {
            user.suspend();
        } else {
            user.reinstate();
        }

        self.repository.users.save(&mut *tx, &user).await?;
        tx.commit().await?;

        tracing::info!(
            "Member {} {}",
            user.id(),
            if suspended { "suspended" } else { "reinstated" }
        );

        Ok(UserDetails::from(&user))
    }
}
