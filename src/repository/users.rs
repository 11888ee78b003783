//! Users repository for database operations

use sqlx::PgConnection;

use crate::{
    error::AppResult,
    models::ids::UserId,
    models::user::{User, UserRow},
};

#[derive(Clone)]
pub struct UsersRepository;

impl UsersRepository {
    pub fn new() -> Self {
        Self
    }

    /// Get member by ID; a normal miss is `None`, never an error
    pub async fn find_by_id(
        &self,
        conn: &mut PgConnection,
        id: &UserId,
    ) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, status, current_loan_count, overdue_fees \
             FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Persist full member state, idempotent by identity
    pub async fn save(&self, conn: &mut PgConnection, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, status, current_loan_count, overdue_fees)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                status = EXCLUDED.status,
                current_loan_count = EXCLUDED.current_loan_count,
                overdue_fees = EXCLUDED.overdue_fees
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.name())
        .bind(user.email())
        .bind(user.status().as_str())
        .bind(user.current_loan_count())
        .bind(user.overdue_fees())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Check if an email is already registered
    pub async fn email_exists(&self, conn: &mut PgConnection, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }
}

impl Default for UsersRepository {
    fn default() -> Self {
        Self::new()
    }
}
