use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::entities::users;

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_cookie(&self, cookie_id: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::CookieId.eq(cookie_id))
            .one(&self.conn)
            .await
            .context("Failed to query user by cookie")
    }

    /// Returns the user owning `cookie_id`, inserting it first if needed.
    ///
    /// Two requests racing on the same new cookie both end up with the row
    /// that won the unique index.
    pub async fn get_or_create(&self, cookie_id: &str) -> Result<users::Model> {
        if let Some(user) = self.get_by_cookie(cookie_id).await? {
            return Ok(user);
        }

        self.create(cookie_id).await
    }

    /// Inserts a user for `cookie_id`. Losing the unique-index race to a
    /// concurrent insert yields the winner's row.
    pub(crate) async fn create(&self, cookie_id: &str) -> Result<users::Model> {
        let active = users::ActiveModel {
            cookie_id: Set(cookie_id.to_string()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "Created anonymous user");
                Ok(user)
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::debug!("Lost user insert race, re-reading");
                self.get_by_cookie(cookie_id).await?.ok_or_else(|| {
                    anyhow::anyhow!("User for cookie {cookie_id} vanished after insert conflict")
                })
            }
            Err(err) => Err(err).context("Failed to create user"),
        }
    }
}
