use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::marker::PhantomData;

use crate::database::manager::DatabaseError;
use crate::database::store::{Entity, NameRotation, Store};
use crate::models::{NewReminder, OffTopicChannelName, Reminder, ReminderFilter, User, UserFilter};

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// sqlx-backed store for one entity table.
pub struct PgStore<T> {
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T> PgStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }
}

/// Maps constraint violations onto the gateway's own error kinds.
fn classify<T: Entity>(error: sqlx::Error, key: impl std::fmt::Display) -> DatabaseError {
    match &error {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            DatabaseError::Conflict(format!("{} {}", T::NAME, key))
        }
        _ => DatabaseError::Sqlx(error),
    }
}

fn not_found<T: Entity>(key: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {} not found", T::NAME, key))
}

#[async_trait]
impl Store<User> for PgStore<User> {
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id, name, discriminator, in_guild, roles FROM api_user");
        if let Some(in_guild) = filter.in_guild {
            query.push(" WHERE in_guild = ").push_bind(in_guild);
        }
        query.push(" ORDER BY id");
        Ok(query.build_query_as::<User>().fetch_all(&self.pool).await?)
    }

    async fn get(&self, id: &i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, discriminator, in_guild, roles FROM api_user WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: User) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO api_user (id, name, discriminator, in_guild, roles) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, discriminator, in_guild, roles",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.discriminator)
        .bind(user.in_guild)
        .bind(&user.roles)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify::<User>(e, user.id))
    }

    async fn update(&self, user: &User) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE api_user SET name = $2, discriminator = $3, in_guild = $4, roles = $5 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.discriminator)
        .bind(user.in_guild)
        .bind(&user.roles)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<User>(user.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM api_user WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<User>(id));
        }
        Ok(())
    }
}

const REMINDER_COLUMNS: &str =
    "id, active, channel_id, content, expiration, author_id, jump_url, mentions, failures";

#[async_trait]
impl Store<Reminder> for PgStore<Reminder> {
    async fn list(&self, filter: &ReminderFilter) -> Result<Vec<Reminder>, DatabaseError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {REMINDER_COLUMNS} FROM api_reminder WHERE TRUE"));
        if let Some(author_id) = filter.author_id {
            query.push(" AND author_id = ").push_bind(author_id);
        }
        if let Some(active) = filter.active {
            query.push(" AND active = ").push_bind(active);
        }
        query.push(" ORDER BY id");
        Ok(query.build_query_as::<Reminder>().fetch_all(&self.pool).await?)
    }

    async fn get(&self, id: &i64) -> Result<Option<Reminder>, DatabaseError> {
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM api_reminder WHERE id = $1");
        let reminder = sqlx::query_as::<_, Reminder>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reminder)
    }

    async fn create(&self, draft: NewReminder) -> Result<Reminder, DatabaseError> {
        // The id comes from the table's sequence, not from `from_draft`.
        let sql = format!(
            "INSERT INTO api_reminder \
             (active, channel_id, content, expiration, author_id, jump_url, mentions, failures) \
             VALUES (TRUE, $1, $2, $3, $4, $5, $6, 0) \
             RETURNING {REMINDER_COLUMNS}"
        );
        let reminder = sqlx::query_as::<_, Reminder>(&sql)
            .bind(draft.channel_id)
            .bind(&draft.content)
            .bind(draft.expiration)
            .bind(draft.author_id)
            .bind(&draft.jump_url)
            .bind(&draft.mentions)
            .fetch_one(&self.pool)
            .await?;
        Ok(reminder)
    }

    async fn update(&self, reminder: &Reminder) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE api_reminder SET active = $2, channel_id = $3, content = $4, \
             expiration = $5, author_id = $6, jump_url = $7, mentions = $8, failures = $9 \
             WHERE id = $1",
        )
        .bind(reminder.id)
        .bind(reminder.active)
        .bind(reminder.channel_id)
        .bind(&reminder.content)
        .bind(reminder.expiration)
        .bind(reminder.author_id)
        .bind(&reminder.jump_url)
        .bind(&reminder.mentions)
        .bind(reminder.failures)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<Reminder>(reminder.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM api_reminder WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<Reminder>(id));
        }
        Ok(())
    }
}

#[async_trait]
impl Store<OffTopicChannelName> for PgStore<OffTopicChannelName> {
    async fn list(&self, _filter: &()) -> Result<Vec<OffTopicChannelName>, DatabaseError> {
        let names = sqlx::query_as::<_, OffTopicChannelName>(
            "SELECT name, used FROM api_offtopicchannelname ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn get(&self, name: &String) -> Result<Option<OffTopicChannelName>, DatabaseError> {
        let found = sqlx::query_as::<_, OffTopicChannelName>(
            "SELECT name, used FROM api_offtopicchannelname WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    async fn create(&self, draft: OffTopicChannelName) -> Result<OffTopicChannelName, DatabaseError> {
        sqlx::query_as::<_, OffTopicChannelName>(
            "INSERT INTO api_offtopicchannelname (name, used) VALUES ($1, $2) RETURNING name, used",
        )
        .bind(&draft.name)
        .bind(draft.used)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify::<OffTopicChannelName>(e, &draft.name))
    }

    async fn update(&self, entity: &OffTopicChannelName) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE api_offtopicchannelname SET used = $2 WHERE name = $1")
            .bind(&entity.name)
            .bind(entity.used)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<OffTopicChannelName>(&entity.name));
        }
        Ok(())
    }

    async fn delete(&self, name: &String) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM api_offtopicchannelname WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<OffTopicChannelName>(name));
        }
        Ok(())
    }
}

#[async_trait]
impl NameRotation for PgStore<OffTopicChannelName> {
    async fn mark_used(&self, picked: &[String], new_rotation: bool) -> Result<(), DatabaseError> {
        // One statement, so a rotation is never left half applied.
        let sql = if new_rotation {
            "UPDATE api_offtopicchannelname SET used = (name = ANY($1))"
        } else {
            "UPDATE api_offtopicchannelname SET used = TRUE WHERE name = ANY($1)"
        };
        sqlx::query(sql).bind(picked).execute(&self.pool).await?;
        Ok(())
    }
}
