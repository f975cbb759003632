use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// Tables backing the local endpoints. Existing tables are left alone.
const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS api_user (
        id BIGINT PRIMARY KEY CHECK (id >= 0),
        name VARCHAR(32) NOT NULL,
        discriminator SMALLINT NOT NULL CHECK (discriminator BETWEEN 0 AND 9999),
        in_guild BOOLEAN NOT NULL DEFAULT TRUE,
        roles BIGINT[] NOT NULL DEFAULT '{}'
    )",
    "CREATE TABLE IF NOT EXISTS api_reminder (
        id BIGSERIAL PRIMARY KEY,
        active BOOLEAN NOT NULL,
        channel_id BIGINT NOT NULL,
        content VARCHAR(1500) NOT NULL,
        expiration TIMESTAMPTZ NOT NULL,
        author_id BIGINT NOT NULL REFERENCES api_user (id) ON DELETE CASCADE,
        jump_url VARCHAR(88) NOT NULL,
        mentions BIGINT[] NOT NULL DEFAULT '{}',
        failures INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS api_reminder_author_id ON api_reminder (author_id)",
    "CREATE TABLE IF NOT EXISTS api_offtopicchannelname (
        name VARCHAR(96) PRIMARY KEY,
        used BOOLEAN NOT NULL DEFAULT FALSE
    )",
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!(tables = 3, "Database schema ready");
    Ok(())
}
