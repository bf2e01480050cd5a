use anyhow::Result;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

use crate::util::env as env_util;

/// Idempotent DDL for the five tables; applied behind the AUTO_SCHEMA gate.
const SCHEMA_SQL: &str = include_str!("../../schema.sql");

#[derive(Clone)]
pub struct Db {
    pub pool: PgPool,
}

impl Db {
    // SECURITY: never include raw DSNs in tracing spans (they may contain credentials).
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let mut connect_options = PgConnectOptions::from_str(database_url)?;

        // Be explicit about TLS when the DSN asks for it.
        if database_url.contains("sslmode=require") && !database_url.contains("sslmode=disable") {
            connect_options = connect_options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(connect_options)
            .await?;
        info!("connected to db");

        // Optional schema bootstrap (default: OFF). The DDL is CREATE TABLE
        // IF NOT EXISTS throughout, so re-running it is harmless; we still
        // gate it so the binaries can run against a managed database where
        // DDL is someone else's job. Enable with AUTO_SCHEMA=1/true/on.
        if env_util::env_flag("AUTO_SCHEMA", false) {
            info!("ensuring schema (AUTO_SCHEMA=on)");
            sqlx::raw_sql(SCHEMA_SQL).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}
