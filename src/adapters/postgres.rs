use crate::config::toml_config::ConnectionProfile;
use crate::core::IdentitySource;
use crate::utils::error::{IdentityError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{Connection, Row};

const APPLICATION_NAME: &str = "crt-identities";

/// The certwatch database, reached with a fresh TLS connection per call.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    profile: ConnectionProfile,
}

impl PostgresSource {
    pub fn new(profile: ConnectionProfile) -> Self {
        Self { profile }
    }

    /// Connection options taken from the profile alone.
    ///
    /// sqlx has no constructor that skips the libpq `PG*` variables, so every
    /// setting it exposes a setter for is overwritten here: host, port, user,
    /// database, TLS mode and application name. `PGPASSWORD`, `PGSSLROOTCERT`,
    /// `PGSSLCERT`, `PGSSLKEY` and `PGOPTIONS` have no reset in the builder and
    /// still reach the connection if set.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new_without_pgpass()
            .host(&self.profile.host)
            .port(self.profile.port)
            .username(&self.profile.user)
            .database(&self.profile.database)
            .ssl_mode(PgSslMode::Require)
            .application_name(APPLICATION_NAME)
    }

    async fn connect(&self) -> std::result::Result<PgConnection, String> {
        let options = self.connect_options();
        let timeout = self.profile.connect_timeout();

        tracing::debug!(
            "Connecting to {}:{}/{} as {} (timeout {:?})",
            self.profile.host,
            self.profile.port,
            self.profile.database,
            self.profile.user,
            timeout
        );

        match tokio::time::timeout(timeout, PgConnection::connect_with(&options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(describe(&e)),
            Err(_) => Err(format!(
                "timeout expired after {}s connecting to {}:{}",
                self.profile.connect_timeout_secs, self.profile.host, self.profile.port
            )),
        }
    }
}

/// Prefer the server's own message over sqlx's wrapper text.
fn describe(err: &sqlx::Error) -> String {
    match err.as_database_error() {
        Some(db) => db.message().to_string(),
        None => err.to_string(),
    }
}

async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::debug!("Error while closing connection: {}", describe(&e));
    }
}

#[async_trait]
impl IdentitySource for PostgresSource {
    async fn probe(&self) -> Result<()> {
        let conn = self
            .connect()
            .await
            .map_err(|message| IdentityError::ConnectivityError { message })?;
        close(conn).await;
        Ok(())
    }

    async fn fetch_column(&self, sql: &str, params: &[&str]) -> Result<Vec<Option<String>>> {
        let mut conn = self
            .connect()
            .await
            .map_err(|message| IdentityError::QueryError { message })?;

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.to_string());
        }
        let result = query.fetch_all(&mut conn).await;
        close(conn).await;

        let rows = result.map_err(|e| IdentityError::QueryError {
            message: describe(&e),
        })?;

        rows.iter()
            .map(|row| row.try_get::<Option<String>, _>(0))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| IdentityError::QueryError {
                message: describe(&e),
            })
    }
}
