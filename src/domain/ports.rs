use crate::domain::model::{Domain, IdentitySet, LoadReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A queryable store of certificate identities.
///
/// `sql` is always a constant query text; caller-supplied values travel only
/// through `params` and are bound positionally (`$1`, `$2`, ...).
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Open a connection and close it again without querying.
    async fn probe(&self) -> Result<()>;

    /// Run `sql` and return the first column of every row, in row order.
    async fn fetch_column(&self, sql: &str, params: &[&str]) -> Result<Vec<Option<String>>>;
}

pub trait Storage: Send + Sync {
    /// Full path a file named `name` would be written to.
    fn resolve(&self, name: &str) -> PathBuf;

    /// Fail if the target directory is missing, not a directory, or read-only.
    fn ensure_writable(&self) -> Result<()>;

    /// Create or truncate `name` and write `data` to it.
    fn write_file(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Rows kept in memory; anything past this is dropped.
    fn max_identities(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn probe(&self) -> Result<()>;
    /// Fail before the query if the output can't be written.
    async fn check_output(&self) -> Result<()>;
    async fn extract(&self, domain: &Domain) -> Result<Vec<String>>;
    async fn transform(&self, raw: Vec<String>) -> Result<IdentitySet>;
    async fn load(&self, domain: &Domain, identities: IdentitySet) -> Result<LoadReport>;
}
