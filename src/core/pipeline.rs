use crate::core::{ConfigProvider, IdentitySource, Pipeline, Storage};
use crate::domain::model::{Domain, IdentitySet, LoadReport};
use crate::utils::error::Result;

/// Common names containing the domain, full-text matched against each
/// certificate's identity index. `$1` is the only parameter.
pub const IDENTITY_QUERY: &str = "SELECT cai.NAME_VALUE \
     FROM certificate_and_identities cai \
     WHERE plainto_tsquery('certwatch', $1) @@ identities(cai.CERTIFICATE) \
       AND cai.NAME_VALUE ILIKE ('%' || $1 || '%') \
       AND cai.NAME_TYPE = '2.5.4.3' \
     LIMIT 1000000";

/// Row cap enforced by `IDENTITY_QUERY` itself.
pub const QUERY_ROW_LIMIT: usize = 1_000_000;

pub struct IdentityPipeline<Src: IdentitySource, S: Storage, C: ConfigProvider> {
    source: Src,
    storage: S,
    config: C,
}

impl<Src: IdentitySource, S: Storage, C: ConfigProvider> IdentityPipeline<Src, S, C> {
    pub fn new(source: Src, storage: S, config: C) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }
}

/// Keep non-empty values in row order, up to `max`.
///
/// Returns the kept identities and how many valid ones were dropped.
pub fn collect_identities(rows: Vec<Option<String>>, max: usize) -> (Vec<String>, usize) {
    let mut kept = Vec::with_capacity(rows.len().min(max));
    let mut dropped = 0;

    for value in rows.into_iter().flatten() {
        if value.is_empty() {
            continue;
        }
        if kept.len() < max {
            kept.push(value);
        } else {
            dropped += 1;
        }
    }

    (kept, dropped)
}

#[async_trait::async_trait]
impl<Src: IdentitySource, S: Storage, C: ConfigProvider> Pipeline for IdentityPipeline<Src, S, C> {
    async fn probe(&self) -> Result<()> {
        self.source.probe().await
    }

    async fn check_output(&self) -> Result<()> {
        self.storage.ensure_writable()
    }

    async fn extract(&self, domain: &Domain) -> Result<Vec<String>> {
        tracing::debug!("Querying identities for {}", domain);
        let rows = self
            .source
            .fetch_column(IDENTITY_QUERY, &[domain.as_str()])
            .await?;

        if rows.len() >= QUERY_ROW_LIMIT {
            tracing::warn!(
                "Query returned {} rows, the query limit; results may be incomplete",
                rows.len()
            );
        }

        let (identities, dropped) = collect_identities(rows, self.config.max_identities());
        if dropped > 0 {
            tracing::warn!(
                "Dropped {} identities beyond the limit of {}",
                dropped,
                self.config.max_identities()
            );
        }

        Ok(identities)
    }

    async fn transform(&self, raw: Vec<String>) -> Result<IdentitySet> {
        let raw_count = raw.len();
        let identities = IdentitySet::from_raw(raw);

        tracing::debug!(
            "{} raw identities, {} unique ({} wildcard, {} normal)",
            raw_count,
            identities.len(),
            identities.wildcards.len(),
            identities.normal.len()
        );

        Ok(identities)
    }

    async fn load(&self, domain: &Domain, identities: IdentitySet) -> Result<LoadReport> {
        self.storage.ensure_writable()?;

        let listing = identities.render();
        let output_path = self
            .storage
            .write_file(&domain.output_file_name(), listing.as_bytes())
            .await?;

        tracing::debug!("Wrote {} bytes to {}", listing.len(), output_path.display());

        Ok(LoadReport {
            output_path,
            listing,
            wildcard_count: identities.wildcards.len(),
            normal_count: identities.normal.len(),
        })
    }
}
