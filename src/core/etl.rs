use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::validate_domain;
use std::io::Write;
use std::path::PathBuf;

/// Runs validate → probe → output check → extract → transform → load,
/// strictly in order.
pub struct IdentityEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> IdentityEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Returns the path of the written file. The listing is mirrored to
    /// `out` only after the file has been written in full, followed by an
    /// `Output saved to <path>` line.
    pub async fn run<W: Write>(&self, raw_domain: &str, out: &mut W) -> Result<PathBuf> {
        // 驗證輸入，失敗時不做任何網路或檔案 I/O
        let domain = validate_domain(raw_domain)?;
        tracing::info!("Searching certificate identities for {}", domain);

        self.pipeline.probe().await?;
        tracing::debug!("Database reachable");
        self.monitor.log_stats("Probe");

        // 查詢前先確認輸出目錄可寫
        self.pipeline.check_output().await?;

        let raw = self.pipeline.extract(&domain).await?;
        tracing::info!("Fetched {} identities", raw.len());
        self.monitor.log_stats("Extract");

        let identities = self.pipeline.transform(raw).await?;
        self.monitor.log_stats("Transform");

        let report = self.pipeline.load(&domain, identities).await?;
        out.write_all(report.listing.as_bytes())?;
        writeln!(out, "Output saved to {}", report.output_path.display())?;
        out.flush()?;
        tracing::info!(
            "Wrote {} wildcard and {} normal identities",
            report.wildcard_count,
            report.normal_count
        );
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(report.output_path)
    }
}
