use clap::error::ErrorKind;
use clap::Parser;
use crt_identities::config::toml_config::DEFAULT_ERROR_LOG;
use crt_identities::utils::logger::{self, ErrorLog};
use crt_identities::utils::validation::Validate;
use crt_identities::{
    CliConfig, IdentityEngine, IdentityError, IdentityPipeline, LocalStorage, PostgresSource,
};

#[tokio::main]
async fn main() {
    let cli = match CliConfig::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            let _ = e.print();
            fail(
                &ErrorLog::new(DEFAULT_ERROR_LOG),
                IdentityError::UsageError {
                    message: "Usage: crt-identities <domain>".to_string(),
                },
            );
        }
    };

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.to_app_config() {
        Ok(config) => config,
        Err(e) => fail(&ErrorLog::new(DEFAULT_ERROR_LOG), e),
    };
    let error_log = ErrorLog::new(config.output.error_log.clone());

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&error_log, e);
    }

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output.directory.clone());
    let source = PostgresSource::new(config.connection.clone());
    let pipeline = IdentityPipeline::new(source, storage, config);
    let engine = IdentityEngine::new_with_monitoring(pipeline, cli.monitor);

    match engine.run(&cli.domain, &mut std::io::stdout()).await {
        Ok(output_path) => tracing::info!("📁 Output saved to: {}", output_path.display()),
        Err(e) => fail(&error_log, e),
    }
}

/// Report a fatal error to stderr and the error log, then exit.
fn fail(error_log: &ErrorLog, err: IdentityError) -> ! {
    tracing::debug!("❌ {} failed: {:?}", err.kind(), err);
    error_log.record(&err.to_string());
    eprintln!("💡 {}", err.recovery_suggestion());
    std::process::exit(err.exit_code());
}
