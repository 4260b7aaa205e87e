use apisail::cli::{run_cli, Cli};
use apisail::logging::{init_logging_with_config, LogConfig};
use apisail::runtime_config::SailConfig;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(path) = &cli.config {
        // A broken config file is reported by the command itself.
        if let Ok(config) = SailConfig::from_file(path) {
            log_config.format = config.merge_env().log_format;
        }
    }
    init_logging_with_config(&log_config)?;

    let code = run_cli(cli)?;
    std::process::exit(code);
}
