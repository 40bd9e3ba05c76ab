use log::error;
use rentwise_core::init_logging;
use rentwise_server::Config;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("rentwise: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("rentwise: {err}");
        return ExitCode::FAILURE;
    }
    config.log_summary();

    match rentwise_server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("rentwise: {err}");
            ExitCode::FAILURE
        }
    }
}
