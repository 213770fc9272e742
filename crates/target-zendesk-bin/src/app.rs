//! Wiring: client, driver, signal handling.

use std::path::PathBuf;
use std::sync::Arc;

use singer_stream_driver::{DriverOptions, StreamDriver};
use target_config_and_utils::TargetConfig;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use zendesk_http_client::ZendeskClient;

type Input = Box<dyn AsyncBufRead + Unpin + Send>;

pub async fn run(
    config: TargetConfig,
    input_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url_base = config.url_base()?;
    let client = Arc::new(ZendeskClient::new(url_base.clone(), &config.auth_method()?)?);

    info!(
        url_base = %url_base,
        write_mode = ?config.write_mode,
        default_action = %config.default_action,
        "Starting target-zendesk"
    );

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let input: Input = match &input_path {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut driver = StreamDriver::new(DriverOptions::from(&config), client, cancel);
    let mut stdout = std::io::stdout();

    match driver.run(input, &mut stdout).await {
        Ok(summary) => {
            info!(
                records = summary.records,
                jobs = summary.jobs_completed,
                items = summary.items_written,
                direct_writes = summary.direct_writes,
                states = summary.states_emitted,
                "Sync finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Sync failed");
            Err(e.into())
        }
    }
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Received Ctrl-C, cancelling");
                cancel.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });
}
