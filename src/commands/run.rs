use std::path::Path;

use prettytable::{Cell, Row, Table, format};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::context::init_context;
use crate::error::AppError;
use crate::executor::DepositExecutor;
use crate::progress::{ProgressBarReporter, console_ui_enabled};
use crate::scheduler::{PacingConfig, QuotaScheduler, SystemClock};

// Prints the startup banner.
fn print_banner() {
    println!(
        r#"
██████╗  █████╗  ██████╗███████╗██████╗
██╔══██╗██╔══██╗██╔════╝██╔════╝██╔══██╗
██████╔╝███████║██║     █████╗  ██████╔╝
██╔═══╝ ██╔══██║██║     ██╔══╝  ██╔══██╗
██║     ██║  ██║╚██████╗███████╗██║  ██║
╚═╝     ╚═╝  ╚═╝ ╚═════╝╚══════╝╚═╝  ╚═╝

          Bridge Deposit Pacer
"#
    );
}

fn print_startup_table(config: &Config) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![Cell::new("Startup Configuration")]));

    table.add_row(Row::new(vec![Cell::new("RPC URL"), Cell::new(&config.rpc_url)]));
    table.add_row(Row::new(vec![Cell::new("Inbox"), Cell::new(&config.inbox_address)]));
    table.add_row(Row::new(vec![
        Cell::new("Deposits / day"),
        Cell::new(&format!("{}..={}", config.min_tx_per_day, config.max_tx_per_day)),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Amount (ETH)"),
        Cell::new(&format!("{}..={}", config.min_amount_eth, config.max_amount_eth)),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Delay (s)"),
        Cell::new(&format!("{}..={}", config.min_delay_secs, config.max_delay_secs)),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Priority Fee (gwei)"),
        Cell::new(&config.priority_fee_gwei.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("UTC Offset (min)"),
        Cell::new(&config.utc_offset_minutes.to_string()),
    ]));

    table.printstd();
}

pub async fn run(config_path: &Path) -> Result<(), AppError> {
    let ctx = init_context(config_path).await?;
    let config = ctx.config.clone();

    let console_ui = console_ui_enabled();
    if console_ui {
        print_banner();
        print_startup_table(&config);
    }

    let executor = DepositExecutor::new(
        ctx.inbox,
        ctx.oracle,
        config.min_amount_eth,
        config.max_amount_eth,
        config.priority_fee_wei(),
    );

    let pacing = PacingConfig {
        min_per_day: config.min_tx_per_day,
        max_per_day: config.max_tx_per_day,
        min_delay_secs: config.min_delay_secs,
        max_delay_secs: config.max_delay_secs,
        utc_offset_minutes: config.utc_offset_minutes,
    };

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(err) => warn!("Failed to listen for ctrl-c: {err}"),
        }
        shutdown.cancel();
    });

    let mut scheduler = QuotaScheduler::new(pacing, executor, ProgressBarReporter::new(console_ui), SystemClock);
    scheduler.run(&cancel).await
}
