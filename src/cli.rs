use clap::{Args, Parser, Subcommand};
use ibkr_broker::{
    Direction, Gateway, OrderTicket, OrderType, Shares, Symbol, TimeInForce, ValidationError,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::batch::{BatchRunner, FailureMode};
use crate::env::Env;
use crate::operation::{OperationKind, place_order};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read batch input from {path}: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Batch input must be a JSON array of items or a single item object: {0}")]
    InvalidInput(#[source] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "ibkr-bridge")]
#[command(about = "Health checks, positions and stock orders through an IBKR Client Portal gateway")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub env: Env,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the gateway is up and the session is authenticated
    Health,
    /// List the positions held in the account
    Positions,
    /// Buy shares of a stock
    Buy(OrderArgs),
    /// Sell shares of a stock
    Sell(OrderArgs),
    /// Run a JSON array of workflow items, one operation per item
    Batch {
        /// Path to the JSON input, or - for stdin
        #[arg(short = 'i', long = "input")]
        input: PathBuf,
        /// Operation for items without an `operation` field
        /// (healthCheck, listPositions, buyStock, sellStock)
        #[arg(long = "operation")]
        operation: Option<OperationKind>,
        /// Record failed items as errors and keep going
        #[arg(long, env = "CONTINUE_ON_FAIL", default_value = "false")]
        continue_on_fail: bool,
    },
}

#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Stock ticker symbol (e.g., AAPL, TSLA)
    #[arg(short = 's', long = "symbol")]
    pub symbol: String,
    /// Number of shares
    #[arg(short = 'q', long = "quantity", default_value = "1")]
    pub quantity: Decimal,
    /// MKT, LMT, STP or "STP LMT"
    #[arg(short = 't', long = "order-type", default_value = "MKT")]
    pub order_type: OrderType,
    #[arg(long = "limit-price")]
    pub limit_price: Option<Decimal>,
    #[arg(long = "stop-price")]
    pub stop_price: Option<Decimal>,
    /// DAY, GTC, IOC or FOK
    #[arg(long = "tif", default_value = "DAY")]
    pub time_in_force: TimeInForce,
}

impl OrderArgs {
    fn into_ticket(self, side: Direction) -> Result<OrderTicket, ValidationError> {
        Ok(OrderTicket {
            side,
            symbol: Symbol::new(&self.symbol)?,
            quantity: Shares::new(self.quantity)?,
            order_type: self.order_type,
            limit_price: self.limit_price,
            stop_price: self.stop_price,
            time_in_force: self.time_in_force,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let gateway = cli.env.get_gateway()?;
    run_command_with_writers(gateway.as_ref(), cli.command, &mut std::io::stdout()).await
}

pub async fn run_command_with_writers<G: Gateway + ?Sized, W: Write>(
    gateway: &G,
    command: Commands,
    stdout: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Health => {
            let health = gateway.check_health().await;
            if !health.is_healthy() {
                warn!("Gateway is not healthy");
            }
            write_json(stdout, &health)?;
        }
        Commands::Positions => {
            let positions = gateway.list_positions().await?;
            write_json(stdout, &positions)?;
        }
        Commands::Buy(args) => {
            let result = place_order(gateway, args.into_ticket(Direction::Buy)?).await?;
            write_json(stdout, &result)?;
        }
        Commands::Sell(args) => {
            let result = place_order(gateway, args.into_ticket(Direction::Sell)?).await?;
            write_json(stdout, &result)?;
        }
        Commands::Batch {
            input,
            operation,
            continue_on_fail,
        } => {
            let items = read_items(&input)?;
            info!("Running batch of {} items from {}", items.len(), input.display());

            let failure_mode = FailureMode::from_continue_on_fail(continue_on_fail);
            let records = BatchRunner::new(gateway, failure_mode)
                .with_default_operation(operation)
                .run(&items)
                .await?;
            write_json(stdout, &records)?;
        }
    }

    Ok(())
}

fn write_json<W: Write, T: Serialize>(stdout: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn read_items(input: &Path) -> Result<Vec<Value>, CliError> {
    let read_error = |source| CliError::ReadInput {
        path: input.display().to_string(),
        source,
    };

    let mut text = String::new();
    if input == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(read_error)?;
    } else {
        text = std::fs::read_to_string(input).map_err(read_error)?;
    }

    parse_items(&text)
}

/// Accepts either an array of items or one bare item object.
fn parse_items(text: &str) -> Result<Vec<Value>, CliError> {
    match serde_json::from_str(text).map_err(CliError::InvalidInput)? {
        Value::Array(items) => Ok(items),
        item @ Value::Object(_) => Ok(vec![item]),
        other => Err(CliError::InvalidInput(serde::de::Error::custom(format!(
            "expected an array or object, got {other}"
        )))),
    }
}
