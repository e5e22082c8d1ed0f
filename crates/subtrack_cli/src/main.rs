//! Command-line front end for the SubTrack API.
//!
//! # Responsibility
//! - Drive a `SubscriptionBoard` against a running server.
//! - Print the list, the monthly total and its cost level.

mod api;

use anyhow::{anyhow, bail, Context, Result};
use api::HttpSubscriptionApi;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use subtrack_core::{
    demo_subscriptions, format_amount, format_timestamp, init_stderr_logging, ClientError,
    SubscriptionApi, SubscriptionBoard, SubscriptionId,
};

#[derive(Debug, Parser)]
#[command(name = "subtrack", version, about = "Track recurring subscriptions")]
struct Cli {
    /// Base URL of the SubTrack server.
    #[arg(
        long,
        env = "SUBTRACK_API_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    api_url: String,
    /// Log level for client diagnostics on stderr.
    #[arg(long, default_value = "error")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List subscriptions, newest first, with the monthly total.
    List,
    /// Create a subscription.
    Add(AddArgs),
    /// Change fields of an existing subscription.
    Edit(EditArgs),
    /// Delete a subscription.
    Remove { id: SubscriptionId },
    /// Print the monthly-equivalent total.
    Total,
    /// Create the demo subscriptions.
    Seed,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: String,
    #[arg(long, default_value = "monthly")]
    cycle: String,
    /// Start date as `YYYY-MM-DD`.
    #[arg(long)]
    start_date: String,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: SubscriptionId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    cycle: Option<String>,
    #[arg(long)]
    start_date: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_stderr_logging(&cli.log_level).map_err(|err| anyhow!(err))?;

    let mut board = SubscriptionBoard::new(HttpSubscriptionApi::new(&cli.api_url));
    match cli.command {
        Command::List => {
            board.refresh().map_err(user_error)?;
            print_list(&board);
        }
        Command::Add(args) => {
            let draft = board.draft_mut();
            draft.name = args.name;
            draft.price = args.price;
            draft.cycle = args.cycle;
            draft.start_date = args.start_date;
            let created = board.submit().map_err(user_error)?;
            println!("created #{} {}", created.id, created.name);
            print_list(&board);
        }
        Command::Edit(args) => {
            board.refresh().map_err(user_error)?;
            if !board.begin_edit(args.id) {
                bail!("subscription {} not found", args.id);
            }
            let draft = board.draft_mut();
            if let Some(name) = args.name {
                draft.name = name;
            }
            if let Some(price) = args.price {
                draft.price = price;
            }
            if let Some(cycle) = args.cycle {
                draft.cycle = cycle;
            }
            if let Some(start_date) = args.start_date {
                draft.start_date = start_date;
            }
            let updated = board.submit().map_err(user_error)?;
            println!("updated #{} {}", updated.id, updated.name);
            print_list(&board);
        }
        Command::Remove { id } => {
            let removed = board.remove(id).map_err(user_error)?;
            println!("removed #{} {}", removed.id, removed.name);
            print_list(&board);
        }
        Command::Total => {
            board.refresh().map_err(user_error)?;
            print_total(&board);
        }
        Command::Seed => {
            let rows = demo_subscriptions().context("demo rows are invalid")?;
            for row in &rows {
                let body = json!({
                    "name": row.name,
                    "price": row.price,
                    "cycle": row.cycle,
                    "startDate": format_timestamp(&row.start_date),
                });
                board.api().create(&body).map_err(user_error)?;
            }
            println!("seeded {} subscriptions", rows.len());
            board.refresh().map_err(user_error)?;
            print_list(&board);
        }
    }

    Ok(())
}

fn print_list<A: SubscriptionApi>(board: &SubscriptionBoard<A>) {
    if board.subscriptions().is_empty() {
        println!("no subscriptions");
    }
    for item in board.subscriptions() {
        println!(
            "#{:<4} {:<24} {:>10} {:<8} since {}{}",
            item.id,
            item.name,
            format_amount(item.price),
            item.cycle,
            item.start_date.format("%Y-%m-%d"),
            if item.active { "" } else { " (inactive)" }
        );
    }
    print_total(board);
}

fn print_total<A: SubscriptionApi>(board: &SubscriptionBoard<A>) {
    println!(
        "monthly total: {} ({})",
        format_amount(board.monthly_total()),
        board.cost_level().as_str()
    );
}

fn user_error(err: ClientError) -> anyhow::Error {
    let message = err.user_message().to_string();
    anyhow::Error::new(err).context(message)
}
