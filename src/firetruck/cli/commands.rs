//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin for the REPL)
//! - Installs the `tracing` subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with API and configuration
//! - `handle_*()`: Per-command handlers that call API and format output

use super::print::{contract_details, listing_lines, print_lines, print_messages};
use super::repl;
use super::setup::{
    Cli, Commands, ContractCommands, MigrationCommands, MiscCommands, QueryCommands,
};
use clap::Parser;
use firetruck::api::{ConfigAction, FiretruckApi, Migration};
use firetruck::commands::CmdResult;
use firetruck::error::Result;
use firetruck::init::{initialize, Overrides};
use firetruck::remote::http::HttpService;
use firetruck::render::render_value;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: FiretruckApi<HttpService>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Contracts(cmd)) => match cmd {
            ContractCommands::Count => handle_count(&ctx),
            ContractCommands::List => handle_list(&ctx),
            ContractCommands::ListByEventCount => {
                handle_listing(ctx.api.list_by_event_count()?)
            }
            ContractCommands::ListByLatestTimestamp => {
                handle_listing(ctx.api.list_by_latest_timestamp()?)
            }
            ContractCommands::Contract { id } => handle_contract(&ctx, &id),
            ContractCommands::Residual { id, simplify } => handle_residual(&ctx, &id, simplify),
        },
        Some(Commands::Query(cmd)) => match cmd {
            QueryCommands::Report {
                expression,
                id,
                values,
            } => handle_report(&ctx, &expression, id.as_deref(), &values),
            QueryCommands::Repl { id } => handle_repl(&ctx, id.as_deref()),
        },
        Some(Commands::Migration(cmd)) => match cmd {
            MigrationCommands::Migrate {
                source_id,
                target_id,
                csl,
            } => handle_migrate(&ctx, &source_id, &target_id, &csl, Migration::Plain),
            MigrationCommands::MigrateKeyLocation {
                source_id,
                target_id,
                csl,
            } => handle_migrate(
                &ctx,
                &source_id,
                &target_id,
                &csl,
                Migration::AddEmptyKeyLocation,
            ),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Declaration { id } => handle_declaration(&ctx, &id),
            MiscCommands::Instantiate {
                declaration_id,
                name,
                entry_point,
                args,
                peers,
            } => handle_instantiate(&ctx, &declaration_id, &name, &entry_point, &args, peers),
            MiscCommands::Config { key, value } => handle_config(&ctx, key, value),
        },
        None => handle_list(&ctx),
    }
}

/// Logs go to stderr. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let overrides = Overrides {
        service_url: cli.service.clone(),
        target_service_url: cli.target_service.clone(),
    };
    let ctx = initialize(&overrides)?;
    Ok(AppContext { api: ctx.api })
}

fn handle_count(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.count_contracts()?;
    if let Some(count) = result.contract_count {
        println!("{}", count);
    }
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_contracts()?;
    print_lines(&result.contract_ids);
    Ok(())
}

fn handle_listing(result: CmdResult) -> Result<()> {
    if let Some(listing) = &result.listing {
        print_lines(&listing_lines(listing));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_contract(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.contract_info(id)?;
    if let (Some(contract), Some(count)) = (&result.contract, result.event_count) {
        println!("{}", contract_details(contract, count)?);
    }
    Ok(())
}

fn handle_residual(ctx: &AppContext, id: &str, simplify: bool) -> Result<()> {
    let result = ctx.api.residual(id, simplify)?;
    print_source(&result);
    Ok(())
}

fn handle_declaration(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.declaration(id)?;
    print_source(&result);
    Ok(())
}

fn print_source(result: &CmdResult) {
    if let Some(source) = &result.source {
        println!("{}", source);
    }
}

fn handle_report(
    ctx: &AppContext,
    expression: &str,
    id: Option<&str>,
    values: &[String],
) -> Result<()> {
    let result = ctx.api.report(expression, id, values)?;
    if let Some(value) = &result.value {
        println!("{}", render_value(value));
    }
    Ok(())
}

fn handle_repl(ctx: &AppContext, id: Option<&str>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    repl::run(stdin.lock(), &mut stdout, &mut stderr, |expression| -> Result<String> {
        let result = ctx.api.report::<&str>(expression, id, &[])?;
        Ok(result.value.as_ref().map(render_value).unwrap_or_default())
    })?;
    Ok(())
}

fn handle_migrate(
    ctx: &AppContext,
    source_id: &str,
    target_id: &str,
    events_expression: &str,
    migration: Migration,
) -> Result<()> {
    let result = ctx
        .api
        .migrate(source_id, target_id, events_expression, migration)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_instantiate(
    ctx: &AppContext,
    declaration_id: &str,
    name: &str,
    entry_point: &str,
    args: &[String],
    peers: Vec<String>,
) -> Result<()> {
    let result = ctx
        .api
        .instantiate(declaration_id, name, entry_point, args, peers)?;
    print_lines(&result.contract_ids);
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key.clone(), value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;

    if key.is_none() {
        if let Some(config) = &result.config {
            for (k, v) in config.list_all() {
                println!("{} = {}", k, v);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}
