use clap::{Parser, Subcommand};
use firetruck::commands::EVENTS_EXPRESSION;

#[derive(Parser, Debug)]
#[command(name = "ft", bin_name = "ft", version)]
#[command(about = "Query, inspect and migrate contracts on a contract service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the contract service
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub service: Option<String>,

    /// Base URL migrations write to (defaults to the service URL)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub target_service: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Contracts(ContractCommands),

    #[command(flatten)]
    Query(QueryCommands),

    #[command(flatten)]
    Migration(MigrationCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum ContractCommands {
    /// Print the number of contracts
    #[command(display_order = 1)]
    Count,

    /// List contract ids
    #[command(alias = "ls", display_order = 2)]
    List,

    /// List contracts sorted by number of applied events
    #[command(alias = "lsc", display_order = 3)]
    ListByEventCount,

    /// List contracts sorted by the timestamp of their last event
    #[command(alias = "lst", display_order = 4)]
    ListByLatestTimestamp,

    /// Show a contract and its number of applied events
    #[command(alias = "c", display_order = 5)]
    Contract { id: String },

    /// Print the residual source of a contract
    #[command(alias = "r", display_order = 6)]
    Residual {
        id: String,

        /// Simplify the residual before printing it
        #[arg(short, long)]
        simplify: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// Evaluate a report expression, on one contract or globally
    #[command(alias = "rp", display_order = 10)]
    Report {
        /// Report expression
        expression: String,

        /// Contract to evaluate on (global report if omitted)
        id: Option<String>,

        /// Report argument, as a JSON-encoded value (repeatable)
        #[arg(long = "value", value_name = "JSON")]
        values: Vec<String>,
    },

    /// Read report expressions from stdin and print each result
    #[command(display_order = 11)]
    Repl {
        /// Contract to evaluate on (global reports if omitted)
        id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MigrationCommands {
    /// Replay the events of one contract onto a fresh one
    #[command(display_order = 20)]
    Migrate {
        source_id: String,
        target_id: String,

        /// Expression that extracts the events of the source contract
        #[arg(long, value_name = "EXPR", default_value = EVENTS_EXPRESSION)]
        csl: String,
    },

    /// Like migrate, giving AcceptCarShare events an empty keyLocation
    #[command(
        name = "migrateKeyLocation",
        alias = "migrate-key-location",
        display_order = 21
    )]
    MigrateKeyLocation {
        source_id: String,
        target_id: String,

        /// Expression that extracts the events of the source contract
        #[arg(long, value_name = "EXPR", default_value = EVENTS_EXPRESSION)]
        csl: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Print the source of a declaration
    #[command(display_order = 30)]
    Declaration { id: String },

    /// Create a contract from a declaration
    #[command(display_order = 31)]
    Instantiate {
        declaration_id: String,
        name: String,

        /// Qualified name of the entry point (e.g. Module::main)
        #[arg(long, value_name = "NAME")]
        entry_point: String,

        /// Declaration argument, as a JSON-encoded value (repeatable)
        #[arg(long = "arg", value_name = "JSON")]
        args: Vec<String>,

        /// Peer contract id (repeatable)
        #[arg(long = "peer", value_name = "ID")]
        peers: Vec<String>,
    },

    /// Get or set configuration
    #[command(display_order = 32)]
    Config {
        /// Configuration key (e.g., service-url)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
