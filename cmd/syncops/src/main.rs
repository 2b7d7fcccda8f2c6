//! SyncOps CLI - storage lifecycle policies for video production.
//!
//! Commands:
//! - `syncops init` - Write starter policies and a sample inventory
//! - `syncops templates` - List or print policy templates
//! - `syncops validate` - Validate a policy set
//! - `syncops evaluate` - Resolve an inventory against a policy set
//! - `syncops run` - Run one policy now, or every policy that is due
//! - `syncops explain` - Generate a Markdown report of a policy set
//! - `syncops cost` - Show storage cost by tier
//! - `syncops schema` - Print JSON Schemas for the file formats

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use lifecycle_policy::StorageTier;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "syncops")]
#[command(about = "Storage lifecycle policy engine for video production")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "SYNCOPS_VERBOSE")]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text", env = "SYNCOPS_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a policy workspace from the template library
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: String,

        /// Organization the policies belong to
        #[arg(long, default_value = "default", env = "SYNCOPS_ORG")]
        org: String,

        /// Number of sample assets to generate
        #[arg(long, default_value_t = 200)]
        assets: usize,

        /// Seed for the sample inventory
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// List templates, or print one as YAML
    Templates {
        /// Template id to print
        id: Option<String>,
    },

    /// Validate every policy and lint the set
    Validate {
        /// Policy file (.yaml/.json) or policy directory
        #[arg(short, long, default_value = "policies.yaml", env = "SYNCOPS_POLICIES")]
        policies: String,

        /// Fail on warnings (not just errors)
        #[arg(long)]
        strict: bool,
    },

    /// Resolve each asset against the policy set
    Evaluate {
        /// Policy file (.yaml/.json) or policy directory
        #[arg(short, long, default_value = "policies.yaml", env = "SYNCOPS_POLICIES")]
        policies: String,

        /// Asset inventory (.json/.csv)
        #[arg(short, long, default_value = "inventory.json", env = "SYNCOPS_INVENTORY")]
        inventory: String,

        /// Print every decision as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Explain how one asset was resolved
        #[arg(long)]
        asset: Option<String>,

        /// Parallel evaluation tasks
        #[arg(long, env = "SYNCOPS_CONCURRENCY")]
        concurrency: Option<usize>,
    },

    /// Run one policy now, or every active policy that is due
    Run {
        /// Policy file (.yaml/.json) or policy directory
        #[arg(short, long, default_value = "policies.yaml", env = "SYNCOPS_POLICIES")]
        policies: String,

        /// Asset inventory (.json/.csv)
        #[arg(short, long, default_value = "inventory.json", env = "SYNCOPS_INVENTORY")]
        inventory: String,

        /// Run this policy (id or name) now instead of the schedule
        #[arg(long)]
        policy: Option<String>,

        /// Evaluate and report without applying actions
        #[arg(long, env = "SYNCOPS_DRY_RUN")]
        dry_run: bool,

        /// Asset ids held open by an editing session
        #[arg(long, value_delimiter = ',')]
        busy: Vec<String>,

        /// Parallel evaluation tasks
        #[arg(long, env = "SYNCOPS_CONCURRENCY")]
        concurrency: Option<usize>,

        /// Write advanced schedules back to the policy source
        #[arg(long)]
        save_schedules: bool,
    },

    /// Generate a Markdown report explaining the policy set
    Explain {
        /// Policy file (.yaml/.json) or policy directory
        #[arg(short, long, default_value = "policies.yaml", env = "SYNCOPS_POLICIES")]
        policies: String,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show monthly storage cost by tier
    Cost {
        /// Asset inventory (.json/.csv)
        #[arg(short, long, default_value = "inventory.json", env = "SYNCOPS_INVENTORY")]
        inventory: String,

        /// Also show savings of moving everything to this tier
        #[arg(long)]
        to: Option<StorageTier>,
    },

    /// Print the JSON Schema of a file format
    Schema {
        /// Which document to describe
        #[arg(value_enum, default_value = "policy")]
        target: commands::schema::Target,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output can be piped
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env("SYNCOPS_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    match cli.command {
        Commands::Init {
            path,
            org,
            assets,
            seed,
        } => commands::init::run(&path, &org, assets, seed),
        Commands::Templates { id } => commands::templates::run(id.as_deref()),
        Commands::Validate { policies, strict } => commands::validate::run(&policies, strict),
        Commands::Evaluate {
            policies,
            inventory,
            json,
            asset,
            concurrency,
        } => {
            commands::evaluate::run(&policies, &inventory, json, asset.as_deref(), concurrency)
                .await
        }
        Commands::Run {
            policies,
            inventory,
            policy,
            dry_run,
            busy,
            concurrency,
            save_schedules,
        } => {
            let options = commands::run::RunOptions {
                target: policy,
                dry_run,
                busy,
                concurrency,
                save_schedules,
            };
            commands::run::run(&policies, &inventory, options).await
        }
        Commands::Explain { policies, output } => {
            commands::explain::run(&policies, output.as_deref())
        }
        Commands::Cost { inventory, to } => commands::cost::run(&inventory, to),
        Commands::Schema { target } => commands::schema::run(target),
    }
}
