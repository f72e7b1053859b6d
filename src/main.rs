//! Operator CLI for producing and checking frontend deployment
//! configuration files.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use todo_stack_config::cloudformation::StackOutputsFetcher;
use todo_stack_config::render;
use todo_stack_config::{ConfigError, ConfigField, DeploymentConfig, Environment, StackOutputs};

#[derive(Parser)]
#[command(name = "todo-stack-config")]
#[command(about = "Produce and check the todo frontend deployment configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the embedded configuration of a deployed environment
    Show {
        /// Environment to print (demo, prod)
        #[arg(short, long, default_value = "prod")]
        environment: Environment,

        #[arg(long, value_enum, default_value = "js")]
        format: Format,
    },

    /// Build a configuration from stack outputs and print or write it
    Generate {
        #[command(flatten)]
        source: OutputsSource,

        /// AWS region of the stack (with --stack)
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,

        #[arg(long, value_enum, default_value = "js")]
        format: Format,

        /// Write to this path instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Report which configuration fields the stack outputs resolve
    Check {
        #[command(flatten)]
        source: OutputsSource,

        /// AWS region of the stack (with --stack)
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,
    },
}

/// Where the stack outputs come from: a JSON file or a live stack.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct OutputsSource {
    /// Stack outputs JSON file: a describe-stacks document, its
    /// Outputs[] array, or `pulumi stack output --json`
    #[arg(long, value_name = "FILE")]
    outputs: Option<PathBuf>,

    /// Fetch outputs live from this CloudFormation stack
    #[arg(long, env = "TODO_STACK_NAME", value_name = "NAME")]
    stack: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Frontend `config.js` module
    Js,
    /// Plain JSON object
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Show {
            environment,
            format,
        } => {
            let config = DeploymentConfig::for_environment(environment);
            print!("{}", rendered(&config, format)?);
            Ok(())
        }
        Commands::Generate {
            source,
            region,
            format,
            output,
        } => {
            let outputs = load_outputs(&source, region).await?;
            let config = outputs.to_config()?;
            let contents = rendered(&config, format)?;
            match output {
                Some(path) => {
                    render::write_config_file(&path, &contents)?;
                    println!("wrote {}", path.display());
                }
                None => print!("{contents}"),
            }
            Ok(())
        }
        Commands::Check { source, region } => check(&source, region).await,
    }
}

fn rendered(config: &DeploymentConfig, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Js => render::render_js(config),
        Format::Json => render::render_json(config)?,
    })
}

async fn load_outputs(
    source: &OutputsSource,
    region: Option<String>,
) -> anyhow::Result<StackOutputs> {
    if let Some(path) = &source.outputs {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return Ok(StackOutputs::from_json(&json)?);
    }

    // clap guarantees exactly one source is set.
    let Some(stack_name) = source.stack.as_deref() else {
        anyhow::bail!("either --outputs or --stack is required");
    };
    let fetcher = StackOutputsFetcher::new(region).await;
    Ok(fetcher.fetch(stack_name).await?)
}

async fn check(source: &OutputsSource, region: Option<String>) -> anyhow::Result<()> {
    let outputs = load_outputs(source, region).await?;
    println!("{} stack output(s) loaded", outputs.len());

    let mut unresolved = 0;
    for field in ConfigField::ALL {
        match outputs.resolve_entry(field) {
            Ok(entry) => {
                println!("  ok    {:<30} {} = {}", field.key(), entry.key, entry.value);
            }
            Err(ConfigError::MissingOutput { tried, .. }) => {
                unresolved += 1;
                println!("  MISS  {:<30} tried: {tried}", field.key());
            }
            Err(e) => {
                unresolved += 1;
                println!("  FAIL  {:<30} {e}", field.key());
            }
        }
    }

    if unresolved > 0 {
        anyhow::bail!("{unresolved} configuration field(s) unresolved");
    }
    println!("all configuration fields resolved");
    Ok(())
}
