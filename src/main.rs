use clap::{Parser, Subcommand};
use galaxy::{
    render, run_demo, DemoApp, EnvironmentSettings, QueryEncoding, RunnerConfiguration,
    StatusPolicy, Variant,
};
use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    process,
    sync::Arc,
};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8881;

#[derive(Debug, Parser)]
#[command(
    name = "hello-galaxy",
    version,
    about = "Walks a database's REST interface and logs every response"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Base URL of the REST service, optionally with user:password@
    #[arg(long, env = "BASE_URL", global = true)]
    base_url: Option<String>,

    /// Operations to run: full or basic
    #[arg(long, default_value = "full", global = true)]
    variant: Variant,

    /// How JSON query values go on the wire: percent or raw
    #[arg(long, default_value = "percent", global = true)]
    query_encoding: QueryEncoding,

    /// Stop the run at the first 4xx/5xx response
    #[arg(long, global = true)]
    fail_on_status: bool,

    /// Write every run's interactions to this markdown file
    #[arg(long, global = true)]
    transcript: Option<PathBuf>,

    /// Keep the transcript and warn if a run issues a different request sequence
    #[arg(long, global = true, requires = "transcript")]
    check_transcript: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the landing page and /databasetest (default)
    Serve {
        /// Port to listen on; falls back to VCAP_APP_PORT, PORT, then 8881
        #[arg(long)]
        port: Option<u16>,

        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
    },
    /// Run the database test once and print the log
    Run,
}

fn port_from_env() -> Option<u16> {
    ["VCAP_APP_PORT", "PORT"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find_map(|value| value.parse().ok())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut configuration = RunnerConfiguration::new(cli.variant);
    configuration.set_query_encoding(cli.query_encoding);
    if cli.fail_on_status {
        configuration.set_status_policy(StatusPolicy::FailOnError);
    }
    if let Some(transcript) = cli.transcript {
        configuration.set_transcript_path(transcript);
    }
    configuration.set_check_transcript(cli.check_transcript);

    let mut settings = EnvironmentSettings::from_env();
    if cli.base_url.is_some() {
        settings.base_url = cli.base_url;
    }

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        host: IpAddr::from([0, 0, 0, 0]),
    }) {
        Command::Serve { port, host } => {
            let port = port.or_else(port_from_env).unwrap_or(DEFAULT_PORT);
            let app = Arc::new(DemoApp::new(configuration, settings));

            galaxy::serve(SocketAddr::new(host, port), app, async {
                if let Err(e) = signal::ctrl_c().await {
                    warn!(error = %e, "couldn't listen for ctrl-c");
                }
                info!("shutting down");
            })
            .await?;
        }
        Command::Run => {
            let log = run_demo(&configuration, &settings).await;
            println!("{}", render::render(log.entries()).console);

            if log.is_aborted() {
                process::exit(1);
            }
        }
    }

    Ok(())
}
