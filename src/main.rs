use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use proxyscan::{
    ClientConfig, Networksetup, ProxyClient, ProxyFilter, ProxyType,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fetch, verify, export and apply proxies from proxyscan.io
#[derive(Parser)]
#[command(name = "proxyscan")]
#[command(about = "Fetch, verify, export and apply proxies from proxyscan.io")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Proxy protocol (http, https, socks4, socks5)
    #[arg(short = 't', long)]
    proxy_type: Option<String>,
    /// ISO country code to search in
    #[arg(short, long)]
    country: Option<String>,
    /// Anonymity level (transparent, anonymous, elite)
    #[arg(short, long)]
    level: Option<String>,
    /// Skip checking candidates' workability
    #[arg(long)]
    no_verify: bool,
    /// How many candidates verification may discard before giving up
    #[arg(long, default_value = "20")]
    retries: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a single proxy and print its URL
    Fetch {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch multiple proxies and print one URL per line
    List {
        /// Number of proxies to fetch
        count: usize,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch multiple proxies and write them to a CSV file
    Export {
        /// Number of proxies to fetch
        count: usize,
        /// Output CSV file
        #[arg(short, long, default_value = "proxies.csv")]
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch a proxy and set it as the system proxy
    Connect {
        #[command(flatten)]
        filter: FilterArgs,
        /// Network service to configure
        #[arg(long, default_value = "Wi-Fi")]
        service: String,
    },
    /// Turn the system proxy off
    Disconnect {
        /// Proxy protocol to turn off; all of them when omitted
        #[arg(short = 't', long)]
        proxy_type: Option<String>,
        /// Network service to configure
        #[arg(long, default_value = "Wi-Fi")]
        service: String,
    },
}

fn build_filter(args: &FilterArgs) -> Result<ProxyFilter> {
    let mut filter = ProxyFilter::new();
    if let Some(proxy_type) = &args.proxy_type {
        filter = filter.with_proxy_type(proxy_type.parse::<ProxyType>()?);
    }
    if let Some(country) = &args.country {
        filter = filter.with_country(country.clone());
    }
    if let Some(level) = &args.level {
        filter = filter.with_level(level.clone());
    }
    Ok(filter)
}

fn build_client(args: &FilterArgs) -> Result<ProxyClient> {
    let config = ClientConfig::new().with_max_probe_retries(args.retries);
    Ok(ProxyClient::with_config(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { filter } => {
            let client = build_client(&filter)?;
            let record = client
                .fetch_one(&build_filter(&filter)?, !filter.no_verify)
                .await?;
            println!("{}", record.url());
        }
        Commands::List { count, filter } => {
            let client = build_client(&filter)?;
            let records = client
                .fetch_many(count, &build_filter(&filter)?, !filter.no_verify)
                .await?;
            for record in &records {
                println!("{}", record.url());
            }
        }
        Commands::Export {
            count,
            output,
            filter,
        } => {
            let client = build_client(&filter)?;
            let records = client
                .export_csv(count, &build_filter(&filter)?, !filter.no_verify, &output)
                .await?;
            println!("Saved {} proxies to {:?}", records.len(), output);
        }
        Commands::Connect { filter, service } => {
            let client = build_client(&filter)?;
            let configurator = Networksetup::new(service);
            let record = client
                .apply(&build_filter(&filter)?, !filter.no_verify, &configurator)
                .await?;
            println!("Successfully connected to {}", record.url());
        }
        Commands::Disconnect {
            proxy_type,
            service,
        } => {
            let kind = proxy_type
                .as_deref()
                .map(str::parse::<ProxyType>)
                .transpose()?;
            let configurator = Networksetup::new(service);
            proxyscan::clear_proxy(&configurator, kind)?;
            println!("Successfully disconnected");
        }
    }

    Ok(())
}
