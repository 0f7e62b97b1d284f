use clap::{Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::{Path, PathBuf};
use vpc_subnet_reconciler::config::ProviderConfig;
use vpc_subnet_reconciler::{
    open_scope, teardown_summary, HttpNetworkClient, StateScope, SubnetService,
};

const LOG_CONFIG_FILE: &str = "log4rs.yml";

#[derive(Parser)]
#[command(name = "vpc-subnet-reconciler")]
#[command(about = "Converge or tear down the subnet of a cluster VPC")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cluster state file
    #[arg(short, long, global = true, env = "SUBNET_STATE_FILE", default_value = "cluster-state.json")]
    state: PathBuf,

    /// VPC ID (overrides the one in the state file)
    #[arg(long, global = true, env = "VPC_ID")]
    vpc_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the VPC's subnet if it has none and record it
    Reconcile,
    /// Delete every subnet of the VPC
    Delete,
    /// Print the recorded state
    Show,
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    if Path::new(LOG_CONFIG_FILE).exists() {
        log4rs::init_file(LOG_CONFIG_FILE, Default::default())?;
        return Ok(());
    }
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l:5})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    if let Err(e) = run() {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    init_logging()?;
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    log::info!("#Start {}", cli.state.display());

    let mut scope = open_scope(&cli.state, cli.vpc_id.as_deref())?;

    match cli.command {
        Commands::Reconcile => {
            let service = subnet_service()?;
            service.reconcile_subnets(&mut scope)?;
            for subnet in &scope.state().subnets {
                println!(
                    "{} {} {} gw={} vpc={}",
                    "subnet".green(),
                    subnet.id,
                    subnet.cidr,
                    subnet.gateway_ip,
                    subnet.network_id
                );
            }
        }
        Commands::Delete => {
            let service = subnet_service()?;
            service.delete_subnets(&scope)?;
            println!("{}", teardown_summary(scope.owning_network()).green());
        }
        Commands::Show => {
            println!("{}", serde_json::to_string_pretty(scope.state())?);
        }
    }

    Ok(())
}

fn subnet_service() -> Result<SubnetService<HttpNetworkClient>, Box<dyn Error>> {
    let config = ProviderConfig::from_env()?;
    let client = HttpNetworkClient::new(&config)?;
    Ok(SubnetService::new(client))
}
