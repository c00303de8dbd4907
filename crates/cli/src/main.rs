use clap::{ArgAction, Parser};
use ferrous_dnsq_application::use_cases::{QueryResult, ResolutionContext};
use ferrous_dnsq_domain::CliOverrides;
use ferrous_dnsq_infrastructure::dns::{HickoryWireCodec, ValidatingStubEngine};
use tracing::{debug, info};

mod bootstrap;
mod output;

#[derive(Parser)]
#[command(name = "ferrous-dnsq")]
#[command(version)]
#[command(about = "Ferrous DNSQ - DNSSEC-validating DNS lookup")]
struct Cli {
    /// Domain name to look up
    qname: String,

    /// Record type (A, AAAA, MX, TXT, TYPE65534, ...)
    qtype: String,

    /// Print the full response message after the summary
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Resolver configuration listing the upstream nameservers
    #[arg(long, value_name = "FILE")]
    resolv_conf: Option<String>,

    /// DNSKEY trust anchor in presentation format; replaces the configured list
    #[arg(long = "trust-anchor", value_name = "RECORD")]
    trust_anchors: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        resolv_conf: cli.resolv_conf.clone(),
        trust_anchors: cli.trust_anchors.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config, cli.log_level.is_some());

    debug!(
        resolv_conf = %config.resolver.resolv_conf,
        trust_anchors = config.trust_anchors.anchors.len(),
        "Configuration loaded"
    );

    let engine = ValidatingStubEngine::new(&config.resolver)?;
    let context = ResolutionContext::setup(
        engine,
        &config.resolver.resolv_conf,
        &config.trust_anchors.anchors,
    )?;

    let codec = HickoryWireCodec::new();
    let result = QueryResult::resolve(&context, &codec, &cli.qname, &cli.qtype)?;
    info!("{}", result);

    print!("{}", output::render(&result, cli.verbose > 0));
    Ok(())
}
