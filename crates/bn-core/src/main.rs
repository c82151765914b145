//! `bn-infer`: posterior queries over XMLBIF Bayesian networks.

use bn_common::{Error, OutputFormat, Posterior};
use bn_core::cli::{evidence_from_pairs, parse_evidence, InferenceReport};
use bn_core::config::{load_config, ConfigSource, ResolvedConfig};
use bn_core::exit_codes::ExitCode;
use bn_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use bn_core::{loader, log_event, BayesianNetwork, Engine, Method};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Exact and approximate inference over boolean Bayesian networks
#[derive(Parser)]
#[command(name = "bn-infer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (default: $BN_CONFIG, then ~/.config/bayesnet/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Decimal places kept in the posterior
    #[arg(long, global = true)]
    precision: Option<u32>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured (or --method) inference method
    Infer(InferArgs),

    /// Exact inference by enumeration
    Enumerate(QueryArgs),

    /// Exact inference by variable elimination
    Eliminate(QueryArgs),

    /// Rejection sampling
    Rejection(SamplingArgs),

    /// Likelihood weighting
    Likelihood(SamplingArgs),

    /// Gibbs sampling (--samples counts sweeps)
    Gibbs(SamplingArgs),

    /// Load and validate a network file
    Check(CheckArgs),

    /// Show the resolved configuration
    Config,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// XMLBIF network file
    #[arg(long, short = 'n')]
    network: PathBuf,

    /// Query variable
    #[arg(long)]
    query: String,

    /// Observed value, NAME=BOOL (repeatable)
    #[arg(long, short = 'e', value_parser = parse_evidence)]
    evidence: Vec<(String, bool)>,
}

#[derive(Args, Debug)]
struct SamplingArgs {
    #[command(flatten)]
    query: QueryArgs,

    /// Number of samples (default from config)
    #[arg(long, short = 's')]
    samples: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct InferArgs {
    #[command(flatten)]
    sampling: SamplingArgs,

    /// Inference method (default from config)
    #[arg(long, short = 'm', value_enum)]
    method: Option<Method>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// XMLBIF network file
    #[arg(long, short = 'n')]
    network: PathBuf,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Success
            };
            let _ = err.print();
            return code.into();
        }
    };

    let log_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(log_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "bn-infer started");

    let exit_code = match run(&cli, &ctx) {
        Ok(code) => code,
        Err(err) => report_error(&cli.global, &err),
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Init,
        "bn-infer finished",
        exit_code = exit_code.as_i32()
    );
    exit_code.into()
}

/// A query request after merging the subcommand with its defaults.
struct Request<'a> {
    method: Option<Method>,
    query: &'a QueryArgs,
    samples: Option<usize>,
    seed: Option<u64>,
}

fn request<'a>(
    method: Option<Method>,
    query: &'a QueryArgs,
    sampling: Option<&SamplingArgs>,
) -> Request<'a> {
    Request {
        method,
        query,
        samples: sampling.and_then(|s| s.samples),
        seed: sampling.and_then(|s| s.seed),
    }
}

fn run(cli: &Cli, ctx: &LogContext) -> Result<ExitCode, Error> {
    match &cli.command {
        Commands::Infer(args) => run_query(
            &cli.global,
            ctx,
            request(args.method, &args.sampling.query, Some(&args.sampling)),
        ),
        Commands::Enumerate(args) => run_query(
            &cli.global,
            ctx,
            request(Some(Method::Enumeration), args, None),
        ),
        Commands::Eliminate(args) => run_query(
            &cli.global,
            ctx,
            request(Some(Method::Elimination), args, None),
        ),
        Commands::Rejection(args) => run_query(
            &cli.global,
            ctx,
            request(Some(Method::Rejection), &args.query, Some(args)),
        ),
        Commands::Likelihood(args) => run_query(
            &cli.global,
            ctx,
            request(Some(Method::LikelihoodWeighting), &args.query, Some(args)),
        ),
        Commands::Gibbs(args) => run_query(
            &cli.global,
            ctx,
            request(Some(Method::Gibbs), &args.query, Some(args)),
        ),
        Commands::Check(args) => run_check(&cli.global, ctx, &args.network),
        Commands::Config => run_config(&cli.global, ctx),
    }
}

fn resolve_config(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedConfig, Error> {
    let resolved = match load_config(global.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(err) => {
            log_event!(
                ctx,
                ERROR,
                event_names::CONFIG_ERROR,
                Stage::Init,
                "configuration rejected",
                error = err.to_string()
            );
            return Err(err);
        }
    };

    if resolved.source == ConfigSource::BuiltinDefault {
        log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Init,
            "no config file, using defaults"
        );
    } else {
        log_event!(
            ctx,
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "configuration loaded",
            source = resolved.source.to_string(),
            path = resolved
                .path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
    }
    Ok(resolved)
}

fn load_network(path: &Path, ctx: &LogContext) -> Result<BayesianNetwork, Error> {
    match loader::load_file(path) {
        Ok(network) => {
            log_event!(
                ctx,
                INFO,
                event_names::NETWORK_LOADED,
                Stage::Load,
                "network loaded",
                network = network.name(),
                variables = network.len()
            );
            Ok(network)
        }
        Err(err) => {
            log_event!(
                ctx,
                WARN,
                event_names::NETWORK_INVALID,
                Stage::Load,
                "network rejected",
                path = path.display().to_string(),
                error = err.to_string()
            );
            Err(err)
        }
    }
}

fn run_query(global: &GlobalOpts, ctx: &LogContext, request: Request<'_>) -> Result<ExitCode, Error> {
    let evidence = match evidence_from_pairs(&request.query.evidence) {
        Ok(evidence) => evidence,
        Err(message) => {
            eprintln!("error: {}", message);
            return Ok(ExitCode::ArgsError);
        }
    };

    let mut config = resolve_config(global, ctx)?.config;
    if let Some(method) = request.method {
        config.method = method;
    }
    if let Some(samples) = request.samples {
        config.samples = samples;
    }
    if let Some(seed) = request.seed {
        config.seed = Some(seed);
    }
    if let Some(precision) = global.precision {
        config.precision = precision;
    }
    config.validate()?;

    let network = load_network(&request.query.network, ctx)?;
    let query = request.query.query.as_str();
    let method = config.method;

    log_event!(
        ctx,
        INFO,
        event_names::INFER_STARTED,
        Stage::Infer,
        "inference started",
        method = method.as_str(),
        query = query,
        evidence = evidence.len()
    );

    let engine = Engine::new(config);
    let posterior = engine.infer(query, &evidence, &network, None)?;

    let config = engine.config();
    let report = InferenceReport {
        run_id: ctx.run_id.clone(),
        generated_at: chrono::Utc::now(),
        network: network.name().to_string(),
        method,
        query: query.to_string(),
        evidence: evidence.into_iter().collect(),
        samples: method.is_sampling().then_some(config.samples),
        seed: if method.is_sampling() { config.seed } else { None },
        posterior,
    };

    match posterior {
        Posterior::Distribution { p_true, p_false } => log_event!(
            ctx,
            INFO,
            event_names::INFER_FINISHED,
            Stage::Infer,
            "inference finished",
            method = method.as_str(),
            p_true = p_true,
            p_false = p_false
        ),
        Posterior::InsufficientSamples => log_event!(
            ctx,
            WARN,
            event_names::INFER_INSUFFICIENT,
            Stage::Infer,
            "no sample matched the evidence",
            method = method.as_str(),
            samples = config.samples
        ),
    }

    match global.format {
        OutputFormat::Text => println!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if posterior.is_insufficient() {
        ExitCode::InsufficientSamples
    } else {
        ExitCode::Success
    })
}

fn run_check(global: &GlobalOpts, ctx: &LogContext, path: &Path) -> Result<ExitCode, Error> {
    let network = load_network(path, ctx)?;

    match global.format {
        OutputFormat::Text => {
            println!(
                "network {}: {} variables, valid",
                network.name(),
                network.len()
            );
            for variable in network.variables() {
                if variable.is_root() {
                    println!("  {}", variable.name());
                } else {
                    println!("  {} <- {}", variable.name(), variable.parents().join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "run_id": ctx.run_id,
                "valid": true,
                "network": network,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(ExitCode::Success)
}

fn run_config(global: &GlobalOpts, ctx: &LogContext) -> Result<ExitCode, Error> {
    let mut resolved = resolve_config(global, ctx)?;
    if let Some(precision) = global.precision {
        resolved.config.precision = precision;
        resolved.config.validate()?;
    }

    match global.format {
        OutputFormat::Text => {
            match &resolved.path {
                Some(path) => println!("# source: {} ({})", resolved.source, path.display()),
                None => println!("# source: {}", resolved.source),
            }
            print!("{}", resolved.config.to_toml()?);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
    }
    Ok(ExitCode::Success)
}

fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let code = ExitCode::from(err);
    match global.format {
        OutputFormat::Text => {
            eprintln!("error: {}", err);
            eprintln!("hint: {}", err.remediation());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "error": {
                    "code": err.code(),
                    "category": err.category(),
                    "message": err.to_string(),
                    "remediation": err.remediation(),
                    "exit_code": code.code_name(),
                }
            });
            println!("{}", output);
        }
    }
    code
}
