//! CLI entrypoint for health-crew
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use health_crew_application::{
    ConversationLogger, ExecutePipelineUseCase, NoProgress, PipelineExecutor, ProgressNotifier,
    RunConsultationUseCase,
};
use health_crew_domain::has_errors;
use health_crew_infrastructure::config::FileLoggingConfig;
use health_crew_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LocalToolExecutor, build_gateway,
};
use health_crew_presentation::{
    AppState, Cli, Command, ConsoleFormatter, ConsultArgs, PartialRequest, ProgressReporter,
    ServeArgs, SimpleProgress, TerminalForm, fill_request,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }

    if cli.show_config {
        let explicit = cli.config.as_deref().filter(|_| !cli.no_config);
        for line in ConfigLoader::describe_sources(explicit) {
            println!("{line}");
        }
        println!();
        println!("{}", config.to_redacted_toml()?);
        return Ok(());
    }

    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = init_logging(cli.verbose, &config.logging)?;

    info!("Starting health-crew");

    check_config(&config)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    let use_case = build_use_case(&config)?;

    match cli.selected_command() {
        Command::Consult(args) => consult(&cli, &config, use_case, args).await,
        Command::Serve(args) => serve(&config, use_case, args).await,
    }
}

/// Console logs to stderr, plus a daily-rolling file when `[logging] log_dir` is set.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match logging.log_dir_path() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, "health-crew.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

/// Print every configuration issue; abort when any of them is an error.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("{} {}", "config error:".red().bold(), issue.message);
        } else {
            warn!(code = ?issue.code, "{}", issue.message);
            eprintln!("{} {}", "config warning:".yellow().bold(), issue.message);
        }
    }
    if has_errors(&issues) {
        bail!("invalid configuration (see --show-config)");
    }
    Ok(())
}

/// Gateway, tools and transcript behind the consultation use case.
fn build_use_case(config: &FileConfig) -> Result<RunConsultationUseCase<dyn PipelineExecutor>> {
    let gateway = build_gateway(config)?;
    let tools = Arc::new(LocalToolExecutor::new(&config.tools));
    let model = config.llm.parse_model();

    let mut executor = ExecutePipelineUseCase::new(gateway, tools, model)
        .with_params(config.execution.to_params());

    if let Some(path) = config.logging.conversation_log_path() {
        match JsonlConversationLogger::new(&path) {
            Some(logger) => {
                info!(path = %logger.path().display(), "Writing conversation transcript");
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                executor = executor.with_conversation_logger(logger);
            }
            None => warn!(path = %path.display(), "Conversation transcript disabled"),
        }
    }

    let (input_mode, _) = config.prompt.parse_input_mode();
    let executor: Arc<dyn PipelineExecutor> = Arc::new(executor);
    Ok(RunConsultationUseCase::new(executor).with_input_mode(input_mode))
}

async fn consult(
    cli: &Cli,
    config: &FileConfig,
    use_case: RunConsultationUseCase<dyn PipelineExecutor>,
    args: ConsultArgs,
) -> Result<()> {
    let partial = PartialRequest {
        age: args.age,
        gender: args.gender,
        disease: args.disease,
    };

    let request = match partial.into_complete() {
        Ok(request) => request,
        Err(partial) => {
            let mut form = TerminalForm::new()?;
            if !cli.quiet {
                form.print_welcome();
            }
            fill_request(partial, &mut form)?
        }
    };

    let show_progress = !cli.quiet && config.output.show_progress;
    let progress: Box<dyn ProgressNotifier> = if !show_progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let result = use_case
        .execute_with_progress(request, progress.as_ref())
        .await?;

    let format = config.output.resolve_format(args.output.map(Into::into));
    println!("{}", ConsoleFormatter::render(&result, format));

    Ok(())
}

async fn serve(
    config: &FileConfig,
    use_case: RunConsultationUseCase<dyn PipelineExecutor>,
    args: ServeArgs,
) -> Result<()> {
    let mut server = config.server.clone();
    if let Some(bind) = args.bind {
        server.bind = bind;
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    let address = server.address();
    let addr = tokio::net::lookup_host(address.as_str())
        .await
        .with_context(|| format!("cannot resolve {address}"))?
        .next()
        .ok_or_else(|| anyhow!("no address for {address}"))?;

    println!(
        "{} http://{}",
        "Consultation form available at".cyan().bold(),
        addr
    );

    let state = Arc::new(AppState::new(use_case));
    health_crew_presentation::serve(state, addr).await?;
    Ok(())
}
