//! CLI entrypoint for tool-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use relay_application::{
    ConversationLogger, ConversationOrchestrator, NoConversationLogger, NoStatus,
    RunConversationInput, StatusSink, ToolInvoker, ToolSchemaPort,
};
use relay_infrastructure::{
    ConfigLoader, FileConfig, JsonSchemaToolConverter, JsonlConversationLogger,
    OpenAiCompatibleClient, builtin_registry, status_channel,
};
use relay_presentation::{Cli, ConsoleFormatter, StatusPrinter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Use the available tools \
when they help answer the user's request, then reply with a concise final answer.";

/// Exit status for a conversation cancelled with Ctrl-C
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::new("warn"),
        (false, 1) => EnvFilter::new("info"),
        (false, 2) => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // === Configuration ===
    let mut config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    if let Some(max) = cli.max_concurrency {
        config.execution.max_concurrent_tools = max;
    }

    if cli.show_config {
        println!("Configuration sources (in priority order):");
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("  {}", line);
        }
        println!();
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    for issue in config.check()? {
        warn!("config: {}", issue);
    }

    let Some(prompt) = cli.prompt.clone() else {
        bail!("A prompt is required. Run with --help for usage.");
    };

    // === Dependency Injection ===
    let registry = builtin_registry()?;
    let tool_schemas = JsonSchemaToolConverter.all_tools_schema(&registry)?;

    let api_key = if config.model.api_key_env.is_empty() {
        None
    } else {
        Some(OpenAiCompatibleClient::api_key_from_env(
            &config.model.api_key_env,
        )?)
    };
    let client = Arc::new(OpenAiCompatibleClient::new(
        config.model.to_openai_config(api_key),
    )?);

    let (status, channel_sink, printer) = if cli.quiet {
        (Arc::new(NoStatus) as Arc<dyn StatusSink>, None, None)
    } else {
        let (sink, events) = status_channel(config.execution.status_queue_capacity);
        let printer = StatusPrinter::new().with_call_ids(cli.verbose > 0);
        let handle = tokio::spawn(printer.run(events));
        (
            Arc::new(sink.clone()) as Arc<dyn StatusSink>,
            Some(sink),
            Some(handle),
        )
    };

    let params = config.execution.to_execution_params();
    let invoker = Arc::new(ToolInvoker::new(Arc::new(registry), status).with_params(&params));

    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => Arc::new(
            JsonlConversationLogger::open(path)
                .with_context(|| format!("failed to open conversation log {}", path.display()))?,
        ),
        None => Arc::new(NoConversationLogger),
    };

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling conversation");
                token.cancel();
            }
        });
    }

    let system_prompt = cli
        .system
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

    info!(model = %config.model.model, tools = tool_schemas.len(), "Starting tool-relay");

    let mut orchestrator = ConversationOrchestrator::new(
        client,
        invoker,
        tool_schemas,
        RunConversationInput::new(system_prompt, prompt),
    )
    .with_params(params)
    .with_logger(logger)
    .with_cancellation(token);

    let result = orchestrator.run().await;
    let output = result.as_ref().ok().map(|outcome| {
        ConsoleFormatter::format(
            cli.output.into(),
            outcome,
            orchestrator.state().transcript(),
        )
    });

    // Close the status channel so the printer drains and exits
    drop(orchestrator);
    if let Some(sink) = channel_sink {
        let dropped = sink.dropped();
        if dropped > 0 {
            warn!(dropped, "Status events dropped (queue full)");
        }
    }
    if let Some(handle) = printer {
        let _ = handle.await;
    }

    match result {
        Ok(_) => {
            if let Some(output) = output {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("Conversation cancelled");
            std::process::exit(EXIT_CANCELLED);
        }
        Err(e) => Err(e.into()),
    }
}
