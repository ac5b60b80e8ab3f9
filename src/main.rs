//! code-exec binary entry point.

use std::process::ExitCode;

use code_exec::cli::{self, Args};
use code_exec::config::Config;
use code_exec::{logging, report, CodeExecError, ExecutionRequest, RunnerRegistry};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'code-exec --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = logging::init_with_filter(config.log_filter()) {
        eprintln!("warning: logging unavailable: {}", e);
    }

    let registry = RunnerRegistry::from_config(&config);
    if args.list {
        for language in registry.languages() {
            println!("{}", language);
        }
        return ExitCode::SUCCESS;
    }

    match run(&args, &registry).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(args: &Args, registry: &RunnerRegistry) -> code_exec::Result<u8> {
    let language = match args.language {
        Some(ref language) => language.clone(),
        None => {
            eprintln!("error: missing <LANGUAGE>");
            eprintln!("Try 'code-exec --help' for more information.");
            return Ok(2);
        }
    };
    let runner = registry
        .lookup(&language)
        .ok_or_else(|| CodeExecError::UnsupportedLanguage(language.clone()))?;

    let source = read_source(args).await?;

    // The same body serves as script or code; each runner reads its own field.
    let mut request = ExecutionRequest::new(language)
        .code(source.clone())
        .script(source)
        .args(args.program_args.iter().cloned());
    request.working_dir = args.working_dir.clone();
    request.timeout_secs = args.timeout;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, cancelling execution");
            on_interrupt.cancel();
        }
    });

    let result = runner.execute(&request, &cancel).await;

    if args.json {
        println!("{}", report::render_json(&result, runner.name()));
    } else {
        print!("{}", report::render_text(&result, runner.name()));
    }

    Ok(report::exit_status(&result))
}

async fn read_source(args: &Args) -> code_exec::Result<String> {
    if args.reads_stdin() {
        let mut source = String::new();
        tokio::io::stdin().read_to_string(&mut source).await?;
        return Ok(source);
    }

    match args.file {
        Some(ref path) => Ok(tokio::fs::read_to_string(path).await?),
        None => Ok(String::new()),
    }
}
