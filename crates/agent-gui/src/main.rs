use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;

use agent_gui::commands::Cli;
use agent_gui::commands::Commands;
use agent_gui::config::Config;
use agent_gui::handlers;
use agent_gui::handlers::HandlerContext;
use agent_gui::platform::PlatformError;
use agent_gui::telemetry::init_tracing;
use agent_gui_annotate::AnnotateError;
use agent_gui_process::ProcessError;
use agent_gui_session::SessionError;

fn main() {
    if let Err(e) = run() {
        if let Some(session_error) = e.downcast_ref::<SessionError>() {
            eprintln!("Error: {}", session_error);
            eprintln!("Suggestion: {}", session_error.suggestion());
            if session_error.is_retryable() {
                eprintln!("(This error may be transient - retry may succeed)");
            }
            std::process::exit(exit_code_for_session_error(session_error));
        } else if let Some(process_error) = e.downcast_ref::<ProcessError>() {
            eprintln!("Error: {}", process_error);
            eprintln!("Suggestion: {}", process_error.suggestion());
            std::process::exit(exit_code_for_process_error(process_error));
        } else if let Some(annotate_error) = e.downcast_ref::<AnnotateError>() {
            eprintln!("Error: {}", annotate_error);
            std::process::exit(exit_code_for_annotate_error(annotate_error));
        } else if let Some(platform_error) = e.downcast_ref::<PlatformError>() {
            eprintln!("Error: {}", platform_error);
            eprintln!("Suggestion: {}", platform_error.suggestion());
            std::process::exit(69); // EX_UNAVAILABLE
        } else {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn exit_code_for_session_error(error: &SessionError) -> i32 {
    match error {
        SessionError::InvalidId(_) => 64, // EX_USAGE
        SessionError::NoSession
        | SessionError::ElementNotFound(_)
        | SessionError::NoMatch(_) => 69, // EX_UNAVAILABLE
        SessionError::Corrupt { .. } | SessionError::Persistence { .. } => 74, // EX_IOERR
    }
}

fn exit_code_for_process_error(error: &ProcessError) -> i32 {
    match error {
        ProcessError::InvalidIdentifier(_) | ProcessError::InvalidPid(_) => 64, // EX_USAGE
        ProcessError::NotFound(_) => 69,                                        // EX_UNAVAILABLE
    }
}

fn exit_code_for_annotate_error(error: &AnnotateError) -> i32 {
    match error {
        AnnotateError::MissingScreenshot | AnnotateError::MissingSession => 69, // EX_UNAVAILABLE
        AnnotateError::Session(session_error) => exit_code_for_session_error(session_error),
        AnnotateError::Image(_) => 74, // EX_IOERR
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let _telemetry = init_tracing(default_level);

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "agent-gui", &mut std::io::stdout());
        return Ok(());
    }

    let format = cli.effective_format();
    let ctx = HandlerContext::new(Config::from_env(), cli.session, format);

    match cli.command {
        Commands::Completions { .. } => unreachable!(),

        Commands::Capture {
            app,
            tree_file,
            screenshot,
            window_title,
            annotate,
        } => handlers::handle_capture(&ctx, app, tree_file, screenshot, window_title, annotate)?,

        Commands::Apps => handlers::handle_apps(&ctx)?,
        Commands::Elements { actionable } => handlers::handle_elements(&ctx, actionable)?,
        Commands::Find { query } => handlers::handle_find(&ctx, query)?,
        Commands::Resolve { app } => handlers::handle_resolve(&ctx, app)?,
        Commands::Annotate => handlers::handle_annotate(&ctx)?,

        Commands::Click { target, dry_run } => handlers::handle_click(&ctx, target, dry_run)?,
        Commands::Type {
            target,
            text,
            dry_run,
        } => handlers::handle_type(&ctx, target, text, dry_run)?,
        Commands::Scroll {
            target,
            direction,
            amount,
            dry_run,
        } => handlers::handle_scroll(&ctx, target, direction, amount, dry_run)?,

        Commands::Clean { all } => handlers::handle_clean(&ctx, all)?,
    }

    Ok(())
}
