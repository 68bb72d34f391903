//! Grimoire CLI entry point.

use std::env;
use std::process::ExitCode;

use grimoire_runtime::{Repl, RuntimeConfig, Session};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> grimoire_foundation::Result<()> {
    let config = RuntimeConfig::from_args(env::args())?;

    if config.show_help {
        print_help();
        return Ok(());
    }
    if config.show_version {
        println!("grimoire {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(config.log.as_deref());

    let mut session = Session::from_runtime(&config)?;
    for script in &config.scripts {
        for output in session.run_script(script)? {
            if !output.is_empty() {
                println!("{output}");
            }
        }
    }

    if !config.batch {
        let mut repl = Repl::new()?.with_session(session);
        if !config.scripts.is_empty() {
            repl = repl.without_banner();
        }
        repl.run()?;
        session = repl.into_session();
    }

    if let Some(path) = &config.save {
        session.save(path)?;
    }
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mGrimoire\x1b[0m - spell slots and repeating tables over a flat attribute store

\x1b[1mUSAGE:\x1b[0m
    grimoire [OPTIONS] [SCRIPTS...]

\x1b[1mARGUMENTS:\x1b[0m
    [SCRIPTS...]       Command files to run before the REPL

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    -b, --batch        Run scripts and exit (no REPL)
    --load PATH        Load a snapshot at startup
    --save PATH        Write a snapshot on exit
    --owner ID         Select the character at startup
    --seed N           Seed row-key generation
    --log FILTER       Log filter (default: RUST_LOG, else warn)

\x1b[1mEXAMPLES:\x1b[0m
    grimoire                                  Start the REPL
    grimoire -b setup.grim --save sheet.mp    Run a script and save the result
    grimoire --load sheet.mp --owner -Mchar   Resume a saved sheet

Type 'help' in the REPL for its commands."
    );
}
