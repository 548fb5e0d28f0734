use clap::Parser;
use owon_listener::app::{self, Options};
use std::panic::{self, PanicHookInfo};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PANIC: i32 = 2;
const EXIT_INTERRUPTED: i32 = 130;

/// How long shutdown waits for a blocked stdin read before giving up.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// Log to stderr; stdout carries the live display.
fn setup_logging(options: &Options) {
    let filter_level = if options.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Run until the source closes or Ctrl-C is pressed, returning the exit code.
async fn listen(options: Options) -> i32 {
    tokio::select! {
        result = app::run(options) => match result {
            Ok(()) => EXIT_SUCCESS,
            Err(why) => {
                eprintln!("\nerror: {}", why);
                EXIT_ERROR
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\nExit requested");
            EXIT_INTERRUPTED
        }
    }
}

fn main() {
    // Set up panic hook to ensure clean exit codes for process managers
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    let options = Options::parse();
    setup_logging(&options);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(why) => {
            eprintln!("error: {}", why);
            std::process::exit(EXIT_ERROR);
        }
    };

    let code = runtime.block_on(listen(options));

    // Shutting down cancels the reader task, which kills the helper.
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    std::process::exit(code);
}
