//! SeqCalc-rs — linear-recurrence sequence calculator.

use anyhow::Result;
use seqcalc_core::solver::SeqError;
use seqcalc_lib::{app, config, errors};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    // Parse CLI args and run
    let config = config::AppConfig::parse();
    if let Err(err) = app::run(&config) {
        if let Some(seq_err) = err.downcast_ref::<SeqError>() {
            eprintln!("Error: {seq_err}");
            std::process::exit(errors::exit_code(seq_err));
        }
        return Err(err);
    }
    Ok(())
}
