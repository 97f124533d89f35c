use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::error::Result;

pub fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    let subscriber = tracing_subscriber::registry().with(filter);

    subscriber
        .with(fmt::layer().with_target(false).with_level(verbose))
        .init();
    Ok(())
}
