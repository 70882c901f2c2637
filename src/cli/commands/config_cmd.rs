//! cli::commands::config
//!
//! Show the effective configuration and where it was loaded from.

use anyhow::Result;

use crate::cli::Context;
use crate::core::config::Config;

/// Print the effective configuration as TOML, defaults filled in.
pub fn show(ctx: &Context) -> Result<()> {
    print!("{}", ctx.config.effective_toml());
    Ok(())
}

/// Print the loaded config file, or where one would be read from.
pub fn path(ctx: &Context) -> Result<()> {
    match ctx.config.path() {
        Some(path) => println!("{}", path.display()),
        None => println!("{} (not present)", Config::canonical_path()?.display()),
    }
    Ok(())
}
