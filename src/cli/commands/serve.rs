//! cli::commands::serve
//!
//! Run the web UI.
//!
//! # Design
//!
//! Flags override the `[server]` config section. The browser shell is
//! prefilled with the `--repo` path (or the current directory). With
//! `--open` (or `server.open_browser`) the default browser is pointed at
//! the bound address once the listener is up.

use std::net::SocketAddr;

use anyhow::{Context as _, Result};
use tracing::warn;

use super::block_on;
use crate::cli::args::ServeArgs;
use crate::cli::Context;
use crate::server::{AppState, Bound};
use crate::ui::output;

/// Run the serve command. Blocks until Ctrl-C or SIGTERM.
pub fn serve(ctx: &Context, args: &ServeArgs) -> Result<()> {
    let addr = resolve_addr(ctx, args)?;
    let state = AppState::from_config(&ctx.config, Some(ctx.repo.clone()));
    let open_browser = args.open || ctx.config.open_browser();

    block_on(async move {
        let bound = Bound::bind(state, addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;
        let url = format!("http://{}", bound.local_addr()?);
        output::print(format!("githandle listening on {url}"), ctx.verbosity);

        if open_browser {
            if let Err(err) = open::that(&url) {
                warn!(error = %err, %url, "failed to open browser");
            }
        }
        bound.run().await.context("Server error")
    })?
}

fn resolve_addr(ctx: &Context, args: &ServeArgs) -> Result<SocketAddr> {
    let ip = match args.bind {
        Some(ip) => ip,
        None => ctx
            .config
            .bind()
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", ctx.config.bind()))?,
    };
    let port = args.port.unwrap_or_else(|| ctx.config.port());
    Ok(SocketAddr::new(ip, port))
}
