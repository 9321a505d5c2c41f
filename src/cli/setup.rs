use std::io;

use anyhow::{bail, Result};

use crate::cli::context::CliContext;
use crate::setup::{locate_browser, report_browser};

pub async fn cmd_setup(ctx: &CliContext) -> Result<()> {
    let found = locate_browser(ctx.config().browser.chrome.clone());
    if !report_browser(found.as_ref(), &mut io::stdout())? {
        bail!("no Chrome/Chromium executable found");
    }
    Ok(())
}
