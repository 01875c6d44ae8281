//! Browse command handler.

use std::io::IsTerminal;

use anyhow::{Context, Result};

use super::Services;
use crate::modes;

pub async fn run(services: &Services) -> Result<()> {
    let mut app = services.app();
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Type /help for commands, :q to quit.");
    }

    let mut stdout = std::io::stdout().lock();
    modes::browse::run(stdin.lock(), &mut stdout, &mut app)
        .await
        .context("browse session failed")
}
