//! clerk - 個人用タスク時間計測CLIツール

mod cli;
mod config;
mod error;
mod format;
mod logging;
mod model;
mod report;
mod store;
mod timer;
mod tracker;

use anyhow::Result;

fn main() -> Result<()> {
    logging::init();
    cli::run()
}
