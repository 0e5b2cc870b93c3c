mod commands;
mod terminal;

use commands::{CommandLine, scan};
use terminal::{logging, print};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse_args();

    logging::init();
    print::banner();

    if !is_root::is_root() {
        warn!("Not running as root, opening the datalink channel will probably fail");
    }

    scan::scan(&args).await
}
