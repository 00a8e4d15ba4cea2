use anyhow::Result;
use codecrux::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
