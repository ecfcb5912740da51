use anyhow::Result;
use whiskey_night::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
