use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    signal_cli::main_entry().await
}
