use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    keybrame_console::cli::run().await
}
