use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    mcp_server_neon::cli::run().await
}
