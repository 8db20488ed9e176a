use cloudwatch_log_forwarder::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::main().await
}
