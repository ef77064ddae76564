#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mentorlink_server::run().await
}
