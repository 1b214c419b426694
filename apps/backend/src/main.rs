#[tokio::main]
async fn main() -> anyhow::Result<()> {
    studynotes_backend::run().await
}
