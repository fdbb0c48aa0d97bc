#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = skillforge::run().await {
        eprintln!("skillforge fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
