use dreamdisc::{
    compositor::save_data_url, CompositorOptions, CoverStyle, DreamLayerClient, DreamLayerConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dreamdisc::logger::init()?;
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }

    let client = DreamLayerClient::new(DreamLayerConfig::from_env())?;

    for model in client.models().list().await? {
        log::info!("📚 {} ({})", model.name, model.filename);
    }

    let data_url = client
        .cover_disc(
            CoverStyle::Gradients,
            "calm",
            Some("Late Night"),
            CompositorOptions::new(),
        )
        .await?;

    let path = save_data_url(&data_url, ".").await?;
    println!("{}", path.display());

    Ok(())
}
