use clap::{Parser, Subcommand};
use dreamdisc::{
    compositor::{save_data_url, CompositorOptions, DEFAULT_DOWNLOAD_NAME},
    logger::{self, LogLevel, LoggerConfig},
    CoverStyle, DreamLayerClient, DreamLayerConfig, GenerationRequest, GenerationResponse,
};

#[derive(Parser)]
#[command(name = "dreamdisc", about = "DreamLayer client and disc cover compositor")]
struct Cli {
    /// Backend host, e.g. http://localhost
    #[arg(long)]
    host: Option<String>,

    /// Output edge length in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Disc background image path
    #[arg(long)]
    disc_base: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List checkpoints known to the backend
    Models,
    /// Check backend health
    Health,
    /// Generate an image from a prompt
    Generate {
        prompt: Vec<String>,
        #[arg(long)]
        negative_prompt: Option<String>,
        #[arg(long)]
        checkpoint: Option<String>,
        #[arg(long)]
        steps: Option<u32>,
        #[arg(long)]
        cfg: Option<f32>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        batch_size: Option<u32>,
        /// Save the first generated image here
        #[arg(long)]
        download: Option<String>,
    },
    /// Generate a playlist cover and composite it onto the disc
    Cover {
        #[arg(long, default_value = "gradients")]
        style: CoverStyle,
        #[arg(long)]
        mood: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = DEFAULT_DOWNLOAD_NAME)]
        output: String,
    },
    /// Composite an existing image (URL or path) onto the disc
    Composite {
        image: String,
        #[arg(long, default_value = DEFAULT_DOWNLOAD_NAME)]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    logger::init_with_config(LoggerConfig::new().with_level(cli.log_level))?;

    let mut config = DreamLayerConfig::from_env();
    if let Some(host) = &cli.host {
        config = config.with_host(host);
    }
    if let Some(size) = cli.size {
        config = config.with_output_size(size);
    }
    if let Some(path) = cli.disc_base {
        config = config.with_disc_base(path);
    }

    let client = DreamLayerClient::new(config)?;

    match cli.command {
        Command::Models => {
            for model in client.models().list().await? {
                println!("{}\t{}\t{}", model.id, model.name, model.filename);
            }
        }
        Command::Health => {
            let health = client.models().health().await?;
            println!(
                "{} ({} {})",
                health.status,
                health.service.unwrap_or_default(),
                health.version.unwrap_or_default()
            );
        }
        Command::Generate {
            prompt,
            negative_prompt,
            checkpoint,
            steps,
            cfg,
            width,
            height,
            batch_size,
            download,
        } => {
            let mut request = GenerationRequest::new(prompt.join(" "));
            request.negative_prompt = negative_prompt;
            request.checkpoint = checkpoint;
            request.steps = steps;
            request.cfg = cfg;
            request.width = width;
            request.height = height;
            request.batch_size = batch_size;

            let response = client.images().generate(request).await?;
            if let GenerationResponse::Success {
                message: Some(message),
                ..
            } = &response
            {
                log::info!("{}", message);
            }

            let images = response.into_images()?;
            for image in &images {
                println!("{}", client.images().resolve_url(image));
            }
            if let (Some(target), Some(first)) = (download, images.first()) {
                let bytes = client.images().download(&first.filename).await?;
                tokio::fs::write(&target, bytes).await?;
                log::info!("💾 Saved {}", target);
            }
        }
        Command::Cover {
            style,
            mood,
            title,
            output,
        } => {
            let data_url = client
                .cover_disc(style, &mood, title.as_deref(), CompositorOptions::new())
                .await?;
            let path = save_data_url(&data_url, &output).await?;
            println!("{}", path.display());
        }
        Command::Composite { image, output } => {
            let data_url = client
                .compositor()
                .composite(&image, CompositorOptions::new())
                .await?;
            let path = save_data_url(&data_url, &output).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
