use clap::Parser;
use comics_poster::utils::{logger, validation::Validate};
use comics_poster::{CliConfig, Credentials, PostPipeline, VkClient, XkcdClient};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting comics-poster");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("❌ Credential loading failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match run(&config, &credentials).await {
        Ok(()) => {
            tracing::info!("✅ Run completed successfully");
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                comics_poster::utils::error::ErrorSeverity::Low => 0,
                comics_poster::utils::error::ErrorSeverity::Medium => 2,
                comics_poster::utils::error::ErrorSeverity::High => 1,
                comics_poster::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(config: &CliConfig, credentials: &Credentials) -> comics_poster::Result<()> {
    let vk = VkClient::new(config.vk_api_url.clone(), credentials.access_token.clone());

    if config.list_groups {
        let groups = vk.get_groups().await?;
        println!("You administer {} communities:", groups.count);
        for id in &groups.items {
            println!("  {}", id);
        }
        return Ok(());
    }

    let xkcd = XkcdClient::new(config.xkcd_url.clone());
    let pipeline = PostPipeline::new(
        xkcd,
        vk,
        credentials.group_id,
        PathBuf::from(&config.work_dir),
    );

    let post_id = pipeline.run().await?;
    println!("✅ Posted comic to the community wall (post {})", post_id);

    Ok(())
}
