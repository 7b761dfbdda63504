use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use cloudpilot::{Config, FileBrowser, GeminiTagGenerator, UploadFile};

/// How often the demo checks whether uploads have settled.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

async fn print_listing(browser: &FileBrowser) {
    let crumbs: Vec<String> = browser
        .breadcrumbs()
        .await
        .iter()
        .map(|node| node.name.clone())
        .collect();
    println!("/{}", crumbs.join("/"));

    for card in browser.node_cards().await {
        println!("  {}", card.format());
    }
    for upload in browser.upload_cards().await {
        println!("  upload: {}", upload.format());
    }
    println!("  tags: {}", browser.all_tags().await.join(", "));
}

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = cloudpilot::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        cloudpilot::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("CloudPilot - in-memory file browser");

    let generator = match GeminiTagGenerator::new(&config.tagging) {
        Ok(generator) => generator,
        Err(e) => {
            error!("Failed to create tag generator: {}", e);
            std::process::exit(1);
        }
    };
    if config.tagging.api_key.is_empty() {
        warn!("No tagging API key configured; uploads will fail to tag");
    }

    let browser = FileBrowser::new(&config, Arc::new(generator));
    let mut notifications = browser.subscribe();
    tokio::spawn(async move {
        while let Ok(notification) = notifications.recv().await {
            println!("{}", notification.format());
        }
    });

    print_listing(&browser).await;

    let mut started = 0;
    for path in std::env::args().skip(1) {
        match UploadFile::from_path(&path).await {
            Ok(file) => {
                browser.upload(file).await;
                started += 1;
            }
            Err(e) => error!("Cannot upload {}: {}", path, e),
        }
    }

    if started > 0 {
        while browser.has_active_uploads().await {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        println!();
        print_listing(&browser).await;
    }
}
