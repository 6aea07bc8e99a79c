use tubely_core::Config;

// Use mimalloc as the global allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, routes)
    let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    tubely_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
