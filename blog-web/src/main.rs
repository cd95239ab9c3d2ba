use blog_web::infrastructure::config::AppConfig;
use blog_web::infrastructure::logging::init_logging;
use blog_web::server::start_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    start_server(config).await
}
