use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub secret_key: String,
    pub session_ttl_hours: i64,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
    pub chat_id: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://blog.db".into());
        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid DATABASE_MAX_CONNECTIONS: {}", e))?;
        let secret_key =
            std::env::var("SECRET_KEY").map_err(|_| anyhow::anyhow!("SECRET_KEY must be set"))?;
        let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "168".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SESSION_TTL_HOURS: {}", e))?;

        let telegram = match (
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            std::env::var("TELEGRAM_CHAT_ID").ok(),
        ) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                api_url: std::env::var("TELEGRAM_API_URL")
                    .unwrap_or_else(|_| "https://api.telegram.org".into()),
                bot_token,
                chat_id,
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            secret_key,
            session_ttl_hours,
            telegram,
        })
    }
}
