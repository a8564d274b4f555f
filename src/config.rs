use std::env;

// Fallback secret for local runs of a system whose data set is all fixtures.
const DEV_JWT_SECRET: &str = "pharmacare-dev-secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = jwt_secret();
        Ok(Self {
            host,
            port,
            jwt_secret,
        })
    }
}

pub fn jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string())
}
