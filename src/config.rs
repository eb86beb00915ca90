use std::str::FromStr;

use bigdecimal::BigDecimal;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Commission parameters
    pub commission_rate: BigDecimal,
    // Receipt storage configurations
    pub storage_api_url: String,
    pub storage_api_key: String,
    pub storage_public_url: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");

        // Platform share of referenced income, audited per settlement (25% default)
        let commission_rate = std::env::var("COMMISSION_RATE")
            .unwrap_or_else(|_| "0.25".to_string());
        let commission_rate = BigDecimal::from_str(&commission_rate)
            .expect("COMMISSION_RATE must be a decimal number");

        // Receipt storage configurations (with defaults for local development)
        let storage_api_url = std::env::var("STORAGE_API_URL")
            .unwrap_or_else(|_| "http://localhost:9000/receipts".to_string());
        let storage_api_key = std::env::var("STORAGE_API_KEY")
            .unwrap_or_else(|_| "".to_string());
        let storage_public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:9000/receipts".to_string());

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: 8000,
            commission_rate,
            storage_api_url,
            storage_api_key,
            storage_public_url,
        }
    }
}
