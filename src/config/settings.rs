use dotenv::dotenv;
use std::env;

use crate::services::pin::PIN_FORMAT;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_port: u16,
    pub order_pin: String,
    pub database_url: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv().ok(); // loads `.env` file automatically

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse::<u16>()
            .map_err(|_| "SERVER_PORT must be a valid u16")?;

        let order_pin = env::var("ORDER_PIN").unwrap_or_else(|_| "1111".into());
        if !PIN_FORMAT.is_match(&order_pin) {
            return Err("ORDER_PIN must be exactly 4 digits".into());
        }

        // Absent DATABASE_URL simply means no historical store.
        let database_url = env::var("DATABASE_URL").ok();

        Ok(Self {
            server_port,
            order_pin,
            database_url,
        })
    }
}
