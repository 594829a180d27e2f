use std::env;
use std::net::SocketAddr;

use url::Url;

use crate::error::AppError;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url = env::var("TODO_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_token = env::var("TODO_API_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self::new(&api_base_url, api_token, &bind_addr)
    }

    pub fn new(api_base_url: &str, api_token: Option<String>, bind_addr: &str) -> Result<Self, AppError> {
        let api_base_url = Url::parse(api_base_url.trim())
            .map_err(|e| AppError::Config(format!("TODO_API_BASE_URL is invalid: {}", e)))?;
        if api_base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "TODO_API_BASE_URL cannot be a base url: {}",
                api_base_url
            )));
        }
        let bind_addr = bind_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        Ok(Self {
            api_base_url,
            api_token,
            bind_addr,
        })
    }
}
