use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prepended to every declared table name (default: "")
    pub table_prefix: String,
    /// Talk to a local DynamoDB endpoint instead of AWS (default: false)
    pub local_mode: bool,
    /// Endpoint used in local mode (default: "http://localhost:8000")
    pub local_service_url: String,
    /// AWS region (default: "us-east-1")
    pub region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BLOGSTORE_TABLE_PREFIX` - Table name prefix (default: "")
    /// - `DYNAMODB_LOCAL_MODE` - Use a local endpoint (default: false)
    /// - `DYNAMODB_LOCAL_SERVICE_URL` - Local endpoint (default: "http://localhost:8000")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self {
            table_prefix: env::var("BLOGSTORE_TABLE_PREFIX").unwrap_or_default(),
            local_mode: env::var("DYNAMODB_LOCAL_MODE")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            local_service_url: env::var("DYNAMODB_LOCAL_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }

    /// Endpoint override for the DynamoDB client, set only in local mode.
    pub fn endpoint_url(&self) -> Option<&str> {
        self.local_mode.then_some(self.local_service_url.as_str())
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match self.endpoint_url() {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
