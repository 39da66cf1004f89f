use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Event source
    pub meetup_api_key: String,
    pub event_search_lat: f64,
    pub event_search_lng: f64,
    pub event_search_limit: u32,

    // Vote ledger (Firebase Realtime Database)
    pub firebase_db_url: String,
    pub firebase_auth_token: Option<String>,

    // Web server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            meetup_api_key: required_env("MEETUP_API_KEY"),
            event_search_lat: env::var("EVENT_SEARCH_LAT")
                .unwrap_or_else(|_| "51.528939".to_string())
                .parse()
                .expect("EVENT_SEARCH_LAT must be a number"),
            event_search_lng: env::var("EVENT_SEARCH_LNG")
                .unwrap_or_else(|_| "-0.057641".to_string())
                .parse()
                .expect("EVENT_SEARCH_LNG must be a number"),
            event_search_limit: env::var("EVENT_SEARCH_LIMIT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("EVENT_SEARCH_LIMIT must be a number"),
            firebase_db_url: required_env("FIREBASE_DB_URL"),
            firebase_auth_token: env::var("FIREBASE_AUTH_TOKEN").ok(),
            host: env::var("ENCORE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("ENCORE_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("ENCORE_PORT must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
