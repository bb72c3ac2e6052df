use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_uri: String,
    /// Database name; falls back to the default database named by the URI.
    pub database: Option<String>,
    pub bucket_name: String,
    pub chunk_size_bytes: Option<u32>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Config {
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: env::var("MONGODB_DATABASE").ok(),
            bucket_name: env::var("GRIDFS_BUCKET")
                .unwrap_or_else(|_| "fs".to_string()),
            chunk_size_bytes: env::var("GRIDFS_CHUNK_SIZE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database: None,
            bucket_name: "fs".to_string(),
            chunk_size_bytes: None,
        }
    }
}
