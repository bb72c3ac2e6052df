use docbase::Config;
use rand::Rng;

/// Integration tests need a running MongoDB deployment. They resolve it
/// from MONGODB_URI and skip cleanly when the environment does not provide
/// one, so the suite stays green on machines without a database.
pub fn test_config() -> Option<Config> {
    let uri = std::env::var("MONGODB_URI").ok()?;
    let suffix: u32 = rand::thread_rng().gen();
    Some(Config {
        mongodb_uri: uri,
        database: Some(format!("docbase_test_{suffix:08x}")),
        bucket_name: "fs".to_string(),
        chunk_size_bytes: None,
    })
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
