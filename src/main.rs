use std::sync::Arc;

use dotenvy::dotenv;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use studyhall_backend::infra::{database::PostgresDatabase, http_api::start_http_api};

#[derive(Deserialize, Debug)]
struct EnvVariables {
    database_url: String,
    jwt_secret: String,
    #[serde(default = "default_server_addr")]
    server_addr: String,
}

fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}

#[tokio::main]
async fn main() {
    let _ = dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let env_vars = envy::from_env::<EnvVariables>().unwrap();

    let database = Arc::new(PostgresDatabase::new(&env_vars.database_url).await.unwrap());

    start_http_api(env_vars.server_addr, env_vars.jwt_secret, database).await;
}
