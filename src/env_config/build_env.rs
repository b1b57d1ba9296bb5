use super::models::app_env::{AppEnv, Env};
use std::env;
use std::str::FromStr;

impl AppEnv {
    pub fn new() -> AppEnv {
        AppEnv {
            env: Env::from_str(&get_env_var("ENV")).unwrap_or_else(|e| panic!("ENV -> {}", e)),
            server_port: get_env_var("SERVER_PORT")
                .parse()
                .unwrap_or_else(|_| panic!("ENV -> SERVER_PORT must be a port number")),
            server_address: get_env_var("SERVER_ADDRESS"),
        }
    }
}

impl Default for AppEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn get_env_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("ENV -> {} is not set", name))
}
