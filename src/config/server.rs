use crate::config::traits::ConfigEntity;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: default_listen(),
            port: default_port(),
            path_prefix: default_path_prefix(),
        }
    }
}

impl ConfigEntity for ServerConfig {
    fn finalize(&mut self) -> Result<()> {
        if self.listen.eq_ignore_ascii_case("localhost") {
            self.listen = "127.0.0.1".to_string();
        }

        let prefix = self.path_prefix.trim().trim_end_matches('/');
        self.path_prefix = if prefix.is_empty() {
            default_path_prefix()
        } else if prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{}", prefix)
        };

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if IpAddr::from_str(&self.listen).is_err() {
            bail!("Invalid listen address: {}", self.listen);
        }

        if self.path_prefix.contains(['{', '}', '*', '?', '#']) {
            bail!("Invalid path prefix: {}", self.path_prefix);
        }

        Ok(())
    }
}

impl ServerConfig {
    pub fn to_socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen
            .parse()
            .context("Failed to parse listen address")?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_path_prefix() -> String {
    "/vnstat".to_string()
}
