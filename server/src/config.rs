use anyhow::Context;
use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

#[derive(Clone, Debug, clap::Args)]
#[command(next_help_heading = "HTTP endpoint")]
#[group(id = "http")]
pub struct HttpServerConfig {
    /// The number of worker threads, defaults to zero, which falls back to the number of cores.
    #[arg(
        id = "http-server-workers",
        long,
        env = "HTTP_SERVER_WORKERS",
        default_value_t = 0
    )]
    pub workers: usize,

    /// The address to listen on
    #[arg(
        id = "http-server-bind-address",
        long,
        env = "HTTP_SERVER_BIND_ADDR",
        default_value_t = default::bind_addr(),
    )]
    pub bind_addr: String,

    /// The port to listen on
    #[arg(
        id = "http-server-bind-port",
        short = 'p',
        long,
        env = "HTTP_SERVER_BIND_PORT",
        default_value_t = default::BIND_PORT
    )]
    pub bind_port: u16,

    /// The JSON request limit, in bytes
    #[arg(
        id = "http-server-json-limit",
        long,
        env = "HTTP_SERVER_JSON_LIMIT",
        default_value_t = default::JSON_LIMIT
    )]
    pub json_limit: usize,
}

mod default {
    pub const BIND_PORT: u16 = 8080;
    pub const JSON_LIMIT: usize = 2 * 1024 * 1024;

    pub fn bind_addr() -> String {
        "::1".to_string()
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            bind_addr: default::bind_addr(),
            bind_port: default::BIND_PORT,
            json_limit: default::JSON_LIMIT,
        }
    }
}

impl HttpServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(SocketAddr::new(
            IpAddr::from_str(&self.bind_addr).context("parse bind address")?,
            self.bind_port,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_address() -> anyhow::Result<()> {
        assert_eq!(
            SocketAddr::from_str("[::1]:8080")?,
            HttpServerConfig::default().socket_addr()?
        );
        Ok(())
    }

    #[test]
    fn invalid_address() {
        let config = HttpServerConfig {
            bind_addr: "localhost".into(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
