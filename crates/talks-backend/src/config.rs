use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Conference session catalog service.
#[derive(Debug, Clone, Parser)]
#[command(name = "talks-backend", version)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "TALKS_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(long, env = "TALKS_PORT", default_value_t = 3030)]
    pub port: u16,

    /// JSON file with the sessions to load at startup, replacing the built-in set
    #[arg(long, env = "TALKS_BOOTSTRAP")]
    pub bootstrap: Option<PathBuf>,

    /// Environment variable whose value "true" marks the app as down
    #[arg(long, env = "TALKS_APP_DOWN_VAR", default_value = "isAppDown")]
    pub app_down_var: String,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_are_parsed() {
        let config = Config::try_parse_from([
            "talks-backend",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--bootstrap",
            "/srv/sessions.json",
            "--app-down-var",
            "SESSION_DOWN",
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.bootstrap, Some(PathBuf::from("/srv/sessions.json")));
        assert_eq!(config.app_down_var, "SESSION_DOWN");
    }

    #[test]
    fn rejects_invalid_ports() {
        assert!(Config::try_parse_from(["talks-backend", "--port", "http"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
