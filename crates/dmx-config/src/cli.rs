use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

/// Process-level configuration: everything needed before the persisted
/// config directory has even been read. CLI args win over env vars, which
/// win over the defaults below.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliConfig {
	/// Address the HTTP API listens on
	#[arg(long, env = "DMX_BIND_ADDR", default_value = "0.0.0.0")]
	pub bind_addr: IpAddr,

	/// Port the HTTP API listens on
	#[arg(long, env = "DMX_HTTP_PORT", default_value = "8080")]
	pub http_port: u16,

	/// Directory holding settings.json and config.json
	#[arg(long, env = "DMX_CONFIG_DIR", default_value = "./config")]
	pub config_dir: PathBuf,

	/// Exit with code 2 if the MQTT broker is unreachable after max backoff
	#[arg(long, env = "DMX_REQUIRE_BROKER")]
	pub require_broker: bool,

	/// tracing-subscriber env filter
	#[arg(long, env = "RUST_LOG", default_value = "info")]
	pub log_filter: String,

	/// Emit logs as JSON instead of pretty text
	#[arg(long, env = "DMX_LOG_JSON")]
	pub log_json: bool,
}

impl CliConfig {
	pub fn new() -> Self {
		Self::parse()
	}

	pub fn default() -> Self {
		Self {
			bind_addr: IpAddr::from([0, 0, 0, 0]),
			http_port: 8080,
			config_dir: PathBuf::from("./config"),
			require_broker: false,
			log_filter: "info".to_string(),
			log_json: false,
		}
	}

	#[cfg(test)]
	pub fn test() -> Self {
		Self {
			bind_addr: IpAddr::from([127, 0, 0, 1]),
			http_port: 0,
			config_dir: PathBuf::from("/tmp/dmx-test-config"),
			require_broker: false,
			log_filter: "debug".to_string(),
			log_json: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_binds_all_interfaces_on_8080() {
		let config = CliConfig::default();
		assert_eq!(config.http_port, 8080);
		assert!(!config.require_broker);
	}

	#[test]
	fn parses_from_args() {
		let args = vec!["program", "--http-port", "9000", "--require-broker", "--config-dir", "/etc/dmx"];
		let config = CliConfig::try_parse_from(args).unwrap();
		assert_eq!(config.http_port, 9000);
		assert!(config.require_broker);
		assert_eq!(config.config_dir, PathBuf::from("/etc/dmx"));
	}
}
