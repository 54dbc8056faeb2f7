use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CACHE_TTL_SECS: u64 = 0;
const DEFAULT_WEBHOOK_ADDR: &str = "127.0.0.1:7071";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MCP_SSE_KEEP_ALIVE_SECS: u64 = 15;
const DEFAULT_LOG_FORMAT: &str = "compact";

#[derive(Parser, Debug)]
#[command(name = "dealer-mcpd", version, about = "Dealer MCP daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    #[arg(long, env = "DEALER_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[arg(
        long,
        env = "DEALER_CACHE_TTL_SECS",
        default_value_t = DEFAULT_CACHE_TTL_SECS
    )]
    cache_ttl_secs: u64,

    #[arg(
        long,
        env = "DEALER_CACHE_FOREVER",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    cache_forever: bool,

    #[arg(
        long,
        env = "DEALER_WEBHOOK_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    webhook_serve: bool,

    #[arg(long, env = "DEALER_WEBHOOK_ADDR", default_value = DEFAULT_WEBHOOK_ADDR)]
    webhook_addr: SocketAddr,

    #[arg(
        long,
        env = "DEALER_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long,
        env = "DEALER_MCP_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "DEALER_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "DEALER_MCP_STATEFUL",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_stateful: bool,

    #[arg(
        long,
        env = "DEALER_MCP_SSE_KEEP_ALIVE_SECS",
        default_value_t = DEFAULT_MCP_SSE_KEEP_ALIVE_SECS
    )]
    mcp_sse_keep_alive_secs: u64,

    #[arg(
        long = "stdio",
        env = "DEALER_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(long, env = "DEALER_LOG_FORMAT", default_value = DEFAULT_LOG_FORMAT)]
    log_format: String,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct DealerConfig {
    pub data_dir: PathBuf,
    /// `None` caches collections until restart; `Some(ZERO)` reloads per call.
    pub cache_ttl: Option<Duration>,
    pub webhook_serve: bool,
    pub webhook_addr: SocketAddr,
    pub request_timeout: Duration,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub mcp_stateful: bool,
    /// `None` disables SSE keep-alive pings.
    pub mcp_sse_keep_alive: Option<Duration>,
    pub enable_stdio: bool,
    pub log_format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl DealerConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for DealerConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "DEALER_DATA_DIR",
                value: String::new(),
            });
        }

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "DEALER_REQUEST_TIMEOUT_SECS",
                value: args.request_timeout_secs.to_string(),
            });
        }

        if !(args.webhook_serve || args.mcp_serve || args.enable_stdio) {
            return Err(ConfigError::MissingSetting(
                "DEALER_WEBHOOK_SERVE, DEALER_MCP_SERVE or DEALER_ENABLE_STDIO",
            ));
        }

        let Some(log_format) = LogFormat::parse(&args.log_format) else {
            return Err(ConfigError::InvalidSetting {
                name: "DEALER_LOG_FORMAT",
                value: args.log_format,
            });
        };

        let cache_ttl = if args.cache_forever {
            None
        } else {
            Some(Duration::from_secs(args.cache_ttl_secs))
        };

        let mcp_sse_keep_alive = (args.mcp_sse_keep_alive_secs > 0)
            .then(|| Duration::from_secs(args.mcp_sse_keep_alive_secs));

        Ok(Self {
            data_dir: args.data_dir,
            cache_ttl,
            webhook_serve: args.webhook_serve,
            webhook_addr: args.webhook_addr,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            mcp_stateful: args.mcp_stateful,
            mcp_sse_keep_alive,
            enable_stdio: args.enable_stdio,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_forever: false,
            webhook_serve: true,
            webhook_addr: DEFAULT_WEBHOOK_ADDR.parse().expect("valid webhook addr"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            mcp_serve: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            mcp_stateful: true,
            mcp_sse_keep_alive_secs: DEFAULT_MCP_SSE_KEEP_ALIVE_SECS,
            enable_stdio: false,
            log_format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }

    #[test]
    fn defaults_reload_per_call() {
        let config = DealerConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.cache_ttl, Some(Duration::ZERO));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.webhook_serve);
    }

    #[test]
    fn mcp_http_settings_pass_through() {
        let config = DealerConfig::try_from(base_args()).expect("config should parse");
        assert!(config.mcp_stateful);
        assert_eq!(config.mcp_sse_keep_alive, Some(Duration::from_secs(15)));

        let mut args = base_args();
        args.mcp_stateful = false;
        args.mcp_sse_keep_alive_secs = 0;

        let config = DealerConfig::try_from(args).expect("config should parse");

        assert!(!config.mcp_stateful);
        assert!(config.mcp_sse_keep_alive.is_none());
    }

    #[test]
    fn cache_forever_overrides_ttl() {
        let mut args = base_args();
        args.cache_ttl_secs = 60;
        args.cache_forever = true;

        let config = DealerConfig::try_from(args).expect("config should parse");

        assert!(config.cache_ttl.is_none());
    }

    #[test]
    fn requires_a_transport() {
        let mut args = base_args();
        args.webhook_serve = false;

        let err = DealerConfig::try_from(args).expect_err("no transport enabled");

        assert!(matches!(err, ConfigError::MissingSetting(_)));
    }

    #[test]
    fn stdio_alone_is_enough() {
        let mut args = base_args();
        args.webhook_serve = false;
        args.enable_stdio = true;

        assert!(DealerConfig::try_from(args).is_ok());
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut args = base_args();
        args.request_timeout_secs = 0;
        assert!(matches!(
            DealerConfig::try_from(args),
            Err(ConfigError::InvalidSetting { name: "DEALER_REQUEST_TIMEOUT_SECS", .. })
        ));

        let mut args = base_args();
        args.log_format = "pretty".to_string();
        assert!(matches!(
            DealerConfig::try_from(args),
            Err(ConfigError::InvalidSetting { name: "DEALER_LOG_FORMAT", .. })
        ));

        let mut args = base_args();
        args.data_dir = PathBuf::new();
        assert!(DealerConfig::try_from(args).is_err());
    }

    #[test]
    fn log_format_is_case_insensitive() {
        let mut args = base_args();
        args.log_format = " JSON ".to_string();

        let config = DealerConfig::try_from(args).expect("config should parse");

        assert_eq!(config.log_format, LogFormat::Json);
    }
}
