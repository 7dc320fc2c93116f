use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments; CLI wins.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// GCS bucket to serve from. `None` is an incomplete configuration:
    /// the server still starts but answers proxied requests with a
    /// configuration error.
    pub bucket: Option<String>,
    pub project_id: Option<String>,
    /// Service account key file; application default credentials are used
    /// when absent.
    pub key_file: Option<String>,
    /// Development mode: transient error responses include store error
    /// detail instead of a generic message.
    pub dev_mode: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "GCS origin proxy for CDN-fronted static content")]
pub struct Args {
    /// Host to bind to (overrides GCS_PROXY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Bucket to serve objects from (overrides GCS_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Google Cloud project id (overrides GOOGLE_CLOUD_PROJECT_ID)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Service account key file path (overrides GOOGLE_CLOUD_KEY_FILE)
    #[arg(long)]
    pub key_file: Option<String>,

    /// Include store error detail in error responses
    #[arg(long)]
    pub dev: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> anyhow::Result<Self> {
        let args = Args::parse();
        Self::merge(args)
    }

    fn merge(args: Args) -> anyhow::Result<Self> {
        use anyhow::Context;

        // --- Environment fallback ---
        let env_host = env::var("GCS_PROXY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 8080,
            Err(err) => return Err(err).context("reading PORT"),
        };
        let env_bucket = env::var("GCS_BUCKET_NAME").ok().filter(|v| !v.is_empty());
        let env_project = env::var("GOOGLE_CLOUD_PROJECT_ID")
            .ok()
            .filter(|v| !v.is_empty());
        let env_key_file = env::var("GOOGLE_CLOUD_KEY_FILE")
            .ok()
            .filter(|v| !v.is_empty());
        let env_dev = env::var("GCS_PROXY_ENV")
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            bucket: args.bucket.or(env_bucket),
            project_id: args.project_id.or(env_project),
            key_file: args.key_file.or(env_key_file),
            dev_mode: args.dev || env_dev,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
