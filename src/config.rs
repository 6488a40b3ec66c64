use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Maximum accepted request body size in bytes. Must leave headroom for
    /// base64-encoded photos.
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "26214400")]
    pub max_body_bytes: usize,

    /// Prediction endpoint of the upstream classifier service
    #[arg(
        long,
        env = "CLASSIFIER_URL",
        default_value = "http://127.0.0.1:5000/predict"
    )]
    pub classifier_url: String,
}

impl Config {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
