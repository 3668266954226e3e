use std::path::PathBuf;

/// Immutable run configuration, built once from the CLI and passed by
/// reference into each pipeline step.
#[derive(Debug, Clone)]
pub struct Config {
    /// Local path or URL of the source feed document.
    pub source: String,
    /// Endpoint that receives each confirmed batch.
    pub endpoint: String,
    /// Bearer credential for the endpoint, if any.
    pub token: Option<String>,
    /// Records per batch.
    pub batch_size: usize,
    /// Processing-size hint forwarded to the endpoint, if configured.
    pub chunk_size: Option<u32>,
    /// Directory batch files are written to. Fixed for now; making this a
    /// flag is a possible follow-up.
    pub out_dir: PathBuf,
}

/// Fixed relative output directory for batch files.
const OUT_DIR: &str = "batches";

impl Config {
    pub fn new(
        source: String,
        endpoint: String,
        token: Option<String>,
        batch_size: usize,
        chunk_size: Option<u32>,
    ) -> Self {
        Self {
            source,
            endpoint,
            token,
            batch_size,
            chunk_size,
            out_dir: PathBuf::from(OUT_DIR),
        }
    }
}
