//! Collection configuration via `zvec.toml`
//!
//! Written into the collection directory on create and read back on open.
//! Options passed explicitly to `open` take precedence over the file.

use std::path::Path;
use zvec_core::{CollectionOptions, Error, Result};

/// Config file name placed in the collection directory.
pub const CONFIG_FILE_NAME: &str = "zvec.toml";

/// Default config file content, with comments.
pub fn default_toml() -> &'static str {
    r#"# zvec collection configuration
#
# Maximum number of documents per segment (default: 1000000)
segment_max_docs = 1000000

# Index build threads, 0 = one per core (default: 0)
index_build_parallel = 0

# Persist after every insert/upsert/update/delete (default: true)
# When false, call flush to make writes durable.
auto_flush = true
"#
}

/// Read and parse options from a config file.
///
/// # Errors
///
/// `Io` if the file cannot be read, `InvalidArgument` if it does not parse.
pub fn read_options(path: &Path) -> Result<CollectionOptions> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        Error::invalid_argument(format!(
            "failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Read options, falling back to defaults when the file is missing.
pub fn read_options_or_default(path: &Path) -> Result<CollectionOptions> {
    if path.exists() {
        read_options(path)
    } else {
        Ok(CollectionOptions::default())
    }
}

/// Serialize options to TOML and write them to `path`.
pub fn write_options(options: &CollectionOptions, path: &Path) -> Result<()> {
    let content = if *options == CollectionOptions::default() {
        default_toml().to_string()
    } else {
        toml::to_string_pretty(options)
            .map_err(|e| Error::internal(format!("failed to serialize config: {}", e)))?
    };
    std::fs::write(path, content)?;
    Ok(())
}
