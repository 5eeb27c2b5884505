mod config;
mod stream;

pub use config::Config;
pub use stream::Stream;

use eyre::{Result, WrapErr};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Creates (or truncates) the file and wraps it into a compressing stream.
pub fn create(path: impl AsRef<Path>, config: &Config) -> Result<Stream<BufWriter<File>>> {
    let path = path.as_ref();
    let file =
        File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    Ok(Stream::new(BufWriter::new(file), config))
}
