mod config;
mod stream;

pub use config::Config;
pub use stream::Stream;

use eyre::{Result, WrapErr};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Opens the file for buffered reading, decompressing it on the fly if needed.
pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<BufReader<Stream<File>>> {
    let path = path.as_ref();
    let file =
        File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(Stream::new(file, config)))
}
