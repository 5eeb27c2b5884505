#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use eyre::{ensure, Result};
use std::path::Path;

#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Config {
    #[default]
    PlainText, // Bytes are read as-is
    Gzip, // (Multi-member) GZIP container
}

impl Config {
    /// Infers the compression from the file extension, falling back to the file signature.
    pub fn infer_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ensure!(path.exists(), "File {} does not exist", path.display());

        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext, "gz" | "gzip"))
            .unwrap_or(false);
        if by_extension {
            return Ok(Config::Gzip);
        }

        let config = match infer::get_from_path(path)? {
            Some(kind) if kind.mime_type() == "application/gzip" => Config::Gzip,
            // Always assume plain text if there is no clear match
            _ => Config::PlainText,
        };
        Ok(config)
    }
}
