#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use std::path::Path;

#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Config {
    #[default]
    PlainText, // Store bytes as-is
    Gzip { level: u32 }, // GZIP container with the given DEFLATE level (0-9)
}

impl Config {
    pub const GZIP: Config = Config::Gzip { level: 6 };

    pub fn infer_from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext {
                "gz" | "gzip" => Config::GZIP,
                _ => Config::PlainText,
            })
            .unwrap_or(Config::PlainText)
    }
}
