use super::config::Config;
use eyre::Result;
use flate2::write::GzEncoder;
use std::io::Write;

pub enum Stream<W: Write> {
    PlainText(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> Stream<W> {
    pub fn new(inner: W, config: &Config) -> Self {
        match config {
            Config::PlainText => Stream::PlainText(inner),
            Config::Gzip { level } => Stream::Gzip(GzEncoder::new(
                inner,
                flate2::Compression::new((*level).min(9)),
            )),
        }
    }

    /// Writes all pending data (including the GZIP trailer) and returns the inner writer.
    pub fn finish(self) -> Result<W> {
        let mut inner = match self {
            Stream::PlainText(w) => w,
            Stream::Gzip(encoder) => encoder.finish()?,
        };
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for Stream<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Stream::PlainText(w) => w.write(buf),
            Stream::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Stream::PlainText(w) => w.flush(),
            Stream::Gzip(w) => w.flush(),
        }
    }
}
