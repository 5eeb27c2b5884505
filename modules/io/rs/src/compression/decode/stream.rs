use super::config::Config;
use flate2::read::MultiGzDecoder;
use std::io::Read;

pub enum Stream<R: Read> {
    PlainText(R),
    Gzip(MultiGzDecoder<R>),
}

impl<R: Read> Stream<R> {
    pub fn new(inner: R, config: &Config) -> Self {
        match config {
            Config::PlainText => Stream::PlainText(inner),
            Config::Gzip => Stream::Gzip(MultiGzDecoder::new(inner)),
        }
    }
}

impl<R: Read> Read for Stream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Stream::PlainText(r) => r.read(buf),
            Stream::Gzip(r) => r.read(buf),
        }
    }
}
