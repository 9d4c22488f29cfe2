//! Input file access with transparent gzip decompression
//!
//! Network databases are commonly shipped gzip-compressed, so both input
//! files accepted by the loaders may be plain text or gzip. Compression is
//! detected from the `.gz` extension or, failing that, from the gzip magic
//! bytes at the start of the stream. The path `-` reads standard input.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, stdin, BufRead, BufReader, Read};
use std::path::Path;

/// Buffer size for input reading (128KB)
const BUFFER_SIZE: usize = 128 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open an input for line-oriented reading
///
/// # Errors
///
/// Returns an error naming the path if the file doesn't exist or can't be
/// read.
pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();

    if path.to_str() == Some("-") {
        return wrap(BufReader::with_capacity(BUFFER_SIZE, stdin()), false);
    }

    let file = File::open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;

    let gz_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    wrap(BufReader::with_capacity(BUFFER_SIZE, file), gz_extension)
}

/// Wrap an already-buffered source, decompressing if it is gzip
///
/// `force_gzip` skips magic-byte sniffing.
pub fn wrap<R>(mut reader: BufReader<R>, force_gzip: bool) -> io::Result<Box<dyn BufRead + Send>>
where
    R: Read + Send + 'static,
{
    let is_gzip = force_gzip || reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        let decoder = GzDecoder::new(reader);
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(reader))
    }
}
