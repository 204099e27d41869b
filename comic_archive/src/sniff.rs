//! Content type detection that leaves the stream readable from the start.

use std::io::{self, Chain, Cursor, Read};

/// How many leading bytes are inspected.
pub const SNIFF_LIMIT: u64 = 3072;

/// Media type reported for content that matches no known signature.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Page media types accepted by the loader.
const PAGE_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

/// A stream that yields the sniffed prefix, then the rest of the source.
pub type Sniffed<R> = Chain<Cursor<Vec<u8>>, R>;

/// Detect the media type of `reader` from its first [`SNIFF_LIMIT`] bytes.
///
/// The returned reader replays those bytes before continuing with the source,
/// so the caller still sees the full content exactly once. A type that is not
/// wanted is not an error here; only a failed read is.
pub fn sniff<R: Read>(mut reader: R) -> io::Result<(&'static str, Sniffed<R>)> {
    let mut header = Vec::with_capacity(SNIFF_LIMIT as usize);
    reader.by_ref().take(SNIFF_LIMIT).read_to_end(&mut header)?;
    let media_type = sniff_bytes(&header);
    Ok((media_type, Cursor::new(header).chain(reader)))
}

/// Media type of an in-memory buffer.
pub fn sniff_bytes(data: &[u8]) -> &'static str {
    let prefix = &data[..data.len().min(SNIFF_LIMIT as usize)];
    match image::guess_format(prefix) {
        Ok(format) => format.to_mime_type(),
        Err(_) => UNKNOWN_MEDIA_TYPE,
    }
}

pub fn is_page_media_type(media_type: &str) -> bool {
    PAGE_MEDIA_TYPES.contains(&media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

    #[derive(Debug)]
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_detects_page_types() {
        assert_eq!(sniff_bytes(PNG), "image/png");
        assert_eq!(sniff_bytes(JPEG), "image/jpeg");
        assert!(is_page_media_type(sniff_bytes(PNG)));
        assert!(is_page_media_type("image/jpg"));
    }

    #[test]
    fn test_unknown_content() {
        assert_eq!(sniff_bytes(b"just some text"), UNKNOWN_MEDIA_TYPE);
        assert_eq!(sniff_bytes(b""), UNKNOWN_MEDIA_TYPE);
        assert!(!is_page_media_type(UNKNOWN_MEDIA_TYPE));
        assert!(!is_page_media_type("image/gif"));
    }

    #[test]
    fn test_replays_whole_stream() {
        let mut content = PNG.to_vec();
        content.extend((0..10_000u32).map(|i| (i % 251) as u8));

        let (media_type, mut replay) = sniff(Cursor::new(content.clone())).unwrap();
        assert_eq!(media_type, "image/png");

        let mut out = Vec::new();
        replay.read_to_end(&mut out).unwrap();
        assert_eq!(out, content);
    }

    #[test]
    fn test_short_stream() {
        let (media_type, mut replay) = sniff(JPEG).unwrap();
        assert_eq!(media_type, "image/jpeg");
        let mut out = Vec::new();
        replay.read_to_end(&mut out).unwrap();
        assert_eq!(out, JPEG);
    }

    #[test]
    fn test_read_failure() {
        let err = sniff(FailingReader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
