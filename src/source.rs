use std::io::{self, Read};

use crate::error::Result;

const CHUNK_SIZE: usize = 64 * 1024;

/// Feeds exactly `length` bytes of `source` to `visit`, one chunk at a time.
///
/// A source that runs dry early yields `io::ErrorKind::UnexpectedEof`.
pub(crate) fn for_each_chunk<R, F>(source: R, length: u64, mut visit: F) -> Result<()>
where
    R: Read,
    F: FnMut(&[u8], u64) -> Result<()>,
{
    let mut limited = source.take(length);
    let buf_len = usize::try_from(length).map_or(CHUNK_SIZE, |l| l.min(CHUNK_SIZE));
    let mut buf = vec![0u8; buf_len.max(1)];
    let mut seen = 0u64;

    while seen < length {
        let n = match limited.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        seen += n as u64;
        visit(&buf[..n], seen)?;
    }

    if seen != length {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("source ended after {} of {} bytes", seen, length),
        )
        .into());
    }
    Ok(())
}
