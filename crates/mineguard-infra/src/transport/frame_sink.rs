//! Length-prefixed TCP frames
//!
//! Every message is a 4-byte big-endian payload length followed by the
//! payload bytes. A failed write drops the connection; the caller decides
//! when to reconnect.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use mineguard_types::{Error, Result};
use tracing::{info, warn};

/// Largest payload [`read_frame`] accepts; a batch for a full pit is a few KiB
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Write one frame and flush
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    let len = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "frame exceeds u32 length"))?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()
}

/// Read one frame written by [`write_frame`]
///
/// Headers announcing more than [`MAX_FRAME_LEN`] bytes are rejected with
/// `InvalidData` before anything is allocated.
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;
    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame length {len} exceeds {MAX_FRAME_LEN}"),
        ));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

/// TCP client that ships frames to the backend
#[derive(Debug)]
pub struct FrameSink {
    host: String,
    port: u16,
    stream: Option<TcpStream>,
}

impl FrameSink {
    /// Not connected until [`connect`](Self::connect) succeeds
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            stream: None,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .map_err(|e| Error::Transport(format!("connect to {} failed: {}", self.address(), e)))?;
        stream.set_nodelay(true)?;

        info!(address = %self.address(), "connected");
        self.stream = Some(stream);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.stream = None;
    }

    pub fn reconnect(&mut self) -> Result<()> {
        self.disconnect();
        self.connect()
    }

    /// Send one frame; on failure the connection is dropped
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(Error::Transport("not connected".to_string()));
        };

        if let Err(e) = write_frame(stream, payload) {
            warn!(address = %self.address(), error = %e, "send failed, disconnecting");
            self.disconnect();
            return Err(Error::Transport(format!("send failed: {}", e)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_frame_header_is_big_endian() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"hello").unwrap();
        assert_eq!(&buf[..4], &[0, 0, 0, 5]);
        assert_eq!(&buf[4..], b"hello");
    }

    #[test]
    fn test_read_back_consecutive_frames() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"{}").unwrap();
        write_frame(&mut buf, b"").unwrap();
        write_frame(&mut buf, b"[1,2]").unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_frame(&mut cursor).unwrap(), b"{}");
        assert_eq!(read_frame(&mut cursor).unwrap(), b"");
        assert_eq!(read_frame(&mut cursor).unwrap(), b"[1,2]");
        assert!(read_frame(&mut cursor).is_err());
    }

    #[test]
    fn test_oversized_header_rejected() {
        let mut cursor = Cursor::new(vec![0xff, 0xff, 0xff, 0xff, b'x']);
        let err = read_frame(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut buf = (MAX_FRAME_LEN as u32 + 1).to_be_bytes().to_vec();
        buf.extend_from_slice(b"{}");
        let err = read_frame(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_send_without_connection() {
        let mut sink = FrameSink::new("127.0.0.1", 1);
        assert!(!sink.is_connected());
        assert!(matches!(sink.send(b"x"), Err(Error::Transport(_))));
    }

    #[test]
    fn test_send_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let first = read_frame(&mut conn).unwrap();
            let second = read_frame(&mut conn).unwrap();
            (first, second)
        });

        let mut sink = FrameSink::new("127.0.0.1", port);
        sink.connect().unwrap();
        assert!(sink.is_connected());
        sink.send(br#"{"type":"batch"}"#).unwrap();
        sink.send(b"second").unwrap();

        let (first, second) = server.join().unwrap();
        assert_eq!(first, br#"{"type":"batch"}"#);
        assert_eq!(second, b"second");
    }
}
