//! Newline-delimited JSON framing over any async byte stream
//!
//! The reading and writing halves are separate so the server can read
//! requests on one task while a single writer task owns the output stream.

use crate::mcp::error::McpError;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// One framed line from the peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundLine {
    /// Trimmed, non-blank UTF-8 text
    Text(String),
    /// The line was not valid UTF-8; carries the decoding error
    NotUtf8(String),
}

/// Reads one JSON message per line
pub struct MessageReader<R> {
    reader: BufReader<R>,
    line_buffer: Vec<u8>,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_buffer: Vec::new(),
        }
    }

    /// Next non-blank line, `None` at EOF
    ///
    /// Undecodable bytes are reported as [`InboundLine::NotUtf8`] so the
    /// caller can answer them and keep reading.
    pub async fn next_line(&mut self) -> Result<Option<InboundLine>, McpError> {
        loop {
            self.line_buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.line_buffer).await?;
            if bytes_read == 0 {
                return Ok(None);
            }

            let text = match std::str::from_utf8(&self.line_buffer) {
                Ok(text) => text,
                Err(e) => return Ok(Some(InboundLine::NotUtf8(e.to_string()))),
            };
            let line = text.trim();
            if !line.is_empty() {
                return Ok(Some(InboundLine::Text(line.to_string())));
            }
        }
    }
}

/// Writes one JSON message per line, flushing after each
pub struct MessageWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn send<T: Serialize>(&mut self, message: &T) -> Result<(), McpError> {
        let json = serde_json::to_string(message)?;

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::McpRequest;

    #[tokio::test]
    async fn test_reader_skips_blank_lines() {
        let input: &[u8] = b"\n  \n{\"a\":1}\r\n\n{\"b\":2}";
        let mut reader = MessageReader::new(input);

        assert_eq!(
            reader.next_line().await.unwrap(),
            Some(InboundLine::Text("{\"a\":1}".to_string()))
        );
        assert_eq!(
            reader.next_line().await.unwrap(),
            Some(InboundLine::Text("{\"b\":2}".to_string()))
        );
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reader_survives_invalid_utf8() {
        let input: &[u8] = b"\xff\xfe garbage\n{\"ok\":true}\n";
        let mut reader = MessageReader::new(input);

        assert!(matches!(
            reader.next_line().await.unwrap(),
            Some(InboundLine::NotUtf8(_))
        ));
        assert_eq!(
            reader.next_line().await.unwrap(),
            Some(InboundLine::Text("{\"ok\":true}".to_string()))
        );
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_writer_frames_messages() {
        let mut buffer = Vec::new();
        {
            let mut writer = MessageWriter::new(&mut buffer);
            writer.send(&McpRequest::new(1i64, "ping")).await.unwrap();
            writer.send(&McpRequest::new(2i64, "ping")).await.unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"id\":1"));
        assert!(text.ends_with('\n'));
    }
}
