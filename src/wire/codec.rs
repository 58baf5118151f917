//! Length-prefixed frame codec over any async byte stream

use crate::error::{EngineError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Hard cap on a single frame. A length field above this is a protocol
/// violation, not an allocation request.
pub const MAX_FRAME_LEN: usize = 256 * 1024 * 1024;

/// A typed point-to-point channel: `send` a serializable message, `recv`
/// the expected message type. The receiver sizes its buffer from the
/// length field, so no buffer is reused across differently-sized frames.
pub struct Channel<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Channel<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub async fn send<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let payload = serde_json::to_vec(message)?;
        if payload.len() > MAX_FRAME_LEN {
            return Err(EngineError::Protocol(format!(
                "outgoing frame of {} bytes exceeds the {} byte cap",
                payload.len(),
                MAX_FRAME_LEN
            )));
        }
        self.writer
            .write_all(&(payload.len() as u32).to_be_bytes())
            .await?;
        self.writer.write_all(&payload).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn recv<T: DeserializeOwned>(&mut self) -> Result<T> {
        let mut len_buf = [0u8; 4];
        self.reader
            .read_exact(&mut len_buf)
            .await
            .map_err(|e| map_eof(e, "channel closed before length field"))?;
        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_FRAME_LEN {
            return Err(EngineError::Protocol(format!(
                "incoming frame length {len} exceeds the {MAX_FRAME_LEN} byte cap"
            )));
        }

        let mut payload = vec![0u8; len];
        self.reader
            .read_exact(&mut payload)
            .await
            .map_err(|e| map_eof(e, "channel closed before full payload"))?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

// A peer hanging up mid-frame is malformed message ordering, not plain IO.
fn map_eof(err: std::io::Error, context: &str) -> EngineError {
    if err.kind() == ErrorKind::UnexpectedEof {
        EngineError::Protocol(context.to_string())
    } else {
        EngineError::Io(err)
    }
}
