//! Length-prefixed TCP transport.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Largest frame accepted by default (1 MiB). Real frames are a few hundred
/// bytes; the cap stops a corrupt length prefix from allocating gigabytes.
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> ConnectionId {
    ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// A TCP [`Transport`] that listens for incoming connections.
pub struct TcpTransport {
    listener: TcpListener,
    max_frame_len: usize,
}

impl TcpTransport {
    /// Binds a listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "TCP transport listening");
        Ok(Self {
            listener,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        })
    }

    /// Sets the frame size limit applied to accepted connections.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for TcpTransport {
    type Connection = TcpConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let conn = TcpConnection::from_stream(stream, self.max_frame_len);
        tracing::debug!(id = %conn.id, %addr, "accepted TCP connection");
        Ok(conn)
    }
}

/// A single TCP connection carrying length-prefixed frames.
///
/// The read and write halves sit behind separate locks, so a task blocked in
/// [`recv`](Connection::recv) never stops another from sending.
pub struct TcpConnection {
    id: ConnectionId,
    peer: Option<SocketAddr>,
    reader: Mutex<BufReader<OwnedReadHalf>>,
    writer: Mutex<BufWriter<OwnedWriteHalf>>,
    max_frame_len: usize,
}

impl TcpConnection {
    /// Opens a connection to a listening server.
    pub async fn connect(
        addr: impl ToSocketAddrs,
    ) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        let conn = Self::from_stream(stream, DEFAULT_MAX_FRAME_LEN);
        tracing::debug!(id = %conn.id, peer = ?conn.peer, "connected");
        Ok(conn)
    }

    fn from_stream(stream: TcpStream, max_frame_len: usize) -> Self {
        // Frames are tiny request/response pairs; don't let Nagle hold them.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "could not set TCP_NODELAY");
        }
        let peer = stream.peer_addr().ok();
        let (read, write) = stream.into_split();
        Self {
            id: next_id(),
            peer,
            reader: Mutex::new(BufReader::new(read)),
            writer: Mutex::new(BufWriter::new(write)),
            max_frame_len,
        }
    }

    /// Sets the frame size limit for both directions.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// The remote address, if the OS reported one.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

impl Connection for TcpConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let len = u32::try_from(data.len())
            .ok()
            .filter(|&len| len as usize <= self.max_frame_len)
            .ok_or(TransportError::FrameTooLarge {
                len: data.len(),
                max: self.max_frame_len,
            })?;

        let mut writer = self.writer.lock().await;
        writer
            .write_u32(len)
            .await
            .map_err(TransportError::SendFailed)?;
        writer
            .write_all(data)
            .await
            .map_err(TransportError::SendFailed)?;
        // The peer blocks on a full frame; an unflushed tail would deadlock.
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut reader = self.reader.lock().await;

        let mut header = [0u8; 4];
        let mut filled = 0;
        while filled < header.len() {
            let n = reader
                .read(&mut header[filled..])
                .await
                .map_err(TransportError::ReceiveFailed)?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(TransportError::ConnectionClosed(
                    "stream ended inside a frame header".into(),
                ));
            }
            filled += n;
        }

        let len = u32::from_be_bytes(header) as usize;
        if len > self.max_frame_len {
            return Err(TransportError::FrameTooLarge {
                len,
                max: self.max_frame_len,
            });
        }

        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).await.map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                TransportError::ConnectionClosed(format!(
                    "stream ended inside a {len} byte frame"
                ))
            } else {
                TransportError::ReceiveFailed(e)
            }
        })?;
        Ok(Some(body))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        let mut writer = self.writer.lock().await;
        writer.flush().await.map_err(TransportError::SendFailed)?;
        writer.shutdown().await.map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
