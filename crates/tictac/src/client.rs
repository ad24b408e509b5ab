//! Client stubs: the same five game operations, in-process or over TCP.
//!
//! Every stub implements [`GameClient`]. An implementation only provides
//! [`GameClient::call`]; the typed `try_*` operations and the sentinel
//! wrappers are built on top of it.
//!
//! The sentinel wrappers never fail. When a call cannot complete they
//! return a fixed fallback value instead:
//!
//! | operation            | fallback                              |
//! |----------------------|---------------------------------------|
//! | `make_move`          | the rule message, or `"Error: <msg>"` |
//! | `get_board`          | nine `'\0'` cells                     |
//! | `get_status`         | `"ERROR"`                             |
//! | `get_current_player` | `'X'`                                 |
//! | `reset_game`         | `"Error: <msg>"`                      |

use std::sync::Arc;

use tictac_game::{CELL_COUNT, Player};
use tictac_protocol::{
    Codec, GameCall, JsonCodec, Method, ProtocolError, RemoteError,
    ResultFrame, WireValue,
};
use tictac_service::{DEFAULT_SERVICE, Registry, ServiceHost};
use tictac_transport::{Connection, TcpConnection, TransportError};
use tokio::net::ToSocketAddrs;
use tokio::sync::Mutex;

/// Status string returned by [`GameClient::get_status`] on failure.
pub const STATUS_ERROR: &str = "ERROR";

/// Why a client call did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The connection failed while sending or receiving.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The service refused the call.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The service answered with a value of the wrong shape.
    #[error("unexpected {got} response to {method}")]
    UnexpectedResponse { method: Method, got: &'static str },

    /// The client has no open connection.
    #[error("not connected to the game server")]
    Disconnected,
}

/// The five game operations.
pub trait GameClient {
    /// Runs one call against the service.
    async fn call(&self, call: GameCall) -> Result<WireValue, ClientError>;

    async fn try_make_move(
        &self,
        player: Player,
        position: i32,
    ) -> Result<String, ClientError> {
        let value = self.call(GameCall::MakeMove { player, position }).await?;
        into_string(Method::MakeMove, value)
    }

    /// Like [`try_make_move`](Self::try_make_move) for callers holding a
    /// raw player mark. Anything but `'X'` or `'O'` is `InvalidArguments`.
    async fn try_make_move_char(
        &self,
        player: char,
        position: i32,
    ) -> Result<String, ClientError> {
        let Some(player) = Player::from_char(player) else {
            return Err(RemoteError::invalid_arguments(
                Method::MakeMove.as_str(),
                format_args!("player must be 'X' or 'O', got {player:?}"),
            )
            .into());
        };
        self.try_make_move(player, position).await
    }

    async fn try_get_board(&self) -> Result<[char; CELL_COUNT], ClientError> {
        let value = self.call(GameCall::GetBoard).await?;
        value
            .as_chars()
            .and_then(|cells| <[char; CELL_COUNT]>::try_from(cells).ok())
            .ok_or(ClientError::UnexpectedResponse {
                method: Method::GetBoard,
                got: value.type_name(),
            })
    }

    async fn try_get_status(&self) -> Result<String, ClientError> {
        let value = self.call(GameCall::GetStatus).await?;
        into_string(Method::GetStatus, value)
    }

    async fn try_get_current_player(&self) -> Result<char, ClientError> {
        let value = self.call(GameCall::GetCurrentPlayer).await?;
        value.as_char().ok_or(ClientError::UnexpectedResponse {
            method: Method::GetCurrentPlayer,
            got: value.type_name(),
        })
    }

    async fn try_reset_game(&self) -> Result<String, ClientError> {
        let value = self.call(GameCall::ResetGame).await?;
        into_string(Method::ResetGame, value)
    }

    /// Submits a move. Rule violations come back as their message.
    async fn make_move(&self, player: Player, position: i32) -> String {
        self.try_make_move(player, position)
            .await
            .unwrap_or_else(|e| error_message(&e))
    }

    async fn make_move_char(&self, player: char, position: i32) -> String {
        self.try_make_move_char(player, position)
            .await
            .unwrap_or_else(|e| error_message(&e))
    }

    async fn get_board(&self) -> [char; CELL_COUNT] {
        self.try_get_board().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "getBoard failed");
            ['\0'; CELL_COUNT]
        })
    }

    async fn get_status(&self) -> String {
        self.try_get_status().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "getStatus failed");
            STATUS_ERROR.to_string()
        })
    }

    async fn get_current_player(&self) -> char {
        self.try_get_current_player().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "getCurrentPlayer failed");
            Player::X.as_char()
        })
    }

    async fn reset_game(&self) -> String {
        self.try_reset_game()
            .await
            .unwrap_or_else(|e| error_message(&e))
    }
}

fn into_string(method: Method, value: WireValue) -> Result<String, ClientError> {
    match value {
        WireValue::Str(s) => Ok(s),
        other => Err(ClientError::UnexpectedResponse {
            method,
            got: other.type_name(),
        }),
    }
}

/// Remote errors already carry a caller-facing message; everything else is
/// prefixed with `"Error: "`.
fn error_message(err: &ClientError) -> String {
    match err {
        ClientError::Remote(remote) => remote.message.clone(),
        other => {
            tracing::warn!(error = %other, "call failed");
            format!("Error: {other}")
        }
    }
}

// ---------------------------------------------------------------------------
// LocalGameClient
// ---------------------------------------------------------------------------

/// Calls the service in-process, without a socket.
///
/// Each call looks the service up in the registry. On a miss it asks the
/// host for a fresh handle and caches it, so unbinding the service only
/// costs the next caller one extra lookup.
#[derive(Debug, Clone)]
pub struct LocalGameClient {
    registry: Arc<Registry>,
    host: Arc<ServiceHost>,
    service_name: String,
}

impl LocalGameClient {
    pub fn new(registry: Arc<Registry>, host: Arc<ServiceHost>) -> Self {
        Self {
            registry,
            host,
            service_name: DEFAULT_SERVICE.to_string(),
        }
    }

    /// Targets a service other than [`DEFAULT_SERVICE`].
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl GameClient for LocalGameClient {
    async fn call(&self, call: GameCall) -> Result<WireValue, ClientError> {
        let handle = self.host.resolve(&self.registry, &self.service_name);
        Ok(handle.call(call)?)
    }
}

// ---------------------------------------------------------------------------
// RemoteGameClient
// ---------------------------------------------------------------------------

/// Calls the service over one TCP connection.
///
/// The connection lock is held for the whole send/receive exchange, so
/// concurrent callers sharing one client take turns and their frames never
/// interleave. A transport failure, or a call abandoned before its reply
/// arrived, drops the connection; every later call fails with
/// [`ClientError::Disconnected`].
pub struct RemoteGameClient<C: Codec = JsonCodec> {
    conn: Mutex<Option<TcpConnection>>,
    codec: C,
}

impl RemoteGameClient<JsonCodec> {
    /// Connects to a server using JSON frames.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        Self::connect_with_codec(addr, JsonCodec).await
    }
}

impl<C: Codec> RemoteGameClient<C> {
    pub async fn connect_with_codec(
        addr: impl ToSocketAddrs,
        codec: C,
    ) -> Result<Self, ClientError> {
        let conn = TcpConnection::connect(addr).await?;
        tracing::info!(
            conn_id = %conn.id(),
            peer = ?conn.peer_addr(),
            "connected to game server"
        );
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            codec,
        })
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Closes the connection. Later calls fail with
    /// [`ClientError::Disconnected`].
    pub async fn disconnect(&self) {
        let Some(conn) = self.conn.lock().await.take() else {
            return;
        };
        let conn_id = conn.id();
        if let Err(e) = conn.close().await {
            tracing::debug!(%conn_id, error = %e, "close failed");
        }
        tracing::info!(%conn_id, "disconnected from game server");
    }

    async fn exchange(
        conn: &TcpConnection,
        request: &[u8],
    ) -> Result<Vec<u8>, ClientError> {
        conn.send(request).await?;
        conn.recv().await?.ok_or(ClientError::Disconnected)
    }
}

impl<C: Codec> GameClient for RemoteGameClient<C> {
    async fn call(&self, call: GameCall) -> Result<WireValue, ClientError> {
        let request = self.codec.encode(&call.to_frame())?;

        // The connection stays out of the slot while a reply is outstanding,
        // so a dropped call leaves the client disconnected, not out of step.
        let mut slot = self.conn.lock().await;
        let Some(conn) = slot.take() else {
            return Err(ClientError::Disconnected);
        };
        let conn_id = conn.id();

        let response = match Self::exchange(&conn, &request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    %conn_id,
                    method = %call.method(),
                    error = %e,
                    "call failed, dropping connection"
                );
                return Err(e);
            }
        };
        *slot = Some(conn);
        drop(slot);

        let result: ResultFrame = self.codec.decode(&response)?;
        Ok(result.into_result()?)
    }
}

impl<C: Codec> std::fmt::Debug for RemoteGameClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteGameClient").finish_non_exhaustive()
    }
}
