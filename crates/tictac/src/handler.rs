//! Per-connection handler: receive a call, run it, send the result.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The loop is:
//!   1. Receive one frame (clean end-of-stream → done)
//!   2. Decode a `CallFrame` (a malformed frame ends this connection)
//!   3. Resolve the service through the registry
//!   4. Invoke, encode the `ResultFrame`, send

use std::sync::Arc;

use tictac_protocol::{CallFrame, Codec, ResultFrame};
use tictac_transport::{Connection, TcpConnection, TransportError};

use crate::TictacError;
use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: TcpConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), TictacError> {
    let conn_id = conn.id();
    let _active = state.stats.connection_opened();
    tracing::debug!(
        %conn_id,
        peer = ?conn.peer_addr(),
        "handling new connection"
    );

    loop {
        let data = match recv_call(&conn, &state).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                return Err(e.into());
            }
        };

        let frame: CallFrame = match state.codec.decode(&data) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(
                    %conn_id, error = %e, "malformed call frame, closing"
                );
                return Err(e.into());
            }
        };

        let service = &state.config.service_name;
        let handle = state.host.resolve(&state.registry, service);
        let result = handle.invoke(&frame.method, &frame.args);

        match &result {
            Ok(_) => tracing::debug!(
                %conn_id, %service, method = %frame.method, "call succeeded"
            ),
            Err(e) => tracing::debug!(
                %conn_id,
                %service,
                method = %frame.method,
                kind = %e.kind,
                "call rejected"
            ),
        }

        let bytes = state.codec.encode(&ResultFrame::from(result))?;
        conn.send(&bytes).await?;
    }

    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close failed");
    }
    Ok(())
}

/// Waits for the next frame, honouring the configured idle timeout.
///
/// An expired timeout is reported as a closed connection.
async fn recv_call<C: Codec>(
    conn: &TcpConnection,
    state: &ServerState<C>,
) -> Result<Option<Vec<u8>>, TransportError> {
    let Some(limit) = state.config.idle_timeout else {
        return conn.recv().await;
    };
    match tokio::time::timeout(limit, conn.recv()).await {
        Ok(received) => received,
        Err(_) => Err(TransportError::ConnectionClosed(format!(
            "idle for more than {limit:?}"
        ))),
    }
}
