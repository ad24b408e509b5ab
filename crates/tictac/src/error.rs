//! Unified error type for tictac.

use tictac_protocol::ProtocolError;
use tictac_transport::TransportError;

use crate::ClientError;

/// Top-level error that wraps the per-crate errors.
///
/// `#[from]` on each variant lets `?` lift a sub-crate error into this one.
#[derive(Debug, thiserror::Error)]
pub enum TictacError {
    /// Listening, accepting, or moving frames failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A client stub call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_protocol::Codec;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let tictac_err: TictacError = err.into();
        assert!(matches!(tictac_err, TictacError::Transport(_)));
        assert!(tictac_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = tictac_protocol::JsonCodec
            .decode::<tictac_protocol::CallFrame>(b"not json")
            .unwrap_err();
        let tictac_err: TictacError = err.into();
        assert!(matches!(tictac_err, TictacError::Protocol(_)));
    }

    #[test]
    fn test_from_client_error() {
        let tictac_err: TictacError = ClientError::Disconnected.into();
        assert!(matches!(tictac_err, TictacError::Client(_)));
    }
}
