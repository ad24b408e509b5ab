//! Error types for the protocol layer.
//!
//! Each crate in tictac defines its own error enum. A `ProtocolError` always
//! means bytes could not be turned into a frame (or back), never that a
//! call was refused; refusals travel as [`RemoteError`](crate::RemoteError)
//! values inside a valid frame.

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a frame into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a frame).
    ///
    /// Common causes: malformed JSON, an unknown value tag, or a payload
    /// that is a valid frame of the wrong direction.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
