//! Codec trait and implementations for serializing/deserializing frames.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The transport only moves opaque byte frames; the server and client pick
//! a [`Codec`] to turn those bytes into [`CallFrame`](crate::CallFrame)s and
//! [`ResultFrame`](crate::ResultFrame)s.
//!
//! Currently we provide [`JsonCodec`]. Frames are small (a method name and a
//! couple of values), so JSON's size overhead doesn't matter and being able
//! to read a captured frame by eye does.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task through the server state.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use tictac_protocol::{CallFrame, Codec, JsonCodec, WireValue};
///
/// let codec = JsonCodec;
/// let call = CallFrame::new("makeMove", vec![WireValue::Char('X'), WireValue::Int(4)]);
///
/// let bytes = codec.encode(&call).unwrap();
/// let decoded: CallFrame = codec.decode(&bytes).unwrap();
/// assert_eq!(call, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{CallFrame, RemoteError, ResultFrame, WireValue};

    #[test]
    fn test_result_frames_survive_the_codec() {
        let codec = JsonCodec;
        let frames = [
            ResultFrame::Ok(WireValue::Str("Move accepted. Next player: O".into())),
            ResultFrame::Ok(WireValue::Chars("XXX-OO---".chars().collect())),
            ResultFrame::Ok(WireValue::Bytes(vec![0, 255, 7])),
            ResultFrame::Err(RemoteError::service_not_found("Chess")),
        ];
        for frame in frames {
            let bytes = codec.encode(&frame).unwrap();
            let decoded: ResultFrame = codec.decode(&bytes).unwrap();
            assert_eq!(decoded, frame);
        }
    }

    #[test]
    fn test_non_ascii_strings_survive_the_codec() {
        let codec = JsonCodec;
        let call = CallFrame::new("méthode", vec![WireValue::Char('✓')]);
        let decoded: CallFrame = codec.decode(&codec.encode(&call).unwrap()).unwrap();
        assert_eq!(decoded, call);
    }

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        let result: Result<CallFrame, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_shape_returns_error() {
        // A valid result frame is not a valid call frame.
        let bytes = JsonCodec
            .encode(&ResultFrame::Ok(WireValue::Bool(true)))
            .unwrap();
        let result: Result<CallFrame, _> = JsonCodec.decode(&bytes);
        assert!(result.is_err());
    }
}
