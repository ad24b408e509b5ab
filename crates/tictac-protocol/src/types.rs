//! Core types for tictac's wire format.
//!
//! Everything in this module travels "on the wire": it is serialized by a
//! [`Codec`](crate::Codec), written as one frame, and deserialized on the
//! other side.
//!
//! A client sends one [`CallFrame`] and gets back exactly one
//! [`ResultFrame`]. There are no request ids: a connection carries a single
//! sequential stream of calls, so the N-th result always answers the N-th
//! call.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WireValue: a self-describing argument or result
// ---------------------------------------------------------------------------

/// A single typed value as it appears on the wire.
///
/// `#[serde(tag = "type", content = "value")]` makes every value carry its
/// own type tag, so a decoder never has to guess:
///   `{ "type": "Int", "value": 4 }`
///   `{ "type": "Chars", "value": ["X", "-", "O", ...] }`
///
/// This is what "self-describing" means for the protocol. Method arguments
/// and results are both lists/values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum WireValue {
    /// A UTF-8 string.
    Str(String),
    /// A 32-bit signed integer.
    Int(i32),
    /// A single character.
    Char(char),
    /// A boolean.
    Bool(bool),
    /// A fixed-length array of characters (e.g. the 9-cell board).
    Chars(Vec<char>),
    /// A fixed-length array of raw bytes.
    Bytes(Vec<u8>),
}

impl WireValue {
    /// The tag name, used in error messages ("expected Char, got Int").
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "Str",
            Self::Int(_) => "Int",
            Self::Char(_) => "Char",
            Self::Bool(_) => "Bool",
            Self::Chars(_) => "Chars",
            Self::Bytes(_) => "Bytes",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_chars(&self) -> Option<&[char]> {
        match self {
            Self::Chars(cs) => Some(cs),
            _ => None,
        }
    }
}

// `From` impls let callers write `WireValue::from(4)` or `'X'.into()`.

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<i32> for WireValue {
    fn from(n: i32) -> Self {
        Self::Int(n)
    }
}

impl From<char> for WireValue {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<bool> for WireValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<const N: usize> From<[char; N]> for WireValue {
    fn from(cs: [char; N]) -> Self {
        Self::Chars(cs.to_vec())
    }
}

// ---------------------------------------------------------------------------
// CallFrame: client → server
// ---------------------------------------------------------------------------

/// One remote method call: a method name and its ordered arguments.
///
/// The frame does not name a service; the server routes every call on a
/// connection to the service it was configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFrame {
    /// The method to invoke, e.g. `"makeMove"`.
    pub method: String,

    /// Positional arguments. Missing in JSON means "no arguments".
    #[serde(default)]
    pub args: Vec<WireValue>,
}

impl CallFrame {
    /// Creates a call frame.
    pub fn new(method: impl Into<String>, args: Vec<WireValue>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors that travel as values
// ---------------------------------------------------------------------------

/// The category of a failed call.
///
/// These are *expected* outcomes that are sent back as data, never as a
/// dropped connection. A caller can always match on the kind; the
/// accompanying message is for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No service is registered under the requested name.
    ServiceNotFound,
    /// The method name is not part of the service's operation set.
    UnknownMethod,
    /// Wrong argument count or types.
    InvalidArguments,
    /// The round is already over.
    GameOver,
    /// The mover is not the player on turn.
    WrongTurn,
    /// The position is outside `0..=8`.
    OutOfRange,
    /// The cell is taken.
    CellOccupied,
}

impl ErrorKind {
    /// Returns `true` for the game-rule rejections (as opposed to calls the
    /// dispatcher could not route).
    pub fn is_rule_violation(self) -> bool {
        matches!(
            self,
            Self::GameOver
                | Self::WrongTurn
                | Self::OutOfRange
                | Self::CellOccupied
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ServiceNotFound => "ServiceNotFound",
            Self::UnknownMethod => "UnknownMethod",
            Self::InvalidArguments => "InvalidArguments",
            Self::GameOver => "GameOver",
            Self::WrongTurn => "WrongTurn",
            Self::OutOfRange => "OutOfRange",
            Self::CellOccupied => "CellOccupied",
        };
        f.write_str(name)
    }
}

/// An error result: a machine-readable kind plus a human-readable message.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error,
)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn service_not_found(service: &str) -> Self {
        Self::new(
            ErrorKind::ServiceNotFound,
            format!("Error: Service '{service}' not found."),
        )
    }

    pub fn unknown_method(method: &str) -> Self {
        Self::new(
            ErrorKind::UnknownMethod,
            format!("Error: Unknown method '{method}'."),
        )
    }

    pub fn invalid_arguments(method: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InvalidArguments,
            format!("Error: Invalid parameters for {method}: {detail}"),
        )
    }
}

impl From<tictac_game::MoveError> for RemoteError {
    fn from(err: tictac_game::MoveError) -> Self {
        use tictac_game::MoveError;

        let kind = match err {
            MoveError::GameOver(_) => ErrorKind::GameOver,
            MoveError::WrongTurn { .. } => ErrorKind::WrongTurn,
            MoveError::OutOfRange(_) => ErrorKind::OutOfRange,
            MoveError::CellOccupied(_) => ErrorKind::CellOccupied,
        };
        Self::new(kind, err.to_string())
    }
}

// ---------------------------------------------------------------------------
// ResultFrame: server → client
// ---------------------------------------------------------------------------

/// The answer to one [`CallFrame`].
///
/// `#[serde(tag = "result", content = "data")]` produces:
///   `{ "result": "Ok", "data": { "type": "Str", "value": "..." } }`
///   `{ "result": "Err", "data": { "kind": "WrongTurn", "message": "..." } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "data")]
pub enum ResultFrame {
    Ok(WireValue),
    Err(RemoteError),
}

impl ResultFrame {
    /// Converts into a plain `Result`.
    pub fn into_result(self) -> Result<WireValue, RemoteError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(err) => Err(err),
        }
    }
}

impl From<Result<WireValue, RemoteError>> for ResultFrame {
    fn from(result: Result<WireValue, RemoteError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Err(err),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The JSON shapes below are the wire format. A mismatch here means an
    //! older client can no longer parse our frames.

    use super::*;
    use tictac_game::{MoveError, Player, Status};

    #[test]
    fn test_wire_value_is_adjacently_tagged() {
        let json = serde_json::to_value(WireValue::Int(4)).unwrap();
        assert_eq!(json["type"], "Int");
        assert_eq!(json["value"], 4);

        let json = serde_json::to_value(WireValue::Char('X')).unwrap();
        assert_eq!(json["type"], "Char");
        assert_eq!(json["value"], "X");
    }

    #[test]
    fn test_board_chars_json_format() {
        let value = WireValue::from(['X', '-', 'O']);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "Chars");
        assert_eq!(json["value"], serde_json::json!(["X", "-", "O"]));
    }

    #[test]
    fn test_call_frame_args_default_to_empty() {
        let frame: CallFrame =
            serde_json::from_str(r#"{ "method": "getBoard" }"#).unwrap();
        assert_eq!(frame, CallFrame::new("getBoard", vec![]));
    }

    #[test]
    fn test_call_frame_round_trip_preserves_argument_order() {
        let frame = CallFrame::new(
            "makeMove",
            vec![WireValue::Char('X'), WireValue::Int(4)],
        );
        let bytes = serde_json::to_vec(&frame).unwrap();
        let decoded: CallFrame = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(frame, decoded);
    }

    #[test]
    fn test_result_frame_err_json_format() {
        let frame = ResultFrame::Err(RemoteError::unknown_method("fly"));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["result"], "Err");
        assert_eq!(json["data"]["kind"], "UnknownMethod");
        assert_eq!(json["data"]["message"], "Error: Unknown method 'fly'.");
    }

    #[test]
    fn test_result_frame_ok_round_trip() {
        let frame = ResultFrame::Ok(WireValue::Bool(true));
        let bytes = serde_json::to_vec(&frame).unwrap();
        let decoded: ResultFrame = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(frame, decoded);
    }

    #[test]
    fn test_move_error_maps_to_kind_and_message() {
        let err: RemoteError =
            MoveError::WrongTurn { current: Player::X }.into();
        assert_eq!(err.kind, ErrorKind::WrongTurn);
        assert_eq!(err.message, "Not your turn! Current player: X");
        assert!(err.kind.is_rule_violation());

        let err: RemoteError = MoveError::GameOver(Status::Draw).into();
        assert_eq!(err.kind, ErrorKind::GameOver);
    }

    #[test]
    fn test_routing_errors_are_not_rule_violations() {
        assert!(!ErrorKind::ServiceNotFound.is_rule_violation());
        assert!(!ErrorKind::UnknownMethod.is_rule_violation());
        assert!(!ErrorKind::InvalidArguments.is_rule_violation());
    }

    #[test]
    fn test_decode_unknown_value_type_returns_error() {
        let unknown = r#"{ "type": "Float", "value": 1.5 }"#;
        let result: Result<WireValue, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_value_accessors() {
        assert_eq!(WireValue::Int(3).as_int(), Some(3));
        assert_eq!(WireValue::Int(3).as_char(), None);
        assert_eq!(WireValue::from("hi").as_str(), Some("hi"));
        assert_eq!(WireValue::Bool(false).as_bool(), Some(false));
        assert_eq!(WireValue::Bytes(vec![1]).type_name(), "Bytes");
    }
}
