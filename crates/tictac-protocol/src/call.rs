//! The closed set of game operations.
//!
//! On the wire a call is just a method name and a list of values. Before
//! anything touches game state, the server turns that pair into a
//! [`GameCall`]: one enum variant per method, with strongly typed
//! arguments. Any name outside the set, or any argument list that doesn't
//! fit, is rejected here with a [`RemoteError`] value.

use std::fmt;
use std::str::FromStr;

use tictac_game::Player;

use crate::{CallFrame, RemoteError, WireValue};

/// The method names of the game service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    MakeMove,
    GetBoard,
    GetStatus,
    GetCurrentPlayer,
    ResetGame,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Method; 5] = [
        Self::MakeMove,
        Self::GetBoard,
        Self::GetStatus,
        Self::GetCurrentPlayer,
        Self::ResetGame,
    ];

    /// The wire name, e.g. `"makeMove"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MakeMove => "makeMove",
            Self::GetBoard => "getBoard",
            Self::GetStatus => "getStatus",
            Self::GetCurrentPlayer => "getCurrentPlayer",
            Self::ResetGame => "resetGame",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RemoteError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| RemoteError::unknown_method(name))
    }
}

/// A fully validated call against the game service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCall {
    MakeMove { player: Player, position: i32 },
    GetBoard,
    GetStatus,
    GetCurrentPlayer,
    ResetGame,
}

impl GameCall {
    pub fn method(&self) -> Method {
        match self {
            Self::MakeMove { .. } => Method::MakeMove,
            Self::GetBoard => Method::GetBoard,
            Self::GetStatus => Method::GetStatus,
            Self::GetCurrentPlayer => Method::GetCurrentPlayer,
            Self::ResetGame => Method::ResetGame,
        }
    }

    /// Parses a raw method name and argument list.
    ///
    /// # Errors
    /// - `UnknownMethod` if `method` is not one of the five names.
    /// - `InvalidArguments` if the arguments don't match the method:
    ///   `makeMove` takes exactly `[Char('X'|'O'), Int]`, every other
    ///   method takes none.
    pub fn parse(method: &str, args: &[WireValue]) -> Result<Self, RemoteError> {
        let method: Method = method.parse()?;

        match method {
            Method::MakeMove => {
                let [player, position] = args else {
                    return Err(RemoteError::invalid_arguments(
                        method.as_str(),
                        format_args!("expected 2 arguments, got {}", args.len()),
                    ));
                };
                let player = player
                    .as_char()
                    .ok_or_else(|| mismatch(method, "Char", player))?;
                let player = Player::from_char(player).ok_or_else(|| {
                    RemoteError::invalid_arguments(
                        method.as_str(),
                        format_args!("player must be 'X' or 'O', got {player:?}"),
                    )
                })?;
                let position = position
                    .as_int()
                    .ok_or_else(|| mismatch(method, "Int", position))?;
                Ok(Self::MakeMove { player, position })
            }
            _ if !args.is_empty() => Err(RemoteError::invalid_arguments(
                method.as_str(),
                format_args!("expected no arguments, got {}", args.len()),
            )),
            Method::GetBoard => Ok(Self::GetBoard),
            Method::GetStatus => Ok(Self::GetStatus),
            Method::GetCurrentPlayer => Ok(Self::GetCurrentPlayer),
            Method::ResetGame => Ok(Self::ResetGame),
        }
    }

    /// Parses a decoded frame. See [`GameCall::parse`].
    pub fn from_frame(frame: &CallFrame) -> Result<Self, RemoteError> {
        Self::parse(&frame.method, &frame.args)
    }

    /// Builds the frame a client sends for this call.
    pub fn to_frame(&self) -> CallFrame {
        let args = match *self {
            Self::MakeMove { player, position } => vec![
                WireValue::Char(player.as_char()),
                WireValue::Int(position),
            ],
            _ => Vec::new(),
        };
        CallFrame::new(self.method().as_str(), args)
    }
}

fn mismatch(method: Method, expected: &str, got: &WireValue) -> RemoteError {
    RemoteError::invalid_arguments(
        method.as_str(),
        format_args!("expected {expected}, got {}", got.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_method_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_unknown_method_name() {
        let err = GameCall::parse("getWinner", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownMethod);
        assert_eq!(err.message, "Error: Unknown method 'getWinner'.");
    }

    #[test]
    fn test_method_names_are_case_sensitive() {
        let err = GameCall::parse("MakeMove", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownMethod);
    }

    #[test]
    fn test_make_move_parses_typed_arguments() {
        let call = GameCall::parse(
            "makeMove",
            &[WireValue::Char('O'), WireValue::Int(7)],
        )
        .unwrap();
        assert_eq!(
            call,
            GameCall::MakeMove {
                player: Player::O,
                position: 7
            }
        );
    }

    #[test]
    fn test_make_move_keeps_out_of_range_positions_for_the_game() {
        // Range checking is a game rule, not an argument error.
        let call = GameCall::parse(
            "makeMove",
            &[WireValue::Char('X'), WireValue::Int(-5)],
        )
        .unwrap();
        assert!(matches!(call, GameCall::MakeMove { position: -5, .. }));
    }

    #[test]
    fn test_make_move_argument_count() {
        for args in [
            vec![],
            vec![WireValue::Char('X')],
            vec![
                WireValue::Char('X'),
                WireValue::Int(1),
                WireValue::Int(2),
            ],
        ] {
            let err = GameCall::parse("makeMove", &args).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidArguments, "{args:?}");
        }
    }

    #[test]
    fn test_make_move_argument_types() {
        let swapped = [WireValue::Int(1), WireValue::Char('X')];
        let err = GameCall::parse("makeMove", &swapped).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArguments);
        assert!(err.message.contains("expected Char, got Int"));

        let bad_player = [WireValue::Char('Z'), WireValue::Int(1)];
        let err = GameCall::parse("makeMove", &bad_player).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_no_arg_methods_reject_arguments() {
        let err = GameCall::parse("getBoard", &[WireValue::Int(1)])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArguments);
    }

    #[test]
    fn test_to_frame_then_parse() {
        let calls = [
            GameCall::MakeMove {
                player: Player::X,
                position: 4,
            },
            GameCall::GetBoard,
            GameCall::GetStatus,
            GameCall::GetCurrentPlayer,
            GameCall::ResetGame,
        ];
        for call in calls {
            assert_eq!(GameCall::from_frame(&call.to_frame()).unwrap(), call);
        }
    }
}
