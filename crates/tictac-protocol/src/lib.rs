//! Wire protocol for tictac.
//!
//! This crate defines the "language" the client stub and the server speak:
//!
//! - **Types** ([`WireValue`], [`CallFrame`], [`ResultFrame`],
//!   [`RemoteError`]): what travels on the wire.
//! - **Calls** ([`Method`], [`GameCall`]): the closed set of game
//!   operations a call frame can name.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how frames become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding.
//!
//! # Architecture
//!
//! The protocol sits between the transport (length-prefixed byte frames)
//! and the dispatcher (typed game calls):
//!
//! ```text
//! Transport (bytes) → Codec (CallFrame) → GameCall → Dispatcher
//! ```

mod call;
mod codec;
mod error;
mod types;

pub use call::{GameCall, Method};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{CallFrame, ErrorKind, RemoteError, ResultFrame, WireValue};
