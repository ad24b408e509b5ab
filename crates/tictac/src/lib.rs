//! # tictac
//!
//! Remote method invocation for one shared tic-tac-toe game.
//!
//! A [`TictacServer`] serves the game over TCP. Clients talk to it through
//! a [`GameClient`] stub: [`RemoteGameClient`] over a socket, or
//! [`LocalGameClient`] in-process through the same registry and dispatcher.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tictac::prelude::*;
//!
//! # async fn run() -> Result<(), TictacError> {
//! let server = TictacServer::builder().bind("127.0.0.1:5000").build().await?;
//! tokio::spawn(server.run());
//!
//! let client = RemoteGameClient::connect("127.0.0.1:5000").await?;
//! println!("{}", client.make_move(Player::X, 4).await);
//! # Ok(())
//! # }
//! ```

#![allow(async_fn_in_trait)]

mod client;
mod config;
mod error;
mod handler;
mod server;

pub use client::{
    ClientError, GameClient, LocalGameClient, RemoteGameClient, STATUS_ERROR,
};
pub use config::{DEFAULT_BIND_ADDR, ServerConfig};
pub use error::TictacError;
pub use server::{ServerStats, TictacServer, TictacServerBuilder};

pub use tictac_game as game;
pub use tictac_protocol as protocol;
pub use tictac_service as service;
pub use tictac_transport as transport;

/// Everything needed to run a server or drive a client.
pub mod prelude {
    pub use crate::{
        ClientError, GameClient, LocalGameClient, RemoteGameClient,
        ServerConfig, ServerStats, TictacError, TictacServer,
        TictacServerBuilder,
    };
    pub use tictac_game::{Board, Player, Status};
    pub use tictac_protocol::{
        CallFrame, Codec, ErrorKind, GameCall, JsonCodec, RemoteError,
        ResultFrame, WireValue,
    };
    pub use tictac_service::{DEFAULT_SERVICE, Registry, ServiceHost};
    pub use tictac_transport::{Connection, TcpConnection};
}
