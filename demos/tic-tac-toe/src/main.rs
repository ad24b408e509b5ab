use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;
use tictac::prelude::*;

/// How long a player waits before checking whether it's their turn again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Random-move player
// ---------------------------------------------------------------------------

/// Free cells on a board as returned by `get_board`.
fn free_cells(board: &[char; 9]) -> Vec<i32> {
    (0..9).filter(|&i| board[i as usize] == '-').collect()
}

fn render(board: &[char; 9]) -> String {
    board
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(char::to_string)
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n---------\n")
}

/// Plays `me` with random moves until the round is over. Returns the final
/// status string.
async fn play(client: &RemoteGameClient, me: Player) -> String {
    loop {
        let status = client.get_status().await;
        if status != "IN_PROGRESS" {
            return status;
        }

        if client.get_current_player().await != me.as_char() {
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        }

        let board = client.get_board().await;
        let Some(&position) = free_cells(&board).choose(&mut rand::rng())
        else {
            return status;
        };
        let reply = client.make_move(me, position).await;
        tracing::info!(player = %me, position, %reply, "move");
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

async fn serve(addr: &str) -> Result<(), TictacError> {
    let server = TictacServer::builder().bind(addr).build().await?;
    server.registry().display_cache();
    server.run().await
}

/// Two random players connect to `addr` and play one round.
async fn play_round(addr: &str) -> Result<String, TictacError> {
    let x = Arc::new(RemoteGameClient::connect(addr).await?);
    let o = Arc::new(RemoteGameClient::connect(addr).await?);

    let x_task = tokio::spawn({
        let x = Arc::clone(&x);
        async move { play(&x, Player::X).await }
    });
    let o_task = tokio::spawn({
        let o = Arc::clone(&o);
        async move { play(&o, Player::O).await }
    });
    let (x_result, _) = tokio::join!(x_task, o_task);
    let status = x_result.unwrap_or_else(|e| format!("Error: {e}"));

    println!("{}\n\n{status}", render(&x.get_board().await));
    x.disconnect().await;
    o.disconnect().await;
    Ok(status)
}

/// Starts a server on an ephemeral port and plays one round against it.
async fn demo() -> Result<(), Box<dyn std::error::Error>> {
    let server = TictacServer::builder().bind("127.0.0.1:0").build().await?;
    let addr = server.local_addr()?;
    let registry = Arc::clone(server.registry());
    let host = Arc::clone(server.host());
    tokio::spawn(server.run());

    play_round(&addr.to_string()).await?;

    registry.display_cache();
    let tally = host.scoreboard().snapshot();
    tracing::info!(
        x_wins = tally.x_wins,
        o_wins = tally.o_wins,
        draws = tally.draws,
        "scoreboard"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let mode = args.next();
    let addr = args.next();

    match mode.as_deref() {
        Some("serve") => {
            serve(addr.as_deref().unwrap_or(tictac::DEFAULT_BIND_ADDR)).await?
        }
        Some("play") => {
            play_round(addr.as_deref().unwrap_or("127.0.0.1:5000")).await?;
        }
        None => demo().await?,
        Some(other) => {
            eprintln!("usage: tic-tac-toe [serve|play] [addr] (got {other:?})");
            std::process::exit(2);
        }
    }
    Ok(())
}
