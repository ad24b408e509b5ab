//! Concurrency tests: many threads hammering one `SharedGame`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use rand::Rng;
use tictac_game::{Cell, Player, SharedGame, Status};

/// Checks the invariants that must hold after any serialized history.
fn assert_consistent(game: &SharedGame, accepted: usize) {
    let state = game.snapshot();
    let board = state.board();

    let xs = board
        .cells()
        .iter()
        .filter(|c| **c == Cell::Taken(Player::X))
        .count();
    let os = board
        .cells()
        .iter()
        .filter(|c| **c == Cell::Taken(Player::O))
        .count();

    // Every accepted move wrote exactly one distinct cell.
    assert_eq!(xs + os, accepted);
    // X opens, so X is never behind and never more than one ahead.
    assert!(xs == os || xs == os + 1, "xs={xs} os={os}");

    match state.status() {
        Status::InProgress => {
            assert!(!board.has_line(Player::X));
            assert!(!board.has_line(Player::O));
            assert!(!board.is_full());
        }
        Status::Won(p) => {
            assert!(board.has_line(p));
            assert!(!board.has_line(p.opponent()));
        }
        Status::Draw => {
            assert!(board.is_full());
            assert!(!board.has_line(Player::X));
            assert!(!board.has_line(Player::O));
        }
    }
}

#[test]
fn test_random_concurrent_moves_keep_invariants() {
    for _ in 0..20 {
        let game = Arc::new(SharedGame::new());
        let accepted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let game = Arc::clone(&game);
                let accepted = Arc::clone(&accepted);
                thread::spawn(move || {
                    let mut rng = rand::rng();
                    for _ in 0..50 {
                        let player = if rng.random_bool(0.5) {
                            Player::X
                        } else {
                            Player::O
                        };
                        let position = rng.random_range(-1..10);
                        if game.make_move(player, position).is_ok() {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("player thread panicked");
        }

        assert_consistent(&game, accepted.load(Ordering::SeqCst));
    }
}

#[test]
fn test_reset_races_with_moves() {
    let game = Arc::new(SharedGame::new());

    let mover = {
        let game = Arc::clone(&game);
        thread::spawn(move || {
            let mut rng = rand::rng();
            for _ in 0..500 {
                let player = game.current_player();
                let _ = game.make_move(player, rng.random_range(0..9));
            }
        })
    };
    let resetter = {
        let game = Arc::clone(&game);
        thread::spawn(move || {
            for _ in 0..50 {
                game.reset();
                thread::yield_now();
            }
        })
    };

    mover.join().expect("mover panicked");
    resetter.join().expect("resetter panicked");

    // Whatever interleaving happened, the final state is a legal position.
    let state = game.snapshot();
    let taken = 9 - state.board().empty_cells().len();
    assert_consistent(&game, taken);
}
