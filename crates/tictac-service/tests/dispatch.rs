//! In-process RMI path: registry miss → host → handle → dispatcher → game.

use std::sync::Arc;
use std::thread;

use tictac_game::Player;
use tictac_protocol::{ErrorKind, GameCall, WireValue};
use tictac_service::{DEFAULT_SERVICE, Registry, ServiceHost};

fn make_move(player: char, position: i32) -> Vec<WireValue> {
    vec![WireValue::Char(player), WireValue::Int(position)]
}

#[test]
fn test_full_round_through_registry_and_handles() {
    let host = ServiceHost::new();
    let registry = Registry::new();
    assert!(registry.lookup(DEFAULT_SERVICE).is_none());

    for (player, position) in [('X', 0), ('O', 4), ('X', 1), ('O', 5)] {
        let handle = host.resolve(&registry, DEFAULT_SERVICE);
        handle
            .invoke("makeMove", &make_move(player, position))
            .unwrap();
    }

    let handle = registry.lookup(DEFAULT_SERVICE).unwrap();
    assert_eq!(
        handle.invoke("makeMove", &make_move('X', 2)).unwrap(),
        WireValue::from("Player X wins!")
    );
    assert_eq!(
        handle.invoke("getBoard", &[]).unwrap(),
        WireValue::Chars("XXX-OO---".chars().collect())
    );
    assert_eq!(
        handle.invoke("getStatus", &[]).unwrap(),
        WireValue::from("Player X wins!")
    );

    let err = handle.invoke("makeMove", &make_move('O', 8)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::GameOver);
    assert_eq!(err.message, "Game is already over. Status: Player X wins!");

    assert_eq!(host.scoreboard().snapshot().x_wins, 1);
}

#[test]
fn test_rule_violations_keep_their_messages() {
    let host = ServiceHost::new();
    let handle = host.request_service(DEFAULT_SERVICE);

    let err = handle.invoke("makeMove", &make_move('O', 0)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::WrongTurn);
    assert_eq!(err.message, "Not your turn! Current player: X");

    let err = handle.invoke("makeMove", &make_move('X', 9)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);
    assert_eq!(err.message, "Invalid position! Must be between 0 and 8.");

    let err = handle.invoke("makeMove", &make_move('X', -1)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfRange);

    handle.invoke("makeMove", &make_move('X', 4)).unwrap();
    handle.invoke("makeMove", &make_move('O', 0)).unwrap();
    let err = handle.invoke("makeMove", &make_move('X', 4)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::CellOccupied);
    assert_eq!(err.message, "Position already occupied! Choose another.");
}

#[test]
fn test_reset_from_one_handle_is_seen_by_another() {
    let host = ServiceHost::new();
    let a = host.request_service(DEFAULT_SERVICE);
    let b = host.request_service(DEFAULT_SERVICE);

    a.invoke("makeMove", &make_move('X', 8)).unwrap();
    assert_eq!(
        b.invoke("resetGame", &[]).unwrap(),
        WireValue::from("Game reset successfully.")
    );
    assert_eq!(
        a.call(GameCall::GetBoard).unwrap(),
        WireValue::Chars(vec!['-'; 9])
    );
    assert_eq!(
        a.call(GameCall::GetCurrentPlayer).unwrap(),
        WireValue::Char('X')
    );
}

#[test]
fn test_concurrent_callers_share_one_game() {
    let host = Arc::new(ServiceHost::new());
    let registry = Arc::new(Registry::new());

    // Every thread tries to claim cell 4 as X; exactly one succeeds.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let host = Arc::clone(&host);
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let handle = host.resolve(&registry, DEFAULT_SERVICE);
                handle.call(GameCall::MakeMove {
                    player: Player::X,
                    position: 4,
                })
            })
        })
        .collect();

    let results: Vec<_> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert!(
            matches!(err.kind, ErrorKind::WrongTurn | ErrorKind::CellOccupied),
            "unexpected rejection: {err}"
        );
    }
    assert_eq!(registry.len(), 1);
}
