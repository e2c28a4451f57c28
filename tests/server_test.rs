//! Match server and remote participants over a real socket.

use axum::Json;
use axum::extract::State;
use gomoku_arena::{
    EndOfGame, EventSink, FirstEmptyStrategy, GameEngine, MatchClient, MatchServer, MatchSession,
    MoveRequest, Player, Position, RandomStrategy, RemoteParticipant, SharedMatch, StateSnapshot,
    TransportErrorKind, WinResult,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

fn client_for(addr: SocketAddr) -> MatchClient {
    MatchClient::from_base_url(format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

async fn spawn_server(seed: u64, time_budget: Option<Duration>) -> (MatchClient, SharedMatch) {
    let session = SharedMatch::new(MatchSession::new(
        GameEngine::with_seed(seed),
        time_budget,
        EventSink::disabled(),
    ));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(MatchServer::new(session.clone()).serve(listener));
    (client_for(addr), session)
}

fn at(row: usize, col: usize, player: Player) -> MoveRequest {
    MoveRequest::new(Position::new(row, col).unwrap(), player)
}

#[tokio::test]
async fn test_health_and_reset() {
    let (client, _) = spawn_server(1, None).await;
    client.health().await.unwrap();

    let snapshot = client.reset(Some(Player::Blue)).await.unwrap();
    assert_eq!(snapshot.who_is_next, 2);
    assert_eq!(snapshot.end_of_game, None);
    assert!(!snapshot.move_accepted);
}

#[tokio::test]
async fn test_operator_reset_discards_match_in_progress() {
    let (client, session) = spawn_server(4, None).await;
    client.reset(Some(Player::Red)).await.unwrap();
    assert!(client.submit(&at(7, 7, Player::Red)).await.unwrap().move_accepted);

    let snapshot = client.reset(Some(Player::Red)).await.unwrap();
    assert_eq!(snapshot.board[7][7], 0);
    assert_eq!(snapshot.who_is_next, 1);
    assert_eq!(session.inspect(|s| s.match_index()), 2);
    assert!(session.inspect(|s| s.engine().history().is_empty()));
    assert_eq!(session.inspect(|s| s.score().total()), 0);
}

#[tokio::test]
async fn test_rejections_leave_state_untouched() {
    let (client, session) = spawn_server(2, None).await;
    client.reset(Some(Player::Red)).await.unwrap();

    let reply = client.submit(&at(7, 7, Player::Red)).await.unwrap();
    assert!(reply.move_accepted);
    assert_eq!(reply.board[7][7], 1);
    assert_eq!(reply.who_is_next, 2);

    assert!(!client.submit(&at(7, 7, Player::Blue)).await.unwrap().move_accepted);
    assert!(!client.submit(&at(3, 3, Player::Red)).await.unwrap().move_accepted);

    let off_board = MoveRequest {
        position: [15, 0],
        player_id: 2,
    };
    assert!(!client.submit(&off_board).await.unwrap().move_accepted);
    let bad_id = MoveRequest {
        position: [1, 1],
        player_id: 0,
    };
    assert!(!client.submit(&bad_id).await.unwrap().move_accepted);

    let state = client.state().await.unwrap();
    assert_eq!(state.who_is_next, 2);
    assert_eq!(session.inspect(|s| s.engine().history().len()), 1);
}

#[tokio::test]
async fn test_malformed_body_is_refused() {
    let (client, session) = spawn_server(3, None).await;
    let response = reqwest::Client::new()
        .post(format!("{}/move", client.base_url()))
        .header("content-type", "application/json")
        .body("{\"position\": \"center\"}")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    let response = reqwest::Client::new()
        .post(format!("{}/reset", client.base_url()))
        .json(&serde_json::json!({"starting_player": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(session.inspect(|s| s.engine().history().is_empty()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_accept_exactly_one() {
    let (client, session) = spawn_server(4, None).await;
    client.reset(Some(Player::Red)).await.unwrap();

    let mut tasks = Vec::new();
    for col in 0..15 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            client.submit(&at(9, col, Player::Red)).await.unwrap().move_accepted
        }));
    }

    let mut accepted = 0;
    for task in tasks {
        if task.await.unwrap() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(session.inspect(|s| s.engine().history().len()), 1);
}

#[tokio::test]
async fn test_two_random_clients_finish_a_match() {
    let (client, session) = spawn_server(5, None).await;
    client.reset(Some(Player::Red)).await.unwrap();

    let mut red = RemoteParticipant::new(
        client.clone(),
        Player::Red,
        Box::new(RandomStrategy::with_seed(10)),
        Duration::from_millis(1),
    );
    let mut blue = RemoteParticipant::new(
        client.clone(),
        Player::Blue,
        Box::new(RandomStrategy::with_seed(20)),
        Duration::from_millis(1),
    );

    let (red_end, blue_end) = tokio::join!(red.run(), blue.run());
    let (red_end, blue_end) = (red_end.unwrap(), blue_end.unwrap());

    let (outcome, history_len) =
        session.inspect(|s| (s.engine().check_outcome(), s.engine().history().len()));
    assert!(outcome.is_terminal());
    assert_eq!(*red_end.outcome(), outcome);
    assert_eq!(*blue_end.outcome(), outcome);
    assert_eq!(red_end.moves_accepted() + blue_end.moves_accepted(), history_len);
}

#[tokio::test]
async fn test_server_clock_times_out_idle_mover() {
    let (client, session) = spawn_server(6, Some(Duration::from_millis(50))).await;
    client.reset(Some(Player::Red)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(120)).await;
    let state = client.state().await.unwrap();
    assert_eq!(state.who_is_next, 0);
    assert_eq!(
        state.decode().unwrap().outcome,
        WinResult::TimeoutWin {
            winner: Player::Blue
        }
    );
    assert!(!client.submit(&at(0, 0, Player::Red)).await.unwrap().move_accepted);
    assert_eq!(session.inspect(|s| s.score().wins(Player::Blue)), 1);
}

#[tokio::test]
async fn test_malformed_reply_ends_session() {
    let app = axum::Router::new().route(
        "/state",
        axum::routing::get(|| async { axum::Json(serde_json::json!({"board": 5})) }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });

    let mut participant = RemoteParticipant::new(
        client_for(addr),
        Player::Red,
        Box::new(RandomStrategy::with_seed(1)),
        Duration::from_millis(1),
    );
    let err = participant.run().await.unwrap_err();
    assert!(matches!(err.kind, TransportErrorKind::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let err = client.state().await.unwrap_err();
    assert!(matches!(err.kind, TransportErrorKind::Connect(_)));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = MatchClient::from_base_url(format!("http://{}", addr), Duration::from_millis(200))
        .unwrap();
    let mut participant = RemoteParticipant::new(
        client,
        Player::Red,
        Box::new(RandomStrategy::with_seed(1)),
        Duration::from_millis(1),
    );

    let result = tokio::time::timeout(Duration::from_secs(5), participant.run())
        .await
        .expect("session ends on its own");
    let err = result.unwrap_err();
    assert!(matches!(err.kind, TransportErrorKind::TimedOut(_)));
}

fn red_to_move(board: [[u8; 15]; 15]) -> StateSnapshot {
    StateSnapshot {
        board,
        who_is_next: 1,
        end_of_game: None,
        move_accepted: false,
    }
}

/// Rejects the first move after placing a blue stone on it, then ends the
/// match on the next move.
async fn contested_move(
    State(seen): State<Arc<Mutex<Vec<MoveRequest>>>>,
    Json(request): Json<MoveRequest>,
) -> Json<StateSnapshot> {
    let mut seen = seen.lock().unwrap();
    seen.push(request);
    let mut board = [[0u8; 15]; 15];
    board[0][0] = 2;
    if seen.len() == 1 {
        return Json(red_to_move(board));
    }
    let [row, col] = request.position;
    board[row as usize][col as usize] = 1;
    Json(StateSnapshot {
        board,
        who_is_next: 0,
        end_of_game: Some(EndOfGame::TimeoutWin { player_id: 1 }),
        move_accepted: true,
    })
}

#[tokio::test]
async fn test_rejected_move_is_recomputed_and_resent() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = axum::Router::new()
        .route(
            "/state",
            axum::routing::get(|| async { Json(red_to_move([[0u8; 15]; 15])) }),
        )
        .route("/move", axum::routing::post(contested_move))
        .with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });

    let mut participant = RemoteParticipant::new(
        client_for(addr),
        Player::Red,
        Box::new(FirstEmptyStrategy),
        Duration::from_millis(1),
    );
    let end = participant.run().await.unwrap();

    assert_eq!(*end.moves_sent(), 2);
    assert_eq!(*end.moves_accepted(), 1);
    assert!(end.won_by(Player::Red));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].position, [0, 0]);
    assert_eq!(seen[1].position, [0, 1]);
    assert!(seen.iter().all(|request| request.player_id == 1));
}
