//! Client round-trip tests against an in-process server.
//!
//! Each test spawns the real axum service on an ephemeral port over an
//! in-memory store, then drives it through `ApiClient` and
//! `ScoringSession` exactly as the entry UI would.

use tally_client::{ApiClient, ClientError, ScoringSession, SessionError, SessionPhase};
use tally_core::leaderboard::LeaderboardConfig;
use tally_core::{Category, ScoreSubmission};
use tally_store::Store;

async fn spawn_server() -> ApiClient {
    let store = Store::open_in_memory().await.unwrap();
    spawn_server_with(store).await
}

async fn spawn_server_with(store: Store) -> ApiClient {
    let router = tally_api::build_router(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    ApiClient::new(&format!("http://{addr}")).unwrap()
}

fn submission(contestant: i64, category: Category, judge: &str, criteria: &str, score: f64) -> ScoreSubmission {
    ScoreSubmission {
        contestant,
        category,
        judge_name: judge.to_string(),
        criteria: criteria.to_string(),
        score,
    }
}

#[tokio::test]
async fn judges_round_trip() {
    let client = spawn_server().await;

    assert!(client.judges().await.unwrap().is_empty());

    let judge = client.create_judge("Ada").await.unwrap();
    assert!(judge.id > 0);
    assert_eq!(judge.name, "Ada");

    let judges = client.judges().await.unwrap();
    assert_eq!(judges, vec![judge]);
}

#[tokio::test]
async fn duplicate_judge_surfaces_the_api_error() {
    let client = spawn_server().await;
    client.create_judge("Ada").await.unwrap();

    let err = client.create_judge("Ada").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Judge exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn scores_round_trip_by_category() {
    let client = spawn_server().await;

    let ack = client
        .submit_score(&submission(1, Category::Street, "Ada", "Performance", 22.0))
        .await
        .unwrap();
    assert!(ack.ok);

    let street = client.scores(Category::Street).await.unwrap();
    assert_eq!(street[&1].total, 22.0);
    assert_eq!(street[&1].scores[0].judge_name, "Ada");

    // The festival side stays empty.
    assert!(client.scores(Category::Festival).await.unwrap().is_empty());
}

#[tokio::test]
async fn leaderboard_from_live_data() {
    let client = spawn_server().await;
    client
        .submit_score(&submission(1, Category::Street, "Ada", "Performance", 80.0))
        .await
        .unwrap();
    client
        .submit_score(&submission(1, Category::Festival, "Ada", "Overall Impact", 90.0))
        .await
        .unwrap();

    let rows = client.leaderboard(&LeaderboardConfig::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].contestant_id, 1);
    assert_eq!(rows[0].street_pct, 80.0);
    assert_eq!(rows[0].festival_pct, 90.0);
    assert_eq!(format!("{:.2}", rows[0].final_score), "86.00");
    assert_eq!(rows[0].rank, 1);
}

#[tokio::test]
async fn contestant_totals_round_trip() {
    let store = Store::open_in_memory().await.unwrap();
    let client = spawn_server_with(store.clone()).await;

    client
        .submit_score(&submission(1, Category::Street, "Ada", "Performance", 80.0))
        .await
        .unwrap();
    client
        .submit_score(&submission(1, Category::Festival, "Ada", "Overall Impact", 90.0))
        .await
        .unwrap();
    store.refresh_contestant_totals().await.unwrap();

    let totals = client.contestant_totals().await.unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].contestant_id, 1);
    assert_eq!(format!("{:.2}", totals[0].final_score), "86.00");
}

#[tokio::test]
async fn session_scores_a_contestant_end_to_end() {
    let client = spawn_server().await;
    let mut session = ScoringSession::new(client.clone(), Category::Street);

    session.refresh_judges().await.unwrap();
    session.add_judge("Ada").await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Editable);
    assert_eq!(session.judge(), Some("Ada"));

    session.set_score(1, "Performance", 22.0).await.unwrap();
    session.set_score(1, "Performance", 24.0).await.unwrap();
    session.set_score(1, "Choreography", 28.0).await.unwrap();

    // The server holds the upserted values.
    let street = client.scores(Category::Street).await.unwrap();
    assert_eq!(street[&1].total, 52.0);
    assert_eq!(street[&1].scores.len(), 2);

    let standings = session.standings();
    assert_eq!(standings[0].contestant_id, 1);
    assert_eq!(standings[0].total, 52.0);

    let report = session.submit_all().await.unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(report.submitted, 2);
    assert!(report.is_complete());
}

#[tokio::test]
async fn session_reloads_saved_scores_for_the_selected_judge() {
    let client = spawn_server().await;

    let mut first = ScoringSession::new(client.clone(), Category::Street);
    first.refresh_judges().await.unwrap();
    first.add_judge("Ada").await.unwrap();
    first.set_score(2, "Choreography", 26.5).await.unwrap();

    // A later session picks the same judge and sees their saved sheet.
    let mut second = ScoringSession::new(client, Category::Street);
    second.refresh_judges().await.unwrap();
    second.select_judge("Ada").await.unwrap();
    assert_eq!(second.phase(), SessionPhase::Editable);
    assert_eq!(second.sheet().get(2, "Choreography"), Some(26.5));
}

#[tokio::test]
async fn session_switches_category_and_reloads() {
    let client = spawn_server().await;
    let mut session = ScoringSession::new(client.clone(), Category::Street);
    session.refresh_judges().await.unwrap();
    session.add_judge("Ada").await.unwrap();
    session.set_score(1, "Performance", 22.0).await.unwrap();

    session.switch_category(Category::Festival).await.unwrap();
    assert_eq!(session.category(), Category::Festival);
    assert!(session.sheet().is_empty());

    session.set_score(1, "Musicality", 9.0).await.unwrap();
    session.switch_category(Category::Street).await.unwrap();

    // Back on street, the earlier cell is fetched again.
    assert_eq!(session.sheet().get(1, "Performance"), Some(22.0));
}

#[tokio::test]
async fn session_surfaces_server_rejections() {
    let client = spawn_server().await;
    let mut session = ScoringSession::new(client.clone(), Category::Street);
    session.refresh_judges().await.unwrap();
    session.add_judge("Ada").await.unwrap();

    // A second registration of the same name reaches the server when
    // the local pre-check is bypassed by a stale judge list.
    let stale_err = client.create_judge("  Ada ").await.unwrap_err();
    match stale_err {
        ClientError::Api { status, .. } => assert_eq!(status, 400),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = session.add_judge("ADA").await.unwrap_err();
    assert!(matches!(err, SessionError::DuplicateJudge));
}

#[tokio::test]
async fn connection_refused_is_a_connect_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}")).unwrap();
    let err = client.judges().await.unwrap_err();
    assert!(matches!(err, ClientError::Connect { .. }));
}
