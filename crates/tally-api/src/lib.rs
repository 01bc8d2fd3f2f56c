//! tally-api: REST API for the judging service.
//!
//! axum route handlers over the score store. Bodies are plain JSON
//! values (arrays, maps, `{"ok":true}`); every failure is
//! `{"error": "..."}` with a 400 or 500 status.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/judges` | List judges |
//! | POST | `/api/judges` | Register a judge |
//! | GET | `/api/scores?category=N` | Scores in a category, grouped per contestant |
//! | POST | `/api/scores` | Upsert one criterion score |
//! | GET | `/api/raw-scores` | Per-judge raw category totals |
//! | GET | `/api/contestant-totals` | Materialized blended totals, best first |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use tally_store::Store;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Store,
}

/// Build the complete API router.
pub fn build_router(store: Store) -> Router {
    let state = ApiState { store };

    let api_routes = Router::new()
        .route("/judges", get(handlers::list_judges).post(handlers::create_judge))
        .route("/scores", get(handlers::scores_by_category).post(handlers::submit_score))
        .route("/raw-scores", get(handlers::raw_totals))
        .route("/contestant-totals", get(handlers::contestant_totals))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}
