//! tally-client: typed access to the judging API plus the scoring
//! session state machine the entry UI drives.
//!
//! `ApiClient` speaks plain HTTP/1 to the service, one short-lived
//! connection per request. `ScoringSession` owns judge selection, the
//! local `ScoreSheet`, per-cell validation against the criteria
//! catalog, and truthful bulk submission. The ranked leaderboard is
//! computed locally from fetched raw totals, never on the server.

pub mod client;
pub mod error;
pub mod session;
pub mod sheet;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult, SessionError, SessionResult};
pub use session::{ScoringSession, SessionPhase, SubmitFailure, SubmitReport};
pub use sheet::{ScoreSheet, Standing};
