pub mod category;
pub mod criteria;
pub mod leaderboard;
pub mod types;

pub use category::{Category, InvalidCategory};
pub use criteria::Criterion;
pub use types::*;
