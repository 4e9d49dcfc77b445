//! evplace - EV charging station placement as a multi-armed bandit search.
//!
//! Candidate placement strategies are bandit arms. Each episode the active
//! policy picks an arm, the arm is materialized into a full station layout,
//! the layout is scored against the city's demand centers and the reward is
//! fed back to the policy. The best layout seen is exported as JSON.

pub mod app;
pub mod bandit;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod geo;
pub mod optimizer;
pub mod placement;
pub mod test_utils;
pub mod utils;

pub use error::{EvError, Result};
