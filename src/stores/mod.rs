//! Contains the trait for querying the data that reward points are calculated from, and its
//! SQLite implementation.

mod rewards;
mod sqlite;

pub use rewards::RewardsStore;
pub use sqlite::SQLiteRewardsStore;
