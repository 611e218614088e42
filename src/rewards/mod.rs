//! Reward points: the tiered points formula, the per-customer monthly summaries, and
//! the HTTP handlers that serve them.

mod handlers;
mod points;
mod summary;

pub use handlers::{RewardsQuery, RewardsState, get_all_rewards, get_customer_rewards};
pub use points::{Points, points_for};
pub use summary::{
    CustomerRewardsSummary, REWARDS_WINDOW_MONTHS, rewards_window, summarize_all, summarize_one,
};
