//! Rewards HTTP handlers.
//!
//! Both handlers compute summaries as of the `as_of` query parameter, or as of
//! the current local time when it is omitted.

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use serde::Deserialize;
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, CustomerId, Error,
    rewards::{CustomerRewardsSummary, summarize_all, summarize_one},
    stores::SQLiteRewardsStore,
    timezone::local_now,
};

const AS_OF_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// The state needed for the rewards endpoints.
#[derive(Debug, Clone)]
pub struct RewardsState {
    /// The store to read customers and transactions from.
    pub store: SQLiteRewardsStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for RewardsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SQLiteRewardsStore::new(state.db_connection.clone()),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the rewards endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RewardsQuery {
    /// The local date-time the rewards window ends at, formatted as `YYYY-MM-DDTHH:MM:SS`.
    pub as_of: Option<String>,
}

/// Get the rewards summaries of all customers with purchases in the last three months.
pub async fn get_all_rewards(
    State(state): State<RewardsState>,
    Query(query): Query<RewardsQuery>,
) -> Result<Json<Vec<CustomerRewardsSummary>>, Error> {
    let as_of = resolve_as_of(query.as_of.as_deref(), &state.local_timezone)?;

    summarize_all(&state.store, as_of).map(Json)
}

/// Get the rewards summary of a single customer over the last three months.
///
/// Responds with 404 Not Found if there is no customer with the ID `customer_id`.
pub async fn get_customer_rewards(
    State(state): State<RewardsState>,
    Path(customer_id): Path<CustomerId>,
    Query(query): Query<RewardsQuery>,
) -> Result<Json<CustomerRewardsSummary>, Error> {
    let as_of = resolve_as_of(query.as_of.as_deref(), &state.local_timezone)?;

    summarize_one(&state.store, customer_id, as_of)
        .inspect_err(|error| {
            if let Error::CustomerNotFound(_) = error {
                tracing::info!("rewards requested for unknown customer {customer_id}");
            }
        })
        .map(Json)
}

/// Parse the client's `as_of` parameter, defaulting to the current time in `local_timezone`.
fn resolve_as_of(as_of: Option<&str>, local_timezone: &str) -> Result<PrimitiveDateTime, Error> {
    match as_of {
        Some(text) => PrimitiveDateTime::parse(text, AS_OF_FORMAT)
            .map_err(|_| Error::InvalidAsOf(text.to_owned())),
        None => local_now(local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", local_timezone);
            Error::InvalidTimezoneError(local_timezone.to_owned())
        }),
    }
}
