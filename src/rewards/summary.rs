//! Aggregates per-transaction reward points into monthly and total summaries per customer.

use std::{collections::BTreeMap, ops::Range};

use serde::Serialize;
use time::PrimitiveDateTime;

use crate::{
    CustomerId, Error, MonthKey, Transaction,
    calendar::months_before,
    rewards::points::{Points, points_for},
    stores::RewardsStore,
};

/// The number of months before the reference time that count towards a customer's rewards.
pub const REWARDS_WINDOW_MONTHS: u8 = 3;

/// The reward points a customer earned over the rewards window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRewardsSummary {
    /// The ID of the customer.
    pub customer_id: CustomerId,
    /// The customer's display name.
    pub customer_name: String,
    /// The points earned in each calendar month that had at least one transaction.
    ///
    /// Months without transactions are omitted rather than given zero points.
    pub monthly_points: BTreeMap<MonthKey, Points>,
    /// The points earned over the whole window, equal to the sum of `monthly_points`.
    pub total_points: Points,
}

impl CustomerRewardsSummary {
    /// A summary with no points for the customer `customer_id`.
    fn empty(customer_id: CustomerId, customer_name: String) -> Self {
        Self {
            customer_id,
            customer_name,
            monthly_points: BTreeMap::new(),
            total_points: 0,
        }
    }

    /// Add the points for `transaction` to its month and the total.
    fn add(&mut self, transaction: &Transaction) {
        let points = points_for(transaction.amount);

        let monthly = self
            .monthly_points
            .entry(MonthKey::of(transaction.timestamp))
            .or_default();
        *monthly = monthly.saturating_add(points);
        self.total_points = self.total_points.saturating_add(points);
    }
}

/// The half-open date range `[as_of - 3 months, as_of)` of transactions that earn rewards.
pub fn rewards_window(as_of: PrimitiveDateTime) -> Range<PrimitiveDateTime> {
    months_before(as_of, REWARDS_WINDOW_MONTHS)..as_of
}

/// Summarize the reward points of every customer with transactions in the rewards window
/// ending at `as_of`.
///
/// Customers without any transactions in the window are not included. The summaries are
/// sorted by customer name.
///
/// # Errors
/// Returns an error only if `store` fails to retrieve the transactions.
pub fn summarize_all<S>(
    store: &S,
    as_of: PrimitiveDateTime,
) -> Result<Vec<CustomerRewardsSummary>, Error>
where
    S: RewardsStore + ?Sized,
{
    let transactions = store.transactions_in_range(rewards_window(as_of))?;

    let mut summaries: BTreeMap<CustomerId, CustomerRewardsSummary> = BTreeMap::new();

    for transaction in &transactions {
        summaries
            .entry(transaction.customer.id)
            .or_insert_with(|| {
                CustomerRewardsSummary::empty(
                    transaction.customer.id,
                    transaction.customer.name.clone(),
                )
            })
            .add(transaction);
    }

    // Sorting is stable, so customers with the same name stay in order of their ID.
    let mut summaries: Vec<_> = summaries.into_values().collect();
    summaries.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));

    tracing::debug!(
        "summarized {} transactions for {} customers as of {as_of}",
        transactions.len(),
        summaries.len()
    );

    Ok(summaries)
}

/// Summarize the reward points of the customer `customer_id` over the rewards window ending
/// at `as_of`.
///
/// A customer without any transactions in the window gets a summary with no monthly points
/// and a total of zero.
///
/// # Errors
/// Returns an [Error::CustomerNotFound] if there is no customer with the ID `customer_id`,
/// in which case no transactions are queried. Otherwise, returns an error only if `store`
/// fails.
pub fn summarize_one<S>(
    store: &S,
    customer_id: CustomerId,
    as_of: PrimitiveDateTime,
) -> Result<CustomerRewardsSummary, Error>
where
    S: RewardsStore + ?Sized,
{
    let customer = store
        .get_customer(customer_id)?
        .ok_or(Error::CustomerNotFound(customer_id))?;

    let transactions = store.customer_transactions_in_range(customer_id, rewards_window(as_of))?;

    let mut summary = CustomerRewardsSummary::empty(customer.id, customer.name);
    for transaction in &transactions {
        summary.add(transaction);
    }

    tracing::debug!(
        "summarized {} transactions for customer {customer_id} as of {as_of}",
        transactions.len()
    );

    Ok(summary)
}
