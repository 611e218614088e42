//! Defines the rewards store trait.

use std::ops::Range;

use time::PrimitiveDateTime;

use crate::{Customer, CustomerId, Error, Transaction};

/// Provides the customers and transactions that reward points are calculated from.
///
/// Date ranges are half-open: a transaction is included if `range.start <= timestamp`
/// and `timestamp < range.end`.
///
/// Implementations either return the complete list of matching records or fail,
/// there are no partial results.
pub trait RewardsStore {
    /// Retrieve the transactions of all customers within `range`.
    fn transactions_in_range(
        &self,
        range: Range<PrimitiveDateTime>,
    ) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions of the customer `customer_id` within `range`.
    fn customer_transactions_in_range(
        &self,
        customer_id: CustomerId,
        range: Range<PrimitiveDateTime>,
    ) -> Result<Vec<Transaction>, Error>;

    /// Retrieve a customer by their ID, or `None` if there is no such customer.
    fn get_customer(&self, customer_id: CustomerId) -> Result<Option<Customer>, Error>;
}
