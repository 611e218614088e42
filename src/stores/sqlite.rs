//! Implements a SQLite backed rewards store.

use std::{
    ops::Range,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;
use time::PrimitiveDateTime;

use crate::{
    Customer, CustomerId, Error, Transaction,
    customer::get_customer,
    db::SqlTimestamp,
    stores::RewardsStore,
    transaction::{SELECT_TRANSACTION_WITH_CUSTOMER, map_transaction_row},
};

/// Reads customers and transactions from a SQLite database.
///
/// The tables must have been created with [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteRewardsStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteRewardsStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl RewardsStore for SQLiteRewardsStore {
    /// Retrieve the transactions of all customers within `range`.
    ///
    /// # Errors
    /// Returns an [Error::DatabaseLockError] if the connection lock is poisoned, or
    /// an [Error::SqlError] if there is an unexpected SQL error.
    fn transactions_in_range(
        &self,
        range: Range<PrimitiveDateTime>,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        let transactions = connection
            .prepare(&format!(
                "{SELECT_TRANSACTION_WITH_CUSTOMER}
                 WHERE t.timestamp >= ?1 AND t.timestamp < ?2
                 ORDER BY t.timestamp, t.id"
            ))?
            .query_map(
                (SqlTimestamp(range.start), SqlTimestamp(range.end)),
                map_transaction_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "found {} transactions between {} and {}",
            transactions.len(),
            range.start,
            range.end
        );

        Ok(transactions)
    }

    /// Retrieve the transactions of the customer `customer_id` within `range`.
    ///
    /// # Errors
    /// Returns an [Error::DatabaseLockError] if the connection lock is poisoned, or
    /// an [Error::SqlError] if there is an unexpected SQL error.
    fn customer_transactions_in_range(
        &self,
        customer_id: CustomerId,
        range: Range<PrimitiveDateTime>,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        let transactions = connection
            .prepare(&format!(
                "{SELECT_TRANSACTION_WITH_CUSTOMER}
                 WHERE t.customer_id = ?1 AND t.timestamp >= ?2 AND t.timestamp < ?3
                 ORDER BY t.timestamp, t.id"
            ))?
            .query_map(
                (
                    customer_id.as_i64(),
                    SqlTimestamp(range.start),
                    SqlTimestamp(range.end),
                ),
                map_transaction_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "found {} transactions for customer {customer_id} between {} and {}",
            transactions.len(),
            range.start,
            range.end
        );

        Ok(transactions)
    }

    /// Retrieve a customer by their ID.
    ///
    /// # Errors
    /// Returns an [Error::DatabaseLockError] if the connection lock is poisoned, or
    /// an [Error::SqlError] if there is an unexpected SQL error.
    fn get_customer(&self, customer_id: CustomerId) -> Result<Option<Customer>, Error> {
        let connection = self.lock()?;

        get_customer(customer_id, &connection)
    }
}

#[cfg(test)]
mod sqlite_rewards_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::{Duration, macros::datetime};

    use crate::{
        CustomerId, Transaction, create_customer, create_transaction, db::initialize,
        stores::RewardsStore,
    };

    use super::SQLiteRewardsStore;

    fn get_test_store() -> (SQLiteRewardsStore, Arc<Mutex<Connection>>) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        (SQLiteRewardsStore::new(conn.clone()), conn)
    }

    #[test]
    fn range_query_is_start_inclusive_and_end_exclusive() {
        let (store, conn) = get_test_store();
        let start = datetime!(2024-06-15 12:00);
        let end = datetime!(2024-09-15 12:00);
        {
            let conn = conn.lock().unwrap();
            let customer = create_customer("Test Customer", "test@email.com", &conn).unwrap();
            for (timestamp, description) in [
                (start - Duration::milliseconds(1), "before start"),
                (start, "at start"),
                (end - Duration::milliseconds(1), "just before end"),
                (end, "at end"),
            ] {
                create_transaction(
                    Transaction::build(customer.id, dec!(100.00), timestamp)
                        .description(description),
                    &conn,
                )
                .unwrap();
            }
        }

        let got = store
            .transactions_in_range(start..end)
            .expect("Could not query transactions");

        let descriptions: Vec<&str> = got.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["at start", "just before end"]);
    }

    #[test]
    fn range_query_includes_customer_details() {
        let (store, conn) = get_test_store();
        let customer = {
            let conn = conn.lock().unwrap();
            let customer = create_customer("Test Customer", "test@email.com", &conn).unwrap();
            create_transaction(
                Transaction::build(customer.id, dec!(75.50), datetime!(2024-09-01 09:00)),
                &conn,
            )
            .unwrap();
            customer
        };

        let got = store
            .transactions_in_range(datetime!(2024-08-01 00:00)..datetime!(2024-10-01 00:00))
            .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].customer, customer);
        assert_eq!(got[0].amount, dec!(75.50));
    }

    #[test]
    fn customer_range_query_only_returns_that_customer() {
        let (store, conn) = get_test_store();
        let (customer_1, customer_2) = {
            let conn = conn.lock().unwrap();
            let customer_1 = create_customer("Customer 1", "customer1@email.com", &conn).unwrap();
            let customer_2 = create_customer("Customer 2", "customer2@email.com", &conn).unwrap();
            create_transaction(
                Transaction::build(customer_1.id, dec!(100.00), datetime!(2024-09-05 10:00))
                    .description("Customer 1 Transaction"),
                &conn,
            )
            .unwrap();
            create_transaction(
                Transaction::build(customer_2.id, dec!(200.00), datetime!(2024-09-10 10:00))
                    .description("Customer 2 Transaction"),
                &conn,
            )
            .unwrap();
            (customer_1, customer_2)
        };
        let range = datetime!(2024-08-16 00:00)..datetime!(2024-09-16 00:00);

        let got = store
            .customer_transactions_in_range(customer_1.id, range)
            .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "Customer 1 Transaction");
        assert_eq!(got[0].customer.id, customer_1.id);
        assert_ne!(got[0].customer.id, customer_2.id);
    }

    #[test]
    fn customer_range_query_excludes_transactions_outside_range() {
        let (store, conn) = get_test_store();
        let customer = {
            let conn = conn.lock().unwrap();
            let customer = create_customer("Test Customer", "test@email.com", &conn).unwrap();
            create_transaction(
                Transaction::build(customer.id, dec!(300.00), datetime!(2024-07-01 10:00)),
                &conn,
            )
            .unwrap();
            customer
        };

        let got = store
            .customer_transactions_in_range(
                customer.id,
                datetime!(2024-08-16 00:00)..datetime!(2024-09-16 00:00),
            )
            .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn get_customer_returns_none_for_unknown_id() {
        let (store, _conn) = get_test_store();

        let got = store.get_customer(CustomerId::new(999)).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn get_customer_returns_customer() {
        let (store, conn) = get_test_store();
        let want = create_customer("Test Customer", "test@email.com", &conn.lock().unwrap())
            .unwrap();

        let got = store.get_customer(want.id).unwrap();

        assert_eq!(got, Some(want));
    }
}
