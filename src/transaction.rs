//! Defines the transaction model and the database queries for creating transactions.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use time::PrimitiveDateTime;

use crate::{
    Error,
    customer::{Customer, CustomerId, map_customer_row_with_offset},
    db::{SqlAmount, SqlTimestamp},
};

// ============================================================================
// MODELS
// ============================================================================

/// A purchase made by a customer.
///
/// Transactions are created by the store and never modified afterwards.
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The customer that made the purchase.
    pub customer: Customer,
    /// The amount of money spent, in dollars.
    pub amount: Decimal,
    /// When the purchase happened, as a local date and time.
    pub timestamp: PrimitiveDateTime,
    /// A text description of what was purchased.
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        customer_id: CustomerId,
        amount: Decimal,
        timestamp: PrimitiveDateTime,
    ) -> TransactionBuilder {
        TransactionBuilder {
            customer_id,
            amount,
            timestamp,
            description: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances with [create_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The ID of the customer that made the purchase.
    pub customer_id: CustomerId,

    /// The amount of money spent.
    ///
    /// Amounts are expected to be non-negative, but this is not enforced.
    /// Negative amounts simply earn no reward points.
    pub amount: Decimal,

    /// When the purchase happened, as a local date and time.
    pub timestamp: PrimitiveDateTime,

    /// A human-readable description of the purchase, e.g. "Grocery shopping".
    ///
    /// Defaults to an empty string.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by [map_transaction_row], joined with the transaction's customer.
pub(crate) const SELECT_TRANSACTION_WITH_CUSTOMER: &str =
    "SELECT t.id, t.amount, t.timestamp, t.description, c.id, c.name, c.email
     FROM \"transaction\" t
     INNER JOIN customer c ON c.id = t.customer_id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCustomer] if the customer ID does not refer to a real customer,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let id: i64 = connection
        .prepare(
            "INSERT INTO \"transaction\" (customer_id, amount, timestamp, description)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )?
        .query_row(
            (
                builder.customer_id.as_i64(),
                SqlAmount(builder.amount),
                SqlTimestamp(builder.timestamp),
                &builder.description,
            ),
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCustomer(builder.customer_id),
            error => error.into(),
        })?;

    let transaction = connection
        .prepare(&format!("{SELECT_TRANSACTION_WITH_CUSTOMER} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                description TEXT NOT NULL,
                FOREIGN KEY(customer_id) REFERENCES customer(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Range queries filter on the timestamp, optionally for a single customer.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_timestamp_customer
         ON \"transaction\"(timestamp, customer_id);",
        (),
    )?;

    Ok(())
}

/// Map a row selected with [SELECT_TRANSACTION_WITH_CUSTOMER] to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let SqlAmount(amount) = row.get(1)?;
    let SqlTimestamp(timestamp) = row.get(2)?;
    let description = row.get(3)?;
    let customer = map_customer_row_with_offset(row, 4)?;

    Ok(Transaction {
        id,
        customer,
        amount,
        timestamp,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        Error,
        customer::{CustomerId, create_customer},
        db::initialize,
        transaction::{Transaction, count_transactions, create_transaction},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let customer = create_customer("Alice Johnson", "alice@email.com", &conn).unwrap();
        let timestamp = datetime!(2025-10-05 14:30:00);

        let result = create_transaction(
            Transaction::build(customer.id, dec!(120.00), timestamp)
                .description("Electronics purchase"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, dec!(120.00));
                assert_eq!(transaction.timestamp, timestamp);
                assert_eq!(transaction.description, "Electronics purchase");
                assert_eq!(transaction.customer, customer);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_customer_id() {
        let conn = get_test_connection();
        let customer_id = CustomerId::new(42);

        let result = create_transaction(
            Transaction::build(customer_id, dec!(12.30), datetime!(2025-10-05 00:00)),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCustomer(customer_id)));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let customer = create_customer("Alice Johnson", "alice@email.com", &conn).unwrap();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(customer.id, i.into(), datetime!(2025-10-05 12:00)),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
