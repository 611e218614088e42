//! Code for creating the customer table and fetching customers from the database.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer customer IDs.
///
/// This helps disambiguate customer IDs from other types of IDs, e.g. transaction IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Create a new customer ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the customer ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A customer who earns reward points for their purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// The customer's ID in the application database.
    pub id: CustomerId,
    /// The customer's display name, e.g. "Alice Johnson".
    pub name: String,
    /// The customer's email address, unique among customers.
    pub email: String,
}

/// Create the customer table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_customer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS customer (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new customer into the database.
///
/// # Errors
///
/// This function will return a:
/// - [Error::DuplicateEmail] if another customer already uses `email`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_customer(name: &str, email: &str, connection: &Connection) -> Result<Customer, Error> {
    let customer = connection
        .prepare("INSERT INTO customer (name, email) VALUES (?1, ?2) RETURNING id, name, email")?
        .query_row((name, email), map_customer_row)?;

    Ok(customer)
}

/// Get the customer with an ID equal to `customer_id`, or `None` if there is no such customer.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_customer(
    customer_id: CustomerId,
    connection: &Connection,
) -> Result<Option<Customer>, Error> {
    connection
        .prepare("SELECT id, name, email FROM customer WHERE id = :id")?
        .query_row(&[(":id", &customer_id.as_i64())], map_customer_row)
        .optional()
        .map_err(|error| error.into())
}

/// Get the number of customers in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_customers(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM customer;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a database row with the columns `id, name, email` to a [Customer].
pub(crate) fn map_customer_row(row: &Row) -> Result<Customer, rusqlite::Error> {
    map_customer_row_with_offset(row, 0)
}

/// Map the customer columns `id, name, email` starting at `offset` to a [Customer].
///
/// Used when the customer columns follow the columns of another table in a join.
pub(crate) fn map_customer_row_with_offset(
    row: &Row,
    offset: usize,
) -> Result<Customer, rusqlite::Error> {
    Ok(Customer {
        id: CustomerId::new(row.get(offset)?),
        name: row.get(offset + 1)?,
        email: row.get(offset + 2)?,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        customer::{CustomerId, count_customers, create_customer, get_customer},
        db::initialize,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let customer = create_customer("Alice Johnson", "alice@email.com", &conn)
            .expect("Could not create customer");

        assert!(customer.id.as_i64() > 0);
        assert_eq!(customer.name, "Alice Johnson");
        assert_eq!(customer.email, "alice@email.com");
    }

    #[test]
    fn create_fails_on_duplicate_email() {
        let conn = get_test_connection();
        create_customer("Alice Johnson", "alice@email.com", &conn)
            .expect("Could not create customer");

        let result = create_customer("Alice Cooper", "alice@email.com", &conn);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_returns_created_customer() {
        let conn = get_test_connection();
        let want = create_customer("Bob Smith", "bob@email.com", &conn)
            .expect("Could not create customer");

        let got = get_customer(want.id, &conn).expect("Could not get customer");

        assert_eq!(got, Some(want));
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let conn = get_test_connection();

        let got = get_customer(CustomerId::new(999), &conn).expect("Could not get customer");

        assert_eq!(got, None);
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        create_customer("Alice Johnson", "alice@email.com", &conn).unwrap();
        create_customer("Bob Smith", "bob@email.com", &conn).unwrap();

        let count = count_customers(&conn).expect("Could not get count");

        assert_eq!(count, 2);
    }
}
