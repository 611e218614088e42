//! Database initialization and the SQL representations of amounts and timestamps.

use std::str::FromStr;

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{customer::create_customer_table, transaction::create_transaction_table};

/// Create the application tables if they do not already exist.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    create_customer_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}

/// Fixed width so that comparing the stored strings orders timestamps chronologically.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:9]"
);

/// A timestamp stored as `YYYY-MM-DD HH:MM:SS.nnnnnnnnn` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SqlTimestamp(pub PrimitiveDateTime);

impl ToSql for SqlTimestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = self
            .0
            .format(TIMESTAMP_FORMAT)
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?;

        Ok(ToSqlOutput::from(text))
    }
}

impl FromSql for SqlTimestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT)
            .map(SqlTimestamp)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A monetary amount stored as exact decimal text, e.g. "120.00".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SqlAmount(pub Decimal);

impl ToSql for SqlAmount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for SqlAmount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Decimal::from_str(text)
            .map(SqlAmount)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
