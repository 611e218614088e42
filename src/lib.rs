//! Customer Rewards computes the reward points customers earn from their
//! purchases over a trailing three month window.
//!
//! Points are awarded per transaction using a fixed, tiered formula (see
//! [rewards::points_for]) and then summed per calendar month and in total for
//! each customer (see [rewards::summarize_all] and [rewards::summarize_one]).
//!
//! The library also provides a SQLite backed store and a JSON REST API that
//! exposes the summaries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod calendar;
mod customer;
mod db;
mod logging;
mod routing;
mod timezone;
mod transaction;

pub mod endpoints;
pub mod rewards;
pub mod seed;
pub mod stores;

pub use app_state::AppState;
pub use calendar::{MonthKey, months_before};
pub use customer::{Customer, CustomerId, count_customers, create_customer};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::{get_local_offset, local_now};
pub use transaction::{Transaction, TransactionBuilder, count_transactions, create_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No customer exists with the given ID.
    ///
    /// This is the only error the rewards calculations themselves produce.
    /// HTTP handlers translate it into a 404 response.
    #[error("customer not found with id: {0}")]
    CustomerNotFound(CustomerId),

    /// The `as_of` date-time supplied by a client could not be parsed.
    #[error("invalid as_of date-time \"{0}\", expected the format YYYY-MM-DDTHH:MM:SS")]
    InvalidAsOf(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The email address of a new customer is already used by another customer.
    #[error("the email address is already used by another customer")]
    DuplicateEmail,

    /// A transaction was created for a customer that does not exist.
    #[error("the customer ID does not refer to a valid customer")]
    InvalidCustomer(CustomerId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("customer.email") => Error::DuplicateEmail,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidAsOf(_) => StatusCode::BAD_REQUEST,
            Error::InvalidTimezoneError(ref timezone) => {
                tracing::error!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                );
            }
        };

        error_response(status, &self.to_string())
    }
}

/// A JSON error body of the form `{"error": message}`.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
