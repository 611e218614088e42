//! Sample customers and purchases for trying out the API.

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, PrimitiveDateTime};

use crate::{Error, Transaction, calendar::months_before, create_customer, create_transaction};

/// A sample purchase: amount in cents, months and days before now, and a description.
type SamplePurchase = (i64, u8, i64, &'static str);

const ALICE_PURCHASES: &[SamplePurchase] = &[
    (120_00, 2, 15, "Electronics purchase"),
    (75_50, 2, 10, "Grocery shopping"),
    (45_25, 2, 5, "Coffee and snacks"),
    (200_00, 1, 20, "Clothing purchase"),
    (85_75, 1, 12, "Restaurant dinner"),
    (150_00, 1, 8, "Home improvement"),
    (95_00, 0, 10, "Gas and car supplies"),
    (125_50, 0, 5, "Online shopping"),
];

const BOB_PURCHASES: &[SamplePurchase] = &[
    (250_00, 2, 18, "Laptop accessories"),
    (60_00, 2, 14, "Books"),
    (35_80, 2, 8, "Lunch"),
    (180_25, 1, 25, "Sports equipment"),
    (90_00, 1, 15, "Pharmacy"),
    (110_00, 0, 12, "Utility bills"),
    (70_50, 0, 6, "Subscription services"),
    (320_00, 0, 3, "Furniture purchase"),
];

const CHARLIE_PURCHASES: &[SamplePurchase] = &[
    (80_00, 2, 22, "Grocery shopping"),
    (150_75, 2, 16, "Medical expenses"),
    (40_00, 2, 11, "Entertainment"),
    (220_00, 1, 28, "Travel booking"),
    (55_25, 1, 18, "Pet supplies"),
    (130_00, 1, 9, "Home repairs"),
    (95_50, 0, 15, "Insurance payment"),
    (175_00, 0, 8, "Professional services"),
    (65_75, 0, 2, "Food delivery"),
];

/// Create three sample customers with purchases spread over the three months before `now`.
///
/// All purchases happen strictly before `now`, so they all fall inside the rewards window
/// ending at `now`. The customers and purchases are created in a single database
/// transaction: either all of them are created, or none are.
///
/// # Errors
/// Returns an [Error::DuplicateEmail] if the sample customers already exist, or an
/// [Error::SqlError] if there is some other SQL error.
pub fn seed_sample_data(connection: &Connection, now: PrimitiveDateTime) -> Result<(), Error> {
    // Using unchecked_transaction because callers may only have &Connection from a MutexGuard.
    let tx = connection.unchecked_transaction()?;

    let samples = [
        ("Alice Johnson", "alice@email.com", ALICE_PURCHASES),
        ("Bob Smith", "bob@email.com", BOB_PURCHASES),
        ("Charlie Brown", "charlie@email.com", CHARLIE_PURCHASES),
    ];

    for (name, email, purchases) in samples {
        let customer = create_customer(name, email, &tx)?;

        for &(cents, months, days, description) in purchases {
            let timestamp = months_before(now, months).saturating_sub(Duration::days(days));
            let builder = Transaction::build(customer.id, Decimal::new(cents, 2), timestamp)
                .description(description);

            create_transaction(builder, &tx)?;
        }
    }

    tx.commit()?;

    tracing::info!("Loaded sample data for {} customers", samples.len());

    Ok(())
}
