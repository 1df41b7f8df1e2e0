use devclass_sql::SQLStore;

use crate::error::DeviceError;

/// DDL for the device table.
///
/// The hardware fields live as one JSON document in `data`; the derived
/// prediction and timestamps get their own columns.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS devices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data TEXT NOT NULL,
        predicted_price_range INTEGER,
        create_at TEXT,
        update_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_dev_price_range ON devices(predicted_price_range)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), DeviceError> {
    sql.migrate(SCHEMA)
        .map_err(|e| DeviceError::Storage(format!("schema init failed: {e}")))
}
