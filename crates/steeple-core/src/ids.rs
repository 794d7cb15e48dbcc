// ABOUTME: Identifier and clock helpers for newly created content items.
// ABOUTME: Ids are ULIDs; timestamps are epoch milliseconds and dates are YYYY-MM-DD.

use chrono::Utc;
use ulid::Ulid;

/// Fresh item id. ULIDs sort by creation time like the millisecond ids found in
/// older stored data, but stay unique when many items are created at once.
pub fn new_item_id() -> String {
    Ulid::new().to_string()
}

/// Current time as milliseconds since the Unix epoch, the unit item timestamps use.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's date as `YYYY-MM-DD`.
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
