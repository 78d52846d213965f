/// UTC timestamp used for profile dates.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
