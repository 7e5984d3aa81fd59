pub mod format;

pub use format::{group_by_client, group_by_date, DateGroups};
