pub mod file;
pub mod filter;
pub mod formats;
pub mod list;
pub mod status;
pub mod upload;

// Re-export handler functions for use in routing
pub use file::{download_get, preview_get};
pub use filter::filter_get;
pub use formats::supported_formats_get;
pub use list::{all_get, mydocs_get};
pub use status::status_put;
pub use upload::upload_post;
