mod alert;
mod save;
mod status;
mod sync;

pub use alert::{Alert, LogAlert};
pub use save::geojson_files;
pub use status::{FetchReport, FetchState, FetchTicket, SaveStatus};
pub use sync::{apply_generated, MapSync, SAVE_FAILED_ALERT};
