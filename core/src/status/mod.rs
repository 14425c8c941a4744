//! Status publishing
//!
//! Read-only snapshots of button state, writing mode, the last action and
//! the statistics report, exposed as named records.

mod handler;
mod publisher;
mod report;


pub use handler::{PRESSED, RELEASED, StatusSignalHandler};
pub use publisher::{FileStatusPublisher, MemoryStatusPublisher, StatusPublisher, StatusRecord};
pub use report::{StatsReport, WORDS_PER_PAGE};
