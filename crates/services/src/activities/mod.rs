//! Opening activities, driving their timers, and finishing them.

mod runner;
mod ticker;

pub use runner::{ActivityPlayer, ActivityRunner};
pub use ticker::{DriveEnd, drive, drive_every};
