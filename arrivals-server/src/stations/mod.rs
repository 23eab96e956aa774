//! Station directory.
//!
//! Builds the dropdown's station list from the MBTA stops endpoint:
//! one entry per station name, sorted alphabetically.

mod directory;

pub use directory::{StationDirectory, build_directory};
