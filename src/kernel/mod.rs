//! Kernel patch and source handling
//!
//! - Upstream patch sources and release resolution
//! - Mainline kernel mirror URLs
//! - Safe local filenames and archive extraction

pub mod sources;
pub mod resolver;
pub mod mirror;

pub mod filename;
pub mod extract;
