//! Console front end.

pub mod menu;

pub use menu::{parse_id, Menu};
