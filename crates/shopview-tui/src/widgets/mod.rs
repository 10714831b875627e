//! Reusable widgets and formatting helpers shared by screens.

pub mod price_fmt;
pub mod search_box;
