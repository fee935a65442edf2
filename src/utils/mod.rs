pub mod datetime;
pub mod theme;
