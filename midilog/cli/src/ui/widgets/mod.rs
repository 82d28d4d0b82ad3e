pub mod keyboard;
pub mod log;
pub mod popup;
