mod popups;
mod selector;

pub use popups::*;
pub use selector::*;
