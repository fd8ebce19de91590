//! API request handlers.

mod images;
mod legacy;
mod properties;

pub use images::*;
pub use legacy::*;
pub use properties::*;
