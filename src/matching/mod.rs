pub mod allotment;
pub mod scorer;
pub mod selector;
pub mod status;

pub use allotment::*;
pub use scorer::*;
pub use selector::*;
pub use status::*;
