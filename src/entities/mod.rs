pub mod funding_request;
pub mod match_record;
pub mod notification;
pub mod profiles;

pub use funding_request::*;
pub use match_record::*;
pub use notification::*;
pub use profiles::*;
