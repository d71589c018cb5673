// Export all route modules
pub mod assignment;
pub mod match_status;
pub mod notifications;
pub mod refresh;

// Re-export all route handlers for easy importing
pub use assignment::*;
pub use match_status::*;
pub use notifications::*;
pub use refresh::*;
