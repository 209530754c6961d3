pub mod error;
pub mod types;
pub mod value;

pub use error::{Result, SyncError};
pub use types::GameMode;
