pub mod error;
pub mod odds;
pub mod types;

pub use error::*;
pub use odds::*;
pub use types::*;
