pub mod artifact;
pub mod error;
pub mod types;

pub use artifact::*;
pub use error::*;
pub use types::*;
