pub mod error;
pub mod investment;
pub mod time_value;
pub mod types;

#[cfg(feature = "regions")]
pub mod regions;

pub use error::RentalYieldError;
pub use types::*;

/// Standard result type for all rental-yield operations
pub type RentalYieldResult<T> = Result<T, RentalYieldError>;
