pub mod amortization;
pub mod error;
pub mod fees;
pub mod rules;
pub mod types;

#[cfg(feature = "scenario")]
pub mod scenario;

#[cfg(feature = "qualification")]
pub mod qualification;

#[cfg(feature = "grid")]
pub mod grid;

pub use error::LoanScopeError;
pub use types::*;

/// Standard result type for all loanscope operations
pub type LoanScopeResult<T> = Result<T, LoanScopeError>;
