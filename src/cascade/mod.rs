//! Cost-ordered provider cascade.

pub mod error;
pub mod executor;
pub mod types;


pub use error::{CascadeError, CascadeResult};
pub use executor::CascadeExecutor;
pub use types::{
    AttemptOutcome, CascadeOutcome, CascadePolicy, DEFAULT_MAX_RETRIES, ProviderAttempt,
};
