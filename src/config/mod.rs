mod options;
mod retry;

pub use options::CallOptions;
pub use retry::{defaults, ExponentialBackoff, RetryPolicy};
