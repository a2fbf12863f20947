pub mod stream;
pub mod unary;

pub use stream::{StreamExecutor, Subscription};
pub use unary::{EnvelopeResult, UnaryExecutor};
