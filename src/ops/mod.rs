//! Typed Operation Surface (spec §4.6): one thin wrapper per RPC, sharing
//! the six-step skeleton the spec lays out. Organized by RPC kind exactly
//! as spec §6.2 groups them.

pub mod account;
pub mod connection;
pub mod market_depth;
pub mod positions;
pub mod streams;
pub mod symbol;
pub mod trading;

use crate::executor::unary::EnvelopeResult;

/// Every generated reply type follows the universal envelope (spec §3):
/// `oneof result { Data data = 1; Error error = 2; }`. This trait lets the
/// `ops::*` wrappers strip that envelope uniformly instead of hand-writing
/// the same three-armed match on every one of the 43 RPCs.
pub(crate) trait Envelope {
    type Data;
    fn into_result(self) -> EnvelopeResult<Self::Data>;
}

/// Implements `Envelope` for a generated `<Name>Reply` type whose `oneof`
/// lives in module `<name>_reply` and whose payload variant is `Data`.
macro_rules! impl_envelope {
    ($reply:ty, $module:ident, $data:ty) => {
        impl $crate::ops::Envelope for $reply {
            type Data = $data;

            fn into_result(self) -> $crate::executor::unary::EnvelopeResult<Self::Data> {
                use crate::proto::$module::Result as Variant;
                match self.result {
                    Some(Variant::Data(data)) => Ok(data),
                    Some(Variant::Error(err)) => Err((err.code, err.message)),
                    None => Err((
                        "EMPTY_REPLY".to_string(),
                        "reply carried neither data nor error".to_string(),
                    )),
                }
            }
        }
    };
}

pub(crate) use impl_envelope;
