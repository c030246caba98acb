//! # settlement-engine
//!
//! Minimum-payments netting engine and ISO 20022 pain.001.001.03
//! credit-transfer payment-file generator for an interbank settlement hub.
//!
//! Given the net settlement position of each participant in a closed
//! settlement window, this engine computes a minimal set of pairwise
//! credit transfers that discharges every position, then serialises those
//! transfers into a bank-acceptable XML instruction file.
//!
//! ## Architecture
//!
//! - **core** — decimal/currency primitives, participant ids, positions
//! - **validation** — canonicalises and validates a settlement window
//! - **netting** — the greedy two-pointer minimum-payments algorithm and
//!   its payment-matrix result type
//! - **iso20022** — pain.001.001.03 document tree and emitter
//! - **fx** — Citi pain-01 inner FX rate block mapping (orthogonal to the
//!   settlement flow)

pub mod core;
pub mod error;
pub mod fx;
pub mod iso20022;
pub mod netting;
pub mod rng;
pub mod validation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{CurrencyCode, CurrencyRegistry};
    pub use crate::core::party::{AccountId, ParticipantId};
    pub use crate::core::position::{DfspDirectory, ParticipantPosition, SettlementWindow};
    pub use crate::error::SettlementError;
    pub use crate::iso20022::{emit as emit_pain001, PaymentDocument};
    pub use crate::netting::{net, PaymentMatrix};
    pub use crate::validation::validate_window;
}
