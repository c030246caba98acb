use crate::core::party::ParticipantId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure mode the engine can surface, tagged with exactly the
/// evidence needed to reproduce it.
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("settlement window has no positions")]
    EmptySettlement,

    #[error("participant {participant_id} holds more than one account")]
    MultipleAccounts { participant_id: ParticipantId },

    #[error("participant {participant_id} appears more than once")]
    DuplicateParticipant { participant_id: ParticipantId },

    #[error("positions do not share a single currency")]
    MixedCurrencies,

    #[error("unsupported currency: {code}")]
    UnsupportedCurrency { code: String },

    #[error("{} position(s) do not conform to their currency's decimal precision", offenders.len())]
    InvalidPrecision {
        offenders: Vec<(ParticipantId, Decimal)>,
    },

    #[error("positions do not sum to zero: {sum}")]
    NonZeroSum { sum: Decimal },

    #[error("netting engine failed to balance the debtor stack (defect)")]
    FailedToBalance,

    #[error("participant {participant_id} is missing from the directory")]
    UnknownParticipant { participant_id: ParticipantId },

    #[error("invalid template: {reason}")]
    BadTemplate { reason: String },

    #[error("invalid input for field {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Boundary-level failure: the raw JSON did not even parse into a well
    /// formed decimal/currency shape. Not part of the core error taxonomy —
    /// this fires before C2 has anything to canonicalise.
    #[error("malformed {field}: {reason}")]
    MalformedInput { field: String, reason: String },
}
