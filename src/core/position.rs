use crate::core::currency::CurrencyCode;
use crate::core::party::{AccountId, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single participant's net settlement position, already canonicalised by
/// the validator: exactly one account, a parsed `Decimal` amount, and a
/// validated `CurrencyCode`.
///
/// Positive `amount` means the participant is a net debtor (owes the hub);
/// negative means a net creditor (the hub owes the participant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPosition {
    participant_id: ParticipantId,
    account_id: AccountId,
    amount: Decimal,
    currency: CurrencyCode,
}

impl ParticipantPosition {
    pub fn new(
        participant_id: ParticipantId,
        account_id: AccountId,
        amount: Decimal,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            participant_id,
            account_id,
            amount,
            currency,
        }
    }

    pub fn participant_id(&self) -> ParticipantId {
        self.participant_id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

/// Raw, not-yet-validated settlement window, matching the JSON shape the
/// engine is fed at its boundary (see `spec.md` §6). A participant may
/// arrive with zero, one, or more accounts; collapsing that to exactly one
/// `ParticipantPosition` is the validator's job (C2), not this type's.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettlementWindow {
    pub id: u64,
    pub state: String,
    pub participants: Vec<RawParticipant>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawParticipant {
    pub id: u64,
    pub accounts: Vec<RawAccount>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawAccount {
    pub id: u64,
    #[serde(rename = "netSettlementAmount")]
    pub net_settlement_amount: RawAmount,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawAmount {
    pub amount: String,
    pub currency: String,
}

/// Directory entry for a participant, consumed only by the emitter (C5).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DfspEntry {
    pub name: String,
    pub country: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
}

/// `participant_id -> { name, country, account_id }`, as described in
/// `spec.md` §3/§6. Keyed by the raw numeric id so the emitter can look a
/// payer or payee straight up without round-tripping through `ParticipantId`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DfspDirectory(HashMap<String, DfspEntry>);

impl DfspDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, participant_id: ParticipantId, entry: DfspEntry) {
        self.0.insert(participant_id.value().to_string(), entry);
    }

    pub fn get(&self, participant_id: ParticipantId) -> Option<&DfspEntry> {
        self.0.get(&participant_id.value().to_string())
    }
}
