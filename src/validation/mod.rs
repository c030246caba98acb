//! Settlement input validator (C2): canonicalises a raw `SettlementWindow`
//! into the sorted position list C3 consumes, or rejects it with the first
//! applicable failure from `spec.md` §4.2's ordered step list.

use crate::core::currency::{parse_decimal_strict, round_to, CurrencyCode, CurrencyRegistry};
use crate::core::party::{AccountId, ParticipantId};
use crate::core::position::{ParticipantPosition, SettlementWindow};
use crate::error::SettlementError;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Runs all seven validation steps in order and returns the canonicalised,
/// sorted position list on success.
pub fn validate_window(
    window: &SettlementWindow,
) -> Result<Vec<ParticipantPosition>, SettlementError> {
    // Step 1: non-empty.
    if window.participants.is_empty() {
        return Err(SettlementError::EmptySettlement);
    }

    // Step 2: one account per participant, checked in full across every
    // participant before any currency/amount parsing begins.
    for raw in &window.participants {
        if raw.accounts.len() != 1 {
            return Err(SettlementError::MultipleAccounts {
                participant_id: ParticipantId::new(raw.id),
            });
        }
    }

    let mut positions = Vec::with_capacity(window.participants.len());
    for raw in &window.participants {
        let account = &raw.accounts[0];
        let currency = CurrencyCode::new(&account.net_settlement_amount.currency).map_err(|_| {
            SettlementError::UnsupportedCurrency {
                code: account.net_settlement_amount.currency.clone(),
            }
        })?;
        let amount =
            parse_decimal_strict(&account.net_settlement_amount.amount).map_err(|_| {
                SettlementError::MalformedInput {
                    field: "amount".to_string(),
                    reason: account.net_settlement_amount.amount.clone(),
                }
            })?;
        positions.push(ParticipantPosition::new(
            ParticipantId::new(raw.id),
            AccountId::new(account.id),
            amount,
            currency,
        ));
    }

    // Step 3: unique participants.
    let mut seen = HashSet::with_capacity(positions.len());
    for pos in &positions {
        if !seen.insert(pos.participant_id()) {
            return Err(SettlementError::DuplicateParticipant {
                participant_id: pos.participant_id(),
            });
        }
    }

    // Step 4: uniform currency.
    let common_currency = positions[0].currency().clone();
    if positions.iter().any(|p| p.currency() != &common_currency) {
        return Err(SettlementError::MixedCurrencies);
    }

    // Step 5: known currency.
    let dp = CurrencyRegistry::decimal_places(&common_currency).map_err(|_| {
        SettlementError::UnsupportedCurrency {
            code: common_currency.as_str().to_string(),
        }
    })?;

    // Step 6: precision conformance, aggregating every offender.
    let offenders: Vec<(ParticipantId, Decimal)> = positions
        .iter()
        .filter(|p| round_to(p.amount(), dp) != p.amount())
        .map(|p| (p.participant_id(), p.amount()))
        .collect();
    if !offenders.is_empty() {
        return Err(SettlementError::InvalidPrecision { offenders });
    }

    // Step 7: zero sum.
    let sum: Decimal = positions.iter().map(|p| p.amount()).sum();
    if sum != Decimal::ZERO {
        return Err(SettlementError::NonZeroSum { sum });
    }

    positions.sort_by(|a, b| {
        a.amount()
            .cmp(&b.amount())
            .then_with(|| a.participant_id().cmp(&b.participant_id()))
    });

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::{RawAccount, RawAmount, RawParticipant};

    fn window(entries: &[(u64, &str)]) -> SettlementWindow {
        SettlementWindow {
            id: 1,
            state: "SETTLED".to_string(),
            participants: entries
                .iter()
                .map(|(id, amount)| RawParticipant {
                    id: *id,
                    accounts: vec![RawAccount {
                        id: *id,
                        net_settlement_amount: RawAmount {
                            amount: amount.to_string(),
                            currency: "USD".to_string(),
                        },
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn test_rejects_empty_window() {
        let w = window(&[]);
        assert_eq!(validate_window(&w), Err(SettlementError::EmptySettlement));
    }

    #[test]
    fn test_rejects_multiple_accounts() {
        let mut w = window(&[(1, "10.00"), (2, "-10.00")]);
        w.participants[0].accounts.push(RawAccount {
            id: 99,
            net_settlement_amount: RawAmount {
                amount: "0.00".to_string(),
                currency: "USD".to_string(),
            },
        });
        assert_eq!(
            validate_window(&w),
            Err(SettlementError::MultipleAccounts {
                participant_id: ParticipantId::new(1)
            })
        );
    }

    #[test]
    fn test_rejects_duplicate_participant() {
        let w = window(&[(1, "10.00"), (1, "-10.00")]);
        assert_eq!(
            validate_window(&w),
            Err(SettlementError::DuplicateParticipant {
                participant_id: ParticipantId::new(1)
            })
        );
    }

    #[test]
    fn test_multiple_accounts_checked_before_currency_parsing() {
        let mut w = window(&[(1, "10.00"), (2, "-10.00")]);
        w.participants[0].accounts[0].net_settlement_amount.currency = "xx".to_string();
        w.participants[1].accounts.push(RawAccount {
            id: 99,
            net_settlement_amount: RawAmount {
                amount: "0.00".to_string(),
                currency: "USD".to_string(),
            },
        });
        assert_eq!(
            validate_window(&w),
            Err(SettlementError::MultipleAccounts {
                participant_id: ParticipantId::new(2)
            })
        );
    }

    #[test]
    fn test_rejects_unknown_currency() {
        let mut w = window(&[(1, "10.00"), (2, "-10.00")]);
        w.participants[0].accounts[0].net_settlement_amount.currency = "XXX".to_string();
        w.participants[1].accounts[0].net_settlement_amount.currency = "XXX".to_string();
        assert!(matches!(
            validate_window(&w),
            Err(SettlementError::UnsupportedCurrency { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_precision_aggregates_all_offenders() {
        let w = window(&[(1, "0.001"), (2, "-0.001")]);
        match validate_window(&w) {
            Err(SettlementError::InvalidPrecision { offenders }) => {
                assert_eq!(offenders.len(), 2);
            }
            other => panic!("expected InvalidPrecision, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_nonzero_sum() {
        let w = window(&[(1, "1.00"), (2, "-2.00")]);
        assert_eq!(
            validate_window(&w),
            Err(SettlementError::NonZeroSum {
                sum: "-1.00".parse().unwrap()
            })
        );
    }

    #[test]
    fn test_accepts_and_sorts_by_amount_then_id() {
        let w = window(&[(2, "10.00"), (1, "-10.00")]);
        let positions = validate_window(&w).unwrap();
        assert_eq!(positions[0].participant_id(), ParticipantId::new(1));
        assert_eq!(positions[1].participant_id(), ParticipantId::new(2));
    }

    #[test]
    fn test_tie_break_by_ascending_participant_id() {
        let w = window(&[(3, "0.00"), (1, "0.00")]);
        let positions = validate_window(&w).unwrap();
        assert_eq!(positions[0].participant_id(), ParticipantId::new(1));
        assert_eq!(positions[1].participant_id(), ParticipantId::new(3));
    }
}
