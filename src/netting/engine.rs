//! Netting engine (C3): the greedy two-pointer minimum-payments algorithm.

use crate::core::party::ParticipantId;
use crate::core::position::ParticipantPosition;
use crate::error::SettlementError;
use crate::netting::matrix::PaymentMatrix;
use rust_decimal::Decimal;
use std::collections::VecDeque;

struct Working {
    id: ParticipantId,
    amount: Decimal,
}

/// Runs the netting algorithm over positions already validated and sorted
/// by `crate::validation::validate_window` (ascending amount, ties
/// ascending participant id).
pub fn net(positions: &[ParticipantPosition]) -> Result<PaymentMatrix, SettlementError> {
    let currency = positions
        .first()
        .map(|p| p.currency().clone())
        .unwrap_or_else(|| unreachable!("validator guarantees non-empty input"));

    let split = positions
        .iter()
        .position(|p| p.amount() > Decimal::ZERO)
        .unwrap_or(positions.len());

    let mut creditors: VecDeque<Working> = positions[..split]
        .iter()
        .map(|p| Working {
            id: p.participant_id(),
            amount: p.amount(),
        })
        .collect();

    let mut debtors: Vec<Working> = positions[split..]
        .iter()
        .map(|p| Working {
            id: p.participant_id(),
            amount: p.amount(),
        })
        .collect();

    let mut matrix = PaymentMatrix::new(currency);

    while let Some(mut creditor) = creditors.pop_front() {
        while let Some(last) = debtors.last() {
            if creditor.amount + last.amount <= Decimal::ZERO {
                let debtor = debtors.pop().unwrap();
                matrix.record(debtor.id, creditor.id, debtor.amount);
                creditor.amount += debtor.amount;
            } else {
                break;
            }
        }

        if creditor.amount < Decimal::ZERO {
            match debtors.last_mut() {
                Some(debtor) => {
                    matrix.record(debtor.id, creditor.id, -creditor.amount);
                    debtor.amount += creditor.amount;
                }
                None => return Err(SettlementError::FailedToBalance),
            }
        }
    }

    if !debtors.is_empty() {
        return Err(SettlementError::FailedToBalance);
    }

    Ok(matrix)
}
