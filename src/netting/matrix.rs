//! Payment-matrix model (C4): the immutable carrier for C3's output plus the
//! invariant checks from `spec.md` §3.

use crate::core::currency::CurrencyCode;
use crate::core::party::ParticipantId;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Sparse `payer -> payee -> amount` result of the netting engine.
///
/// Iteration is always payer-ascending, then payee-ascending within each
/// payer (`BTreeMap` ordering), independent of the order cells were
/// inserted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMatrix {
    cells: BTreeMap<ParticipantId, BTreeMap<ParticipantId, Decimal>>,
    currency: CurrencyCode,
}

impl PaymentMatrix {
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            cells: BTreeMap::new(),
            currency,
        }
    }

    /// Records a transfer from `payer` to `payee`. Adds to any existing
    /// cell rather than overwriting, so repeated calls for the same pair
    /// accumulate (the engine never emits the same pair twice, but this
    /// keeps the type safe to build incrementally).
    pub fn record(&mut self, payer: ParticipantId, payee: ParticipantId, amount: Decimal) {
        *self
            .cells
            .entry(payer)
            .or_default()
            .entry(payee)
            .or_insert(Decimal::ZERO) += amount;
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Deterministic iteration: payers ascending, payees ascending within
    /// each payer.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, ParticipantId, Decimal)> + '_ {
        self.cells.iter().flat_map(|(payer, payees)| {
            payees
                .iter()
                .map(move |(payee, amount)| (*payer, *payee, *amount))
        })
    }

    pub fn transaction_count(&self) -> usize {
        self.cells.values().map(|payees| payees.len()).sum()
    }

    pub fn control_sum(&self) -> Decimal {
        self.iter().map(|(_, _, amount)| amount).sum()
    }

    pub fn payments_to(&self, payee: ParticipantId) -> Decimal {
        self.iter()
            .filter(|(_, p, _)| *p == payee)
            .map(|(_, _, amount)| amount)
            .sum()
    }

    pub fn payments_from(&self, payer: ParticipantId) -> Decimal {
        self.cells
            .get(&payer)
            .map(|payees| payees.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn payers(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.cells.keys().copied()
    }

    pub fn payees(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.cells
            .values()
            .flat_map(|payees| payees.keys())
            .copied()
    }

    /// Re-checks invariants 1–4 of `spec.md` §3. `positions` maps each
    /// participant to their original signed amount, used to check
    /// conservation (invariants 2 and 3).
    pub fn audit(
        &self,
        positions: &BTreeMap<ParticipantId, Decimal>,
    ) -> Result<(), String> {
        for (payer, payee, amount) in self.iter() {
            if amount <= Decimal::ZERO {
                return Err(format!(
                    "non-positive transfer {payer}->{payee}: {amount}"
                ));
            }
        }

        for payer in self.payers() {
            let original = positions.get(&payer).copied().unwrap_or(Decimal::ZERO);
            if self.payments_from(payer) != original.abs() {
                return Err(format!("payer {payer} does not conserve debit amount"));
            }
        }

        for payee in self.payees() {
            let original = positions.get(&payee).copied().unwrap_or(Decimal::ZERO);
            if self.payments_to(payee) != original.abs() {
                return Err(format!("payee {payee} does not conserve credit amount"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    #[test]
    fn test_record_and_iterate_deterministic_order() {
        let mut m = PaymentMatrix::new(usd());
        m.record(ParticipantId::new(2), ParticipantId::new(1), dec!(5));
        m.record(ParticipantId::new(1), ParticipantId::new(3), dec!(2));
        let pairs: Vec<_> = m.iter().map(|(p, q, _)| (p.value(), q.value())).collect();
        assert_eq!(pairs, vec![(1, 3), (2, 1)]);
    }

    #[test]
    fn test_transaction_count_and_control_sum() {
        let mut m = PaymentMatrix::new(usd());
        m.record(ParticipantId::new(1), ParticipantId::new(2), dec!(3));
        m.record(ParticipantId::new(1), ParticipantId::new(3), dec!(4));
        assert_eq!(m.transaction_count(), 2);
        assert_eq!(m.control_sum(), dec!(7));
    }

    #[test]
    fn test_audit_detects_non_positive_transfer() {
        let mut m = PaymentMatrix::new(usd());
        m.record(ParticipantId::new(1), ParticipantId::new(2), dec!(0));
        assert!(m.audit(&BTreeMap::new()).is_err());
    }

    #[test]
    fn test_audit_passes_on_conserving_matrix() {
        let mut m = PaymentMatrix::new(usd());
        m.record(ParticipantId::new(1), ParticipantId::new(2), dec!(10));
        let mut positions = BTreeMap::new();
        positions.insert(ParticipantId::new(1), dec!(10));
        positions.insert(ParticipantId::new(2), dec!(-10));
        assert!(m.audit(&positions).is_ok());
    }
}
