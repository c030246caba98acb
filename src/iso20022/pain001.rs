//! ISO 20022 pain.001.001.03 document tree and emitter (C5).
//!
//! The struct shapes mirror a `quick-xml` + `serde` envelope the way a
//! `CustomerCreditTransferInitiation` message is modelled elsewhere in this
//! codebase's lineage: `@attr` fields for XML attributes, `$text` for a
//! leaf's text content.

use crate::core::party::ParticipantId;
use crate::core::position::DfspDirectory;
use crate::error::SettlementError;
use crate::netting::PaymentMatrix;
use crate::rng::RandomSource;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const PAIN001_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDocument {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "CstmrCdtTrfInitn")]
    pub customer_credit_transfer_initiation: CustomerCreditTransferInitiation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreditTransferInitiation {
    #[serde(rename = "GrpHdr")]
    pub group_header: GroupHeader,
    #[serde(rename = "PmtInf")]
    pub payment_information: Vec<PaymentInformation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHeader {
    #[serde(rename = "MsgId")]
    pub msg_id: String,
    #[serde(rename = "CreDtTm")]
    pub cre_dt_tm: String,
    #[serde(rename = "NbOfTxs")]
    pub nb_of_txs: String,
    #[serde(rename = "CtrlSum")]
    pub ctrl_sum: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInformation {
    #[serde(rename = "PmtInfId")]
    pub pmt_inf_id: String,
    #[serde(rename = "NbOfTxs")]
    pub nb_of_txs: String,
    #[serde(rename = "CtrlSum")]
    pub ctrl_sum: String,
    #[serde(rename = "ReqdExctnDt")]
    pub reqd_exctn_dt: String,
    #[serde(rename = "Dbtr")]
    pub dbtr: Debtor,
    #[serde(rename = "DbtrAcct")]
    pub dbtr_acct: DebtorAccount,
    #[serde(rename = "CdtTrfTxInf")]
    pub credit_transfer_transactions: Vec<CreditTransferTransactionInformation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debtor {
    #[serde(rename = "Nm")]
    pub nm: String,
    #[serde(rename = "PstlAdr")]
    pub pstl_adr: PostalAddress,
    #[serde(rename = "Id")]
    pub id: PartyId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyId {
    #[serde(rename = "OrgId")]
    pub org_id: OrgId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgId {
    #[serde(rename = "BICOrBEI")]
    pub bic_or_bei: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "Ctry")]
    pub ctry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtorAccount {
    #[serde(rename = "Id")]
    pub id: AccountIdOthr,
    #[serde(rename = "Ccy")]
    pub ccy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdOthr {
    #[serde(rename = "Othr")]
    pub othr: OthrId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OthrId {
    #[serde(rename = "Id")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransferTransactionInformation {
    #[serde(rename = "PmtId")]
    pub pmt_id: PaymentIdentification,
    #[serde(rename = "Amt")]
    pub amt: Amount,
    #[serde(rename = "Cdtr")]
    pub cdtr: Creditor,
    #[serde(rename = "CdtrAcct")]
    pub cdtr_acct: AccountIdOthr,
    #[serde(rename = "RmtInf")]
    pub rmt_inf: RemittanceInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIdentification {
    #[serde(rename = "EndToEndId")]
    pub end_to_end_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amount {
    #[serde(rename = "InstdAmt")]
    pub instd_amt: InstructedAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructedAmount {
    #[serde(rename = "@Ccy")]
    pub ccy: String,
    #[serde(rename = "$text")]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creditor {
    #[serde(rename = "Nm")]
    pub nm: String,
    #[serde(rename = "PstlAdr")]
    pub pstl_adr: PostalAddress,
    #[serde(rename = "CtctDtls")]
    pub ctct_dtls: ContactDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(rename = "Nm")]
    pub nm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceInformation {
    #[serde(rename = "Ustrd")]
    pub ustrd: String,
}

const HUB_BIC: &str = "CITICIAX";
const DEFAULT_CONTACT_NAME: &str = "Casablanca JV Org";

fn strip_leading_zeros(account_id: &str) -> String {
    let stripped = account_id.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

fn fresh_msg_id(rng: &mut dyn RandomSource) -> String {
    let mut bytes = [0u8; 27];
    rng.fill_bytes(&mut bytes);
    let encoded = BASE64.encode(bytes);
    encoded.chars().take(35).collect()
}

fn fresh_end_to_end_id(rng: &mut dyn RandomSource) -> String {
    loop {
        let mut bytes = [0u8; 5];
        rng.fill_bytes(&mut bytes);
        if bytes.iter().any(|b| *b != 0) {
            return bytes.iter().map(|b| format!("{:02x}", b)).collect();
        }
    }
}

/// Emits a pain.001.001.03 document from `matrix`, cloning `template`
/// before mutating it so repeated calls never share state (see
/// `spec.md` §9's "independent documents" resolution).
pub fn emit(
    template: &PaymentDocument,
    matrix: &PaymentMatrix,
    directory: &DfspDirectory,
    window_id: u64,
    rng: &mut dyn RandomSource,
) -> Result<PaymentDocument, SettlementError> {
    if template.xmlns != PAIN001_NAMESPACE {
        return Err(SettlementError::BadTemplate {
            reason: format!(
                "expected xmlns {PAIN001_NAMESPACE}, got {}",
                template.xmlns
            ),
        });
    }
    let prototype_pmt_inf =
        template
            .customer_credit_transfer_initiation
            .payment_information
            .first()
            .ok_or_else(|| SettlementError::BadTemplate {
                reason: "template has no PmtInf prototype".to_string(),
            })?;
    let prototype_txn = prototype_pmt_inf
        .credit_transfer_transactions
        .first()
        .ok_or_else(|| SettlementError::BadTemplate {
            reason: "template has no CdtTrfTxInf prototype".to_string(),
        })?
        .clone();

    for id in matrix.payers().chain(matrix.payees()) {
        if directory.get(id).is_none() {
            return Err(SettlementError::UnknownParticipant { participant_id: id });
        }
    }

    let mut doc = template.clone();

    doc.customer_credit_transfer_initiation.group_header = GroupHeader {
        msg_id: fresh_msg_id(rng),
        cre_dt_tm: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        nb_of_txs: matrix.transaction_count().to_string(),
        ctrl_sum: matrix.control_sum().normalize().to_string(),
    };

    let mut remittance_prototype = prototype_txn.rmt_inf.clone();
    remittance_prototype.ustrd = format!("Settlement Window {window_id}");

    let reqd_exctn_dt = Utc::now().format("%Y-%m-%d").to_string();
    let mut pmt_inf_groups = Vec::new();

    for (ordinal, payer) in matrix.payers().enumerate() {
        let payer_entry = directory.get(payer).expect("checked above");
        let payer_payments: Vec<(ParticipantId, ParticipantId, _)> =
            matrix.iter().filter(|(p, _, _)| *p == payer).collect();

        let mut txns = Vec::with_capacity(payer_payments.len());
        for (_, payee, amount) in &payer_payments {
            let payee_entry = directory.get(*payee).expect("checked above");
            let mut txn = prototype_txn.clone();
            txn.pmt_id.end_to_end_id = fresh_end_to_end_id(rng);
            txn.amt.instd_amt = InstructedAmount {
                ccy: matrix.currency().as_str().to_string(),
                value: amount.normalize().to_string(),
            };
            txn.cdtr = Creditor {
                nm: payee_entry.name.clone(),
                pstl_adr: PostalAddress {
                    ctry: payee_entry.country.clone(),
                },
                ctct_dtls: ContactDetails {
                    nm: DEFAULT_CONTACT_NAME.to_string(),
                },
            };
            txn.cdtr_acct = AccountIdOthr {
                othr: OthrId {
                    id: strip_leading_zeros(&payee_entry.account_id),
                },
            };
            txn.rmt_inf = remittance_prototype.clone();
            txns.push(txn);
        }

        let ctrl_sum: rust_decimal::Decimal =
            payer_payments.iter().map(|(_, _, amount)| *amount).sum();

        pmt_inf_groups.push(PaymentInformation {
            pmt_inf_id: ordinal.to_string(),
            nb_of_txs: txns.len().to_string(),
            ctrl_sum: ctrl_sum.normalize().to_string(),
            reqd_exctn_dt: reqd_exctn_dt.clone(),
            dbtr: Debtor {
                nm: payer_entry.name.clone(),
                pstl_adr: PostalAddress {
                    ctry: payer_entry.country.clone(),
                },
                id: PartyId {
                    org_id: OrgId {
                        bic_or_bei: HUB_BIC.to_string(),
                    },
                },
            },
            dbtr_acct: DebtorAccount {
                id: AccountIdOthr {
                    othr: OthrId {
                        id: strip_leading_zeros(&payer_entry.account_id),
                    },
                },
                ccy: matrix.currency().as_str().to_string(),
            },
            credit_transfer_transactions: txns,
        });
    }

    doc.customer_credit_transfer_initiation.payment_information = pmt_inf_groups;

    Ok(doc)
}

/// Serialises a document to XML, 2-space indented, per `spec.md` §4.5 step 6.
pub fn serialize(doc: &PaymentDocument) -> Result<String, SettlementError> {
    let mut buffer = String::new();
    let mut ser = quick_xml::se::Serializer::new(&mut buffer);
    ser.indent(' ', 2);
    doc.serialize(ser)
        .map_err(|e| SettlementError::BadTemplate {
            reason: format!("failed to serialise document: {e}"),
        })?;
    Ok(buffer)
}
