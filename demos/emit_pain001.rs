//! End-to-end netting and pain.001.001.03 emission example.
//!
//! Nets a settlement window, then emits a bank-acceptable ISO 20022
//! credit-transfer payment file from the result.

use settlement_engine::core::position::{
    DfspDirectory, DfspEntry, RawAccount, RawAmount, RawParticipant, SettlementWindow,
};
use settlement_engine::core::party::ParticipantId;
use settlement_engine::iso20022::pain001::{
    Amount, AccountIdOthr, ContactDetails, Creditor, CreditTransferTransactionInformation,
    CustomerCreditTransferInitiation, Debtor, DebtorAccount, GroupHeader, InstructedAmount,
    OrgId, OthrId, PartyId, PaymentDocument, PaymentIdentification, PaymentInformation,
    PostalAddress, RemittanceInformation, PAIN001_NAMESPACE,
};
use settlement_engine::netting::net;
use settlement_engine::rng::CryptoRandomSource;
use settlement_engine::validation::validate_window;

fn skeleton() -> PaymentDocument {
    PaymentDocument {
        xmlns: PAIN001_NAMESPACE.to_string(),
        customer_credit_transfer_initiation: CustomerCreditTransferInitiation {
            group_header: GroupHeader {
                msg_id: String::new(),
                cre_dt_tm: String::new(),
                nb_of_txs: String::new(),
                ctrl_sum: String::new(),
            },
            payment_information: vec![PaymentInformation {
                pmt_inf_id: "0".to_string(),
                nb_of_txs: "0".to_string(),
                ctrl_sum: "0".to_string(),
                reqd_exctn_dt: String::new(),
                dbtr: Debtor {
                    nm: String::new(),
                    pstl_adr: PostalAddress {
                        ctry: String::new(),
                    },
                    id: PartyId {
                        org_id: OrgId {
                            bic_or_bei: "CITICIAX".to_string(),
                        },
                    },
                },
                dbtr_acct: DebtorAccount {
                    id: AccountIdOthr {
                        othr: OthrId { id: String::new() },
                    },
                    ccy: String::new(),
                },
                credit_transfer_transactions: vec![CreditTransferTransactionInformation {
                    pmt_id: PaymentIdentification {
                        end_to_end_id: String::new(),
                    },
                    amt: Amount {
                        instd_amt: InstructedAmount {
                            ccy: String::new(),
                            value: String::new(),
                        },
                    },
                    cdtr: Creditor {
                        nm: String::new(),
                        pstl_adr: PostalAddress {
                            ctry: String::new(),
                        },
                        ctct_dtls: ContactDetails { nm: String::new() },
                    },
                    cdtr_acct: AccountIdOthr {
                        othr: OthrId { id: String::new() },
                    },
                    rmt_inf: RemittanceInformation {
                        ustrd: String::new(),
                    },
                }],
            }],
        },
    }
}

fn main() {
    let window = SettlementWindow {
        id: 1204,
        state: "SETTLED".to_string(),
        participants: vec![
            RawParticipant {
                id: 1,
                accounts: vec![RawAccount {
                    id: 1,
                    net_settlement_amount: RawAmount {
                        amount: "100000000".to_string(),
                        currency: "USD".to_string(),
                    },
                }],
            },
            RawParticipant {
                id: 2,
                accounts: vec![RawAccount {
                    id: 2,
                    net_settlement_amount: RawAmount {
                        amount: "-65000000".to_string(),
                        currency: "USD".to_string(),
                    },
                }],
            },
            RawParticipant {
                id: 3,
                accounts: vec![RawAccount {
                    id: 3,
                    net_settlement_amount: RawAmount {
                        amount: "-35000000".to_string(),
                        currency: "USD".to_string(),
                    },
                }],
            },
        ],
    };

    let mut directory = DfspDirectory::new();
    directory.insert(
        ParticipantId::new(1),
        DfspEntry {
            name: "BR-TREASURY".to_string(),
            country: "BR".to_string(),
            account_id: "00012345".to_string(),
        },
    );
    directory.insert(
        ParticipantId::new(2),
        DfspEntry {
            name: "IN-RBI".to_string(),
            country: "IN".to_string(),
            account_id: "0098765".to_string(),
        },
    );
    directory.insert(
        ParticipantId::new(3),
        DfspEntry {
            name: "ZA-SARB".to_string(),
            country: "ZA".to_string(),
            account_id: "0055555".to_string(),
        },
    );

    let positions = validate_window(&window).expect("window should validate");
    let matrix = net(&positions).expect("positions should net to completion");

    println!("Net transfers:");
    for (payer, payee, amount) in matrix.iter() {
        println!("  {payer} -> {payee}: {amount} {}", matrix.currency());
    }

    let mut rng = CryptoRandomSource::new();
    let document = settlement_engine::iso20022::emit(&skeleton(), &matrix, &directory, window.id, &mut rng)
        .expect("directory covers every participant in the matrix");
    let xml = settlement_engine::iso20022::serialize(&document).expect("document should serialize");

    println!("\n{xml}");
}
