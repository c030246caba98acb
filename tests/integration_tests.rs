use rust_decimal_macros::dec;
use settlement_engine::core::currency::CurrencyCode;
use settlement_engine::core::party::{AccountId, ParticipantId};
use settlement_engine::core::position::{
    DfspDirectory, DfspEntry, RawAccount, RawAmount, RawParticipant, SettlementWindow,
};
use settlement_engine::error::SettlementError;
use settlement_engine::fx::{build_decimal_rate, build_custom_channel_identifier, CurrencyPairInput};
use settlement_engine::iso20022::pain001::{
    Amount, CreditTransferTransactionInformation, CustomerCreditTransferInitiation, Debtor,
    DebtorAccount, AccountIdOthr, ContactDetails, Creditor, GroupHeader, InstructedAmount, OrgId,
    OthrId, PartyId as PainPartyId, PaymentDocument, PaymentIdentification, PaymentInformation,
    PostalAddress, RemittanceInformation, PAIN001_NAMESPACE,
};
use settlement_engine::netting::net;
use settlement_engine::rng::DeterministicRandomSource;
use settlement_engine::validation::validate_window;

fn window(entries: &[(u64, &str)], currency: &str) -> SettlementWindow {
    SettlementWindow {
        id: 42,
        state: "SETTLED".to_string(),
        participants: entries
            .iter()
            .map(|(id, amount)| RawParticipant {
                id: *id,
                accounts: vec![RawAccount {
                    id: *id,
                    net_settlement_amount: RawAmount {
                        amount: amount.to_string(),
                        currency: currency.to_string(),
                    },
                }],
            })
            .collect(),
    }
}

fn net_window(entries: &[(u64, &str)]) -> Vec<(u64, u64, rust_decimal::Decimal)> {
    let w = window(entries, "USD");
    let positions = validate_window(&w).unwrap();
    let matrix = net(&positions).unwrap();
    matrix
        .iter()
        .map(|(payer, payee, amount)| (payer.value(), payee.value(), amount))
        .collect()
}

#[test]
fn s1_two_party() {
    let cells = net_window(&[(1, "10.00"), (2, "-10.00")]);
    assert_eq!(cells, vec![(1, 2, dec!(10.00))]);
}

#[test]
fn s2_reverse_order_same_result() {
    let cells = net_window(&[(1, "-10.00"), (2, "10.00")]);
    assert_eq!(cells, vec![(2, 1, dec!(10.00))]);
}

#[test]
fn s3_classic_three_party_floating_point_trap() {
    let cells = net_window(&[(1, "0.1"), (2, "0.2"), (3, "-0.3")]);
    assert_eq!(cells, vec![(1, 3, dec!(0.1)), (2, 3, dec!(0.2))]);
}

#[test]
fn s4_split_debtor_across_two_creditors() {
    let cells = net_window(&[(1, "-3"), (2, "-7"), (3, "10")]);
    assert_eq!(cells, vec![(3, 1, dec!(3)), (3, 2, dec!(7))]);
}

#[test]
fn s5_partial_debtor_coverage_conserves() {
    let w = window(&[(1, "-4"), (2, "-4"), (3, "3"), (4, "5")], "USD");
    let positions = validate_window(&w).unwrap();
    let matrix = net(&positions).unwrap();
    assert_eq!(matrix.transaction_count(), 3);
    assert_eq!(matrix.control_sum(), dec!(8));
}

#[test]
fn s6_invalid_precision() {
    let w = window(&[(1, "0.001"), (2, "-0.001")], "USD");
    assert!(matches!(
        validate_window(&w),
        Err(SettlementError::InvalidPrecision { .. })
    ));
}

#[test]
fn s7_non_zero_sum() {
    let w = window(&[(1, "1.00"), (2, "-2.00")], "USD");
    assert_eq!(
        validate_window(&w),
        Err(SettlementError::NonZeroSum { sum: dec!(-1.00) })
    );
}

fn pain001_skeleton() -> PaymentDocument {
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
                    id: PainPartyId {
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

#[test]
fn s8_emitter_unknown_participant() {
    let w = window(&[(1, "10.00"), (2, "-10.00")], "USD");
    let positions = validate_window(&w).unwrap();
    let matrix = net(&positions).unwrap();

    let mut directory = DfspDirectory::new();
    directory.insert(
        ParticipantId::new(1),
        DfspEntry {
            name: "BR-TREASURY".to_string(),
            country: "BR".to_string(),
            account_id: "00012345".to_string(),
        },
    );
    // Payee 2 is deliberately missing from the directory.

    let mut rng = DeterministicRandomSource::seeded(1);
    let result = settlement_engine::iso20022::emit(
        &pain001_skeleton(),
        &matrix,
        &directory,
        w.id,
        &mut rng,
    );
    assert_eq!(
        result,
        Err(SettlementError::UnknownParticipant {
            participant_id: ParticipantId::new(2)
        })
    );
}

#[test]
fn s9_decimal_rate() {
    assert_eq!(build_decimal_rate("123456", 4).unwrap(), "12.3456");
    assert_eq!(build_decimal_rate("123456", 7).unwrap(), "0.123456");
    assert_eq!(build_decimal_rate("123456", 0).unwrap(), "123456");
}

#[test]
fn s10_channel_identifier() {
    let pair = CurrencyPairInput {
        source_currency: "vaRiousCase".to_string(),
        destination_currency: "ALLCAPS".to_string(),
    };
    assert_eq!(build_custom_channel_identifier(&pair), "variouscaseallcaps");
}

#[test]
fn full_pipeline_emits_matching_currency_payment_file() {
    let w = window(&[(1, "10.00"), (2, "-6.00"), (3, "-4.00")], "USD");
    let positions = validate_window(&w).unwrap();
    let matrix = net(&positions).unwrap();
    assert_eq!(matrix.currency(), &CurrencyCode::new("USD").unwrap());

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

    let mut rng = DeterministicRandomSource::seeded(7);
    let document =
        settlement_engine::iso20022::emit(&pain001_skeleton(), &matrix, &directory, w.id, &mut rng)
            .unwrap();
    let xml = settlement_engine::iso20022::serialize(&document).unwrap();
    assert!(xml.contains(PAIN001_NAMESPACE));
    assert!(xml.contains("Settlement Window 42"));
    assert_eq!(
        AccountId::new(12345).value(),
        document
            .customer_credit_transfer_initiation
            .payment_information[0]
            .dbtr_acct
            .id
            .othr
            .id
            .parse::<u64>()
            .unwrap()
    );
}
