//! FX-provider adaptor (C6): Citi pain-01 inner rate block mapping.
//!
//! Orthogonal to the settlement flow (C1–C5) — this is a separate ingress
//! path for publishing an FX rate, sharing only the hard core's discipline
//! around decimal-shaped string contracts.

use crate::error::SettlementError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A currency pair as given at the FX ingress, before any validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrencyPairInput {
    #[serde(rename = "sourceCurrency")]
    pub source_currency: String,
    #[serde(rename = "destinationCurrency")]
    pub destination_currency: String,
}

/// A rate record as given at the FX ingress.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateInput {
    pub pair: CurrencyPairInput,
    #[serde(rename = "rateDigits")]
    pub rate_digits: String,
    #[serde(rename = "decimalRate")]
    pub decimal_rate: u32,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(rename = "rateSetId")]
    pub rate_set_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitiRateBlock {
    #[serde(rename = "rateSetId")]
    pub rate_set_id: String,
    #[serde(rename = "currencyPair")]
    pub currency_pair: String,
    #[serde(rename = "baseCurrency")]
    pub base_currency: String,
    #[serde(rename = "ratePrecision")]
    pub rate_precision: String,
    #[serde(rename = "invRatePrecision")]
    pub inv_rate_precision: String,
    pub tenor: String,
    #[serde(rename = "valueDate")]
    pub value_date: String,
    #[serde(rename = "bidSpotRate")]
    pub bid_spot_rate: String,
    #[serde(rename = "offerSpotRate")]
    pub offer_spot_rate: String,
    #[serde(rename = "midPrice")]
    pub mid_price: String,
    #[serde(rename = "validUntilTime")]
    pub valid_until_time: String,
    #[serde(rename = "isValid")]
    pub is_valid: String,
    #[serde(rename = "isTradable")]
    pub is_tradable: String,
}

lazy_static::lazy_static! {
    static ref RATE_SET_ID_TABLE: HashMap<&'static str, &'static str> =
        [("USDBRL", "RS-USDBRL-01"), ("EURUSD", "RS-EURUSD-01")]
            .into_iter()
            .collect();
}

/// Inserts a decimal point `decimal_places` positions from the right of a
/// digit string. `decimal_places == 0` leaves `rate_digits` unchanged.
pub fn build_decimal_rate(rate_digits: &str, decimal_places: u32) -> Result<String, SettlementError> {
    if rate_digits.is_empty() || !rate_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SettlementError::InvalidInput {
            field: "rate_digits".to_string(),
            reason: format!("must be a non-empty digit string, got {rate_digits:?}"),
        });
    }

    if decimal_places == 0 {
        return Ok(rate_digits.to_string());
    }

    let length = rate_digits.len();
    let dp = decimal_places as usize;

    if dp >= length {
        return Ok(format!("0.{rate_digits}"));
    }

    let split = length - dp;
    Ok(format!("{}.{}", &rate_digits[..split], &rate_digits[split..]))
}

pub fn extract_source_currency(pair: &CurrencyPairInput) -> &str {
    &pair.source_currency
}

pub fn extract_destination_currency(pair: &CurrencyPairInput) -> &str {
    &pair.destination_currency
}

/// Lowercases and concatenates source + destination currency, with no
/// separator — a channel identifier, not a currency pair code.
pub fn build_custom_channel_identifier(pair: &CurrencyPairInput) -> String {
    format!(
        "{}{}",
        extract_source_currency(pair).to_lowercase(),
        extract_destination_currency(pair).to_lowercase()
    )
}

/// Maps a generic rate record into the Citi pain-01 inner FX rate block.
pub fn citi_rate_block(input: &RateInput) -> Result<CitiRateBlock, SettlementError> {
    let currency_pair = format!(
        "{}{}",
        input.pair.source_currency.to_uppercase(),
        input.pair.destination_currency.to_uppercase()
    );
    if currency_pair.len() != 6 || !currency_pair.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(SettlementError::InvalidInput {
            field: "currencyPair".to_string(),
            reason: format!("must be six letters, got {currency_pair:?}"),
        });
    }
    let base_currency = currency_pair[..3].to_string();

    let rate_set_id = match &input.rate_set_id {
        Some(id) => id.clone(),
        None => RATE_SET_ID_TABLE
            .get(currency_pair.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| SettlementError::InvalidInput {
                field: "rateSetId".to_string(),
                reason: format!("no rateSetId supplied or tabulated for {currency_pair}"),
            })?,
    };

    let bid_spot_rate = build_decimal_rate(&input.rate_digits, input.decimal_rate)?;

    let valid_until_time = input
        .end_time
        .replacen('T', " ", 1)
        .trim_end_matches('Z')
        .to_string();

    Ok(CitiRateBlock {
        rate_set_id,
        currency_pair,
        base_currency,
        rate_precision: input.decimal_rate.to_string(),
        inv_rate_precision: "1".to_string(),
        tenor: "TN".to_string(),
        value_date: "0000-00-00".to_string(),
        bid_spot_rate,
        offer_spot_rate: "0.0000".to_string(),
        mid_price: "0.0000".to_string(),
        valid_until_time,
        is_valid: "true".to_string(),
        is_tradable: "true".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s9_decimal_rate_formatting() {
        assert_eq!(build_decimal_rate("123456", 4).unwrap(), "12.3456");
        assert_eq!(build_decimal_rate("123456", 7).unwrap(), "0.123456");
        assert_eq!(build_decimal_rate("123456", 0).unwrap(), "123456");
    }

    #[test]
    fn test_decimal_rate_rejects_non_digit_input() {
        assert!(build_decimal_rate("12a456", 2).is_err());
        assert!(build_decimal_rate("", 2).is_err());
    }

    #[test]
    fn test_s10_channel_identifier() {
        let pair = CurrencyPairInput {
            source_currency: "vaRiousCase".to_string(),
            destination_currency: "ALLCAPS".to_string(),
        };
        assert_eq!(build_custom_channel_identifier(&pair), "variouscaseallcaps");
    }

    #[test]
    fn test_citi_rate_block_uses_input_rate_set_id_when_present() {
        let input = RateInput {
            pair: CurrencyPairInput {
                source_currency: "usd".to_string(),
                destination_currency: "brl".to_string(),
            },
            rate_digits: "512345".to_string(),
            decimal_rate: 4,
            end_time: "2026-07-28T23:59:59Z".to_string(),
            rate_set_id: Some("RS-EXPLICIT".to_string()),
        };
        let block = citi_rate_block(&input).unwrap();
        assert_eq!(block.rate_set_id, "RS-EXPLICIT");
        assert_eq!(block.currency_pair, "USDBRL");
        assert_eq!(block.base_currency, "USD");
        assert_eq!(block.bid_spot_rate, "51.2345");
        assert_eq!(block.valid_until_time, "2026-07-28 23:59:59");
    }

    #[test]
    fn test_citi_rate_block_falls_back_to_static_table() {
        let input = RateInput {
            pair: CurrencyPairInput {
                source_currency: "eur".to_string(),
                destination_currency: "usd".to_string(),
            },
            rate_digits: "10500".to_string(),
            decimal_rate: 4,
            end_time: "2026-07-28T10:00:00Z".to_string(),
            rate_set_id: None,
        };
        let block = citi_rate_block(&input).unwrap();
        assert_eq!(block.rate_set_id, "RS-EURUSD-01");
    }

    #[test]
    fn test_citi_rate_block_fails_with_no_rate_set_id_source() {
        let input = RateInput {
            pair: CurrencyPairInput {
                source_currency: "zzz".to_string(),
                destination_currency: "yyy".to_string(),
            },
            rate_digits: "100".to_string(),
            decimal_rate: 2,
            end_time: "2026-07-28T10:00:00Z".to_string(),
            rate_set_id: None,
        };
        assert!(matches!(
            citi_rate_block(&input),
            Err(SettlementError::InvalidInput { .. })
        ));
    }
}
