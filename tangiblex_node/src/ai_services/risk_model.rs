use serde::{Deserialize, Deserializer, Serialize};

const SECONDS_PER_MONTH: f64 = 30.0 * 24.0 * 60.0 * 60.0;

/// Factor weights in tenths: asset type, maturity, value, issuer.
const WEIGHTS_TENTHS: [u32; 4] = [3, 2, 3, 2];

const DEFAULT_BASE_YIELD: f64 = 5.0;
const UNKNOWN_ASSET_TYPE_RISK: u32 = 50;
const ISSUER_RISK: u32 = 30;

/// Asset attributes accepted by the scorer.
///
/// Numbers may arrive as JSON numbers or decimal strings. Anything else, or
/// a missing field, is treated as "unknown" and scored permissively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetData {
    #[serde(default, deserialize_with = "lenient_number")]
    pub asset_type: Option<f64>,
    /// Unix seconds
    #[serde(default, deserialize_with = "lenient_number")]
    pub maturity_date: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_value: Option<f64>,
    /// Any non-string issuer is kept as unknown
    #[serde(default, deserialize_with = "lenient_text")]
    pub issuer: Option<String>,
    /// Percent; falls back to 5.0 when missing or zero
    #[serde(default, deserialize_with = "lenient_number")]
    pub expected_yield: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConditions {
    #[serde(default, deserialize_with = "lenient_number")]
    pub interest_rate: Option<f64>,
}

/// Per-factor risk, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub asset_type: u32,
    pub maturity: u32,
    pub value: u32,
    pub issuer: u32,
}

impl RiskFactors {
    /// Weighted sum rounded half-up, computed in exact tenths.
    pub fn weighted_score(&self) -> u8 {
        let factors = [self.asset_type, self.maturity, self.value, self.issuer];
        let tenths: u32 = factors
            .iter()
            .zip(WEIGHTS_TENTHS.iter())
            .map(|(factor, weight)| factor * weight)
            .sum();
        ((tenths + 5) / 10).min(100) as u8
    }
}

/// Deterministic risk and yield scorer
#[derive(Debug, Clone, Default)]
pub struct RiskYieldModel;

impl RiskYieldModel {
    pub fn new() -> Self {
        Self
    }

    pub fn risk_factors_at(&self, asset: &AssetData, now_secs: i64) -> RiskFactors {
        RiskFactors {
            asset_type: asset_type_risk(asset.asset_type),
            maturity: maturity_risk(asset.maturity_date, now_secs),
            value: value_risk(asset.total_value),
            issuer: issuer_risk(asset.issuer.as_deref()),
        }
    }

    pub fn calculate_risk_score_at(&self, asset: &AssetData, now_secs: i64) -> u8 {
        self.risk_factors_at(asset, now_secs).weighted_score()
    }

    pub fn calculate_risk_score(&self, asset: &AssetData) -> u8 {
        self.calculate_risk_score_at(asset, chrono::Utc::now().timestamp())
    }

    /// Predicted annual yield in percent, formatted with two decimals.
    pub fn predict_yield_at(
        &self,
        asset: &AssetData,
        market: &MarketConditions,
        now_secs: i64,
    ) -> String {
        let base = asset
            .expected_yield
            .filter(|y| *y != 0.0)
            .unwrap_or(DEFAULT_BASE_YIELD);
        let risk_premium = f64::from(self.calculate_risk_score_at(asset, now_secs)) / 20.0;
        let market_adjustment = market.interest_rate.unwrap_or(0.0);

        format!("{:.2}", base + risk_premium + market_adjustment)
    }

    pub fn predict_yield(&self, asset: &AssetData, market: &MarketConditions) -> String {
        self.predict_yield_at(asset, market, chrono::Utc::now().timestamp())
    }
}

fn asset_type_risk(asset_type: Option<f64>) -> u32 {
    match asset_type {
        Some(t) if t == 0.0 => 30, // RealEstate
        Some(t) if t == 1.0 => 50, // Invoice
        Some(t) if t == 2.0 => 25, // Bond
        Some(t) if t == 3.0 => 60, // Loan
        Some(t) if t == 4.0 => 40, // Other
        _ => UNKNOWN_ASSET_TYPE_RISK,
    }
}

// Unknown maturity compares false against every bucket and lands in the last one.
fn maturity_risk(maturity_date: Option<f64>, now_secs: i64) -> u32 {
    let Some(maturity) = maturity_date else {
        return 20;
    };
    let months = (maturity - now_secs as f64) / SECONDS_PER_MONTH;
    if months < 3.0 {
        60
    } else if months < 12.0 {
        40
    } else if months < 36.0 {
        30
    } else {
        20
    }
}

fn value_risk(total_value: Option<f64>) -> u32 {
    match total_value {
        Some(v) if v < 100_000.0 => 50,
        Some(v) if v < 1_000_000.0 => 30,
        _ => 20,
    }
}

// No issuer credit model yet; every issuer gets the same placeholder score.
fn issuer_risk(_issuer: Option<&str>) -> u32 {
    ISSUER_RISK
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NOW: i64 = 1_750_000_000;
    const DAY: f64 = 86_400.0;

    fn asset(asset_type: f64, value: f64, maturity_days: f64) -> AssetData {
        AssetData {
            asset_type: Some(asset_type),
            maturity_date: Some(NOW as f64 + maturity_days * DAY),
            total_value: Some(value),
            issuer: Some("0x0000000000000000000000000000000000000000".to_string()),
            expected_yield: None,
        }
    }

    #[test]
    fn test_bond_long_maturity_large_value() {
        let model = RiskYieldModel::new();
        let bond = asset(2.0, 2_000_000.0, 4.0 * 365.0);
        let factors = model.risk_factors_at(&bond, NOW);
        assert_eq!(
            factors,
            RiskFactors { asset_type: 25, maturity: 20, value: 20, issuer: 30 }
        );
        // 7.5 + 4 + 6 + 6 = 23.5
        assert_eq!(model.calculate_risk_score_at(&bond, NOW), 24);
    }

    #[test]
    fn test_bond_four_hundred_days_lands_in_thirty_six_month_bucket() {
        let model = RiskYieldModel::new();
        let bond = asset(2.0, 2_000_000.0, 400.0);
        assert_eq!(model.risk_factors_at(&bond, NOW).maturity, 30);
        assert_eq!(model.calculate_risk_score_at(&bond, NOW), 26);
    }

    #[test]
    fn test_asset_type_table() {
        let expected = [(0.0, 30), (1.0, 50), (2.0, 25), (3.0, 60), (4.0, 40)];
        for (code, risk) in expected {
            assert_eq!(asset_type_risk(Some(code)), risk, "type {code}");
        }
        assert_eq!(asset_type_risk(Some(7.0)), 50);
        assert_eq!(asset_type_risk(Some(2.5)), 50);
        assert_eq!(asset_type_risk(None), 50);
    }

    #[test]
    fn test_maturity_buckets() {
        let month = SECONDS_PER_MONTH;
        let at = |months: f64| Some(NOW as f64 + months * month);
        assert_eq!(maturity_risk(at(-1.0), NOW), 60);
        assert_eq!(maturity_risk(at(2.9), NOW), 60);
        assert_eq!(maturity_risk(at(3.0), NOW), 40);
        assert_eq!(maturity_risk(at(11.9), NOW), 40);
        assert_eq!(maturity_risk(at(12.0), NOW), 30);
        assert_eq!(maturity_risk(at(35.9), NOW), 30);
        assert_eq!(maturity_risk(at(36.0), NOW), 20);
    }

    #[test]
    fn test_value_buckets() {
        assert_eq!(value_risk(Some(99_999.0)), 50);
        assert_eq!(value_risk(Some(100_000.0)), 30);
        assert_eq!(value_risk(Some(999_999.0)), 30);
        assert_eq!(value_risk(Some(1_000_000.0)), 20);
    }

    #[test]
    fn test_missing_fields_are_scored_permissively() {
        let model = RiskYieldModel::new();
        let empty = AssetData::default();
        let factors = model.risk_factors_at(&empty, NOW);
        assert_eq!(
            factors,
            RiskFactors { asset_type: 50, maturity: 20, value: 20, issuer: 30 }
        );
        // 15 + 4 + 6 + 6
        assert_eq!(model.calculate_risk_score_at(&empty, NOW), 31);
    }

    #[test]
    fn test_lenient_json_inputs() {
        let data: AssetData = serde_json::from_value(serde_json::json!({
            "assetType": "3",
            "totalValue": "250000",
            "maturityDate": NOW + 100 * 86_400,
            "issuer": "0xabc",
            "expectedYield": true
        }))
        .unwrap();
        assert_eq!(data.asset_type, Some(3.0));
        assert_eq!(data.total_value, Some(250_000.0));
        assert_eq!(data.expected_yield, None);
        assert_eq!(data.issuer.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_non_string_issuer_is_unknown() {
        for issuer in [serde_json::json!(0), serde_json::json!({"name": "Acme"}), serde_json::json!([1, 2])] {
            let data: AssetData = serde_json::from_value(serde_json::json!({
                "assetType": 2,
                "issuer": issuer
            }))
            .unwrap();
            assert_eq!(data.issuer, None);
            assert_eq!(RiskYieldModel::new().risk_factors_at(&data, NOW).issuer, 30);
        }
    }

    #[test]
    fn test_predict_yield_defaults() {
        let model = RiskYieldModel::new();
        let bond = asset(2.0, 2_000_000.0, 4.0 * 365.0);
        // 5.0 + 24/20
        assert_eq!(model.predict_yield_at(&bond, &MarketConditions::default(), NOW), "6.20");
    }

    #[test]
    fn test_predict_yield_with_base_and_market() {
        let model = RiskYieldModel::new();
        let mut bond = asset(2.0, 2_000_000.0, 4.0 * 365.0);
        bond.expected_yield = Some(7.25);
        let market = MarketConditions { interest_rate: Some(0.5) };
        assert_eq!(model.predict_yield_at(&bond, &market, NOW), "8.95");
    }

    #[test]
    fn test_zero_expected_yield_uses_default_base() {
        let model = RiskYieldModel::new();
        let mut bond = asset(2.0, 2_000_000.0, 4.0 * 365.0);
        bond.expected_yield = Some(0.0);
        assert_eq!(model.predict_yield_at(&bond, &MarketConditions::default(), NOW), "6.20");
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded_and_deterministic(
            asset_type in proptest::option::of(-2.0f64..8.0),
            maturity in proptest::option::of(-1.0e9f64..1.0e10),
            value in proptest::option::of(-1.0e7f64..1.0e12),
        ) {
            let model = RiskYieldModel::new();
            let data = AssetData {
                asset_type,
                maturity_date: maturity,
                total_value: value,
                issuer: None,
                expected_yield: None,
            };
            let first = model.calculate_risk_score_at(&data, NOW);
            let second = model.calculate_risk_score_at(&data, NOW);
            prop_assert_eq!(first, second);
            prop_assert!(first <= 100);
        }

        #[test]
        fn prop_predicted_yield_has_two_decimals(
            base in proptest::option::of(-100.0f64..100.0),
            rate in proptest::option::of(-50.0f64..50.0),
            asset_type in 0u8..5,
        ) {
            let model = RiskYieldModel::new();
            let data = AssetData {
                asset_type: Some(f64::from(asset_type)),
                expected_yield: base,
                ..AssetData::default()
            };
            let market = MarketConditions { interest_rate: rate };
            let out = model.predict_yield_at(&data, &market, NOW);
            let (_, decimals) = out.split_once('.').expect("decimal point");
            prop_assert_eq!(decimals.len(), 2);
            prop_assert!(out.parse::<f64>().is_ok());
        }
    }
}
