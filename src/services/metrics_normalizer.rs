// src/services/metrics_normalizer.rs

//! Adaptação das respostas das APIs de anúncios para `NewAnalyticsRecord`.
//!
//! O formato dessas APIs muda sem aviso, então tudo aqui é "best effort":
//! campo ausente ou ilegível vira zero, nunca erro.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};
use serde_json::Value;

use crate::models::analytics::{MetaAdsCampaign, MetaAdsMetrics, NewAnalyticsRecord};

/// Como extrair conversões da lista `actions`.
#[derive(Debug, Clone, Copy)]
pub enum ConversionRule {
    /// Valor da primeira ação cujo `action_type` está na lista.
    FirstMatch(&'static [&'static str]),
    /// Soma dos valores de todas as ações cujo tipo está na lista.
    Sum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct SourceProfile {
    pub source: &'static str,
    pub conversions: ConversionRule,
    /// Linha vem como campanha com `insights.data[0]` aninhado.
    pub nested_insights: bool,
    /// Campos candidatos para o id da campanha na plataforma.
    pub campaign_id_fields: &'static [&'static str],
    pub date_field: Option<&'static str>,
}

pub const FACEBOOK: SourceProfile = SourceProfile {
    source: "facebook",
    conversions: ConversionRule::FirstMatch(&["offsite_conversion"]),
    nested_insights: false,
    campaign_id_fields: &[],
    date_field: Some("date_start"),
};

pub const META: SourceProfile = SourceProfile {
    source: "meta",
    conversions: ConversionRule::FirstMatch(&["purchase", "offsite_conversion"]),
    nested_insights: true,
    campaign_id_fields: &["id", "campaign_id"],
    date_field: None,
};

pub const META_ADS: SourceProfile = SourceProfile {
    source: "meta_ads",
    conversions: ConversionRule::Sum(&["offsite_conversion"]),
    nested_insights: false,
    campaign_id_fields: &["campaign_id"],
    date_field: Some("date_start"),
};

// ---
// Coerção numérica (mesma leniência de um parseInt/parseFloat)
// ---

/// Inteiro a partir de número ou texto. "120" -> 120, "12.9" -> 12, "" -> 0.
pub fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// Decimal a partir de número ou texto. "45.50" -> 45.50, lixo -> 0.
pub fn coerce_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => {
            let s = s.trim();
            Decimal::from_str(s)
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(Decimal::from_f64))
                .unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

pub fn coerce_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

fn is_action(action: &Value, types: &[&str]) -> bool {
    action
        .get("action_type")
        .and_then(Value::as_str)
        .is_some_and(|kind| types.iter().any(|t| *t == kind))
}

pub fn extract_conversions(actions: Option<&Value>, rule: ConversionRule) -> i64 {
    let Some(actions) = actions.and_then(Value::as_array) else {
        return 0;
    };

    match rule {
        ConversionRule::FirstMatch(types) => actions
            .iter()
            .find(|a| is_action(a, types))
            .map_or(0, |a| coerce_int(a.get("value"))),
        ConversionRule::Sum(types) => actions
            .iter()
            .filter(|a| is_action(a, types))
            .map(|a| coerce_int(a.get("value")))
            .sum(),
    }
}

fn parse_day(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(value?.as_str()?, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normaliza uma linha. `campaign_override` vence o id encontrado na linha.
pub fn normalize_row(
    row: &Value,
    profile: &SourceProfile,
    campaign_override: Option<&str>,
    now: DateTime<Utc>,
) -> NewAnalyticsRecord {
    let insights = if profile.nested_insights {
        row.pointer("/insights/data/0").unwrap_or(row)
    } else {
        row
    };

    let external_campaign_id = campaign_override.map(str::to_owned).or_else(|| {
        profile
            .campaign_id_fields
            .iter()
            .find_map(|field| text(row.get(*field)))
    });

    let date = profile
        .date_field
        .and_then(|field| parse_day(insights.get(field)))
        .unwrap_or(now);

    NewAnalyticsRecord {
        campaign_id: None,
        external_campaign_id,
        source: profile.source.to_string(),
        clicks: coerce_int(insights.get("clicks")),
        impressions: coerce_int(insights.get("impressions")),
        cost: coerce_decimal(insights.get("spend")),
        conversions: extract_conversions(insights.get("actions"), profile.conversions),
        reach: coerce_int(insights.get("reach")),
        frequency: coerce_f64(insights.get("frequency")),
        cpc: coerce_decimal(insights.get("cpc")),
        cpm: coerce_decimal(insights.get("cpm")),
        date,
    }
}

pub fn normalize_rows(
    rows: &[Value],
    profile: &SourceProfile,
    campaign_override: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<NewAnalyticsRecord> {
    rows.iter()
        .map(|row| normalize_row(row, profile, campaign_override, now))
        .collect()
}

/// Linhas do relatório do Google Analytics: sessions -> clicks, activeUsers -> impressions.
pub fn normalize_google_rows(rows: &[Value], campaign: Option<&str>, now: DateTime<Utc>) -> Vec<NewAnalyticsRecord> {
    rows.iter()
        .map(|row| NewAnalyticsRecord {
            external_campaign_id: campaign.map(str::to_owned),
            source: "google".to_string(),
            clicks: coerce_int(row.pointer("/metricValues/0/value")),
            impressions: coerce_int(row.pointer("/metricValues/1/value")),
            date: now,
            ..Default::default()
        })
        .collect()
}

// ---
// Resumos para as rotas /meta-ads
// ---

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Métricas de conta: totais e derivados (cpc, cpm, taxa de conversão).
pub fn summarize_account_insights(row: Option<&Value>) -> MetaAdsMetrics {
    let empty = Value::Null;
    let row = row.unwrap_or(&empty);

    let clicks = coerce_int(row.get("clicks"));
    let impressions = coerce_int(row.get("impressions"));
    let spend = coerce_decimal(row.get("spend"));
    let conversions = extract_conversions(row.get("actions"), META_ADS.conversions);

    // Divisão por zero ou estouro do Decimal dá zero
    let per = |numerator: Decimal, denominator: i64, scale: i64| {
        if denominator <= 0 {
            return Decimal::ZERO;
        }
        numerator
            .checked_div(Decimal::from(denominator))
            .and_then(|ratio| ratio.checked_mul(Decimal::from(scale)))
            .map(round2)
            .unwrap_or(Decimal::ZERO)
    };

    MetaAdsMetrics {
        total_clicks: clicks,
        total_impressions: impressions,
        total_spend: spend,
        total_conversions: conversions,
        cpc: per(spend, clicks, 1),
        cpm: per(spend, impressions, 1000),
        conversion_rate: per(Decimal::from(conversions), clicks, 100),
    }
}

pub fn campaign_performance(rows: &[Value]) -> Vec<MetaAdsCampaign> {
    rows.iter()
        .map(|c| MetaAdsCampaign {
            id: text(c.get("id")),
            name: text(c.get("name")),
            status: text(c.get("status")),
            effective_status: text(c.get("effective_status")),
            spend: coerce_decimal(c.get("spend")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_strings_like_the_ad_apis_send_them() {
        let row = json!({ "clicks": "120", "impressions": "", "spend": "45.50" });
        let record = normalize_row(&row, &FACEBOOK, Some("238"), Utc::now());

        assert_eq!(record.clicks, 120);
        assert_eq!(record.impressions, 0);
        assert_eq!(record.cost, Decimal::from_str("45.5").unwrap());
        assert_eq!(record.conversions, 0);
        assert_eq!(record.source, "facebook");
        assert_eq!(record.external_campaign_id.as_deref(), Some("238"));
    }

    #[test]
    fn integer_coercion_is_lenient() {
        assert_eq!(coerce_int(Some(&json!("12.9"))), 12);
        assert_eq!(coerce_int(Some(&json!("42abc"))), 42);
        assert_eq!(coerce_int(Some(&json!(" -7 "))), -7);
        assert_eq!(coerce_int(Some(&json!(3.99))), 3);
        assert_eq!(coerce_int(Some(&json!("abc"))), 0);
        assert_eq!(coerce_int(Some(&json!(null))), 0);
        assert_eq!(coerce_int(Some(&json!({ "nested": 1 }))), 0);
        assert_eq!(coerce_int(None), 0);
    }

    #[test]
    fn decimal_coercion_is_lenient() {
        assert_eq!(coerce_decimal(Some(&json!(" 1.25 "))), Decimal::from_str("1.25").unwrap());
        assert_eq!(coerce_decimal(Some(&json!(7))), Decimal::from(7));
        assert_eq!(coerce_decimal(Some(&json!("n/a"))), Decimal::ZERO);
        assert_eq!(coerce_decimal(Some(&json!(true))), Decimal::ZERO);
        assert_eq!(coerce_f64(Some(&json!("1.8"))), 1.8);
        assert_eq!(coerce_f64(Some(&json!([]))), 0.0);
    }

    #[test]
    fn first_match_takes_the_first_listed_action() {
        let actions = json!([
            { "action_type": "link_click", "value": "90" },
            { "action_type": "offsite_conversion", "value": "4" },
            { "action_type": "purchase", "value": "2" }
        ]);
        assert_eq!(extract_conversions(Some(&actions), META.conversions), 4);
        assert_eq!(extract_conversions(Some(&actions), FACEBOOK.conversions), 4);
    }

    #[test]
    fn sum_adds_every_matching_action() {
        let actions = json!([
            { "action_type": "offsite_conversion", "value": "4" },
            { "action_type": "offsite_conversion", "value": 3 },
            { "action_type": "purchase", "value": "2" }
        ]);
        assert_eq!(extract_conversions(Some(&actions), META_ADS.conversions), 7);
        assert_eq!(extract_conversions(Some(&json!("not a list")), META_ADS.conversions), 0);
        assert_eq!(extract_conversions(None, META_ADS.conversions), 0);
    }

    #[test]
    fn meta_rows_unwrap_nested_insights() {
        let now = Utc::now();
        let row = json!({
            "id": "120210",
            "campaign_name": "Pompage",
            "insights": { "data": [{
                "clicks": "33", "impressions": "1000", "spend": "12.40",
                "reach": "800", "frequency": "1.25", "cpc": "0.37", "cpm": "12.4",
                "actions": [{ "action_type": "purchase", "value": "1" }]
            }]}
        });

        let record = normalize_row(&row, &META, None, now);
        assert_eq!(record.external_campaign_id.as_deref(), Some("120210"));
        assert_eq!(record.clicks, 33);
        assert_eq!(record.impressions, 1000);
        assert_eq!(record.reach, 800);
        assert_eq!(record.frequency, 1.25);
        assert_eq!(record.conversions, 1);
        assert_eq!(record.cpm, Decimal::from_str("12.4").unwrap());
        assert_eq!(record.date, now);
    }

    #[test]
    fn meta_rows_without_insights_use_the_row_itself() {
        let row = json!({ "id": "9", "clicks": 5 });
        let record = normalize_row(&row, &META, None, Utc::now());
        assert_eq!(record.clicks, 5);
        assert_eq!(record.source, "meta");
    }

    #[test]
    fn date_start_is_used_when_present() {
        let now = Utc::now();
        let with_date = normalize_row(&json!({ "date_start": "2026-02-01" }), &FACEBOOK, None, now);
        let bad_date = normalize_row(&json!({ "date_start": "yesterday" }), &FACEBOOK, None, now);

        assert_eq!(with_date.date.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(bad_date.date, now);
    }

    #[test]
    fn google_rows_map_sessions_and_users() {
        let rows = vec![json!({
            "dimensionValues": [{ "value": "printemps" }],
            "metricValues": [{ "value": "321" }, { "value": "120" }]
        })];
        let records = normalize_google_rows(&rows, Some("c1"), Utc::now());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].clicks, 321);
        assert_eq!(records[0].impressions, 120);
        assert_eq!(records[0].cost, Decimal::ZERO);
        assert_eq!(records[0].source, "google");
    }

    #[test]
    fn account_metrics_derive_rates() {
        let row = json!({
            "clicks": "200", "impressions": "10000", "spend": "50",
            "actions": [{ "action_type": "offsite_conversion", "value": "5" }]
        });
        let metrics = summarize_account_insights(Some(&row));

        assert_eq!(metrics.cpc, Decimal::from_str("0.25").unwrap());
        assert_eq!(metrics.cpm, Decimal::from(5));
        assert_eq!(metrics.conversion_rate, Decimal::from_str("2.5").unwrap());
    }

    #[test]
    fn account_metrics_without_data_are_zero() {
        let metrics = summarize_account_insights(None);
        assert_eq!(metrics.total_clicks, 0);
        assert_eq!(metrics.cpc, Decimal::ZERO);
        assert_eq!(metrics.conversion_rate, Decimal::ZERO);
    }

    #[test]
    fn huge_spend_does_not_overflow_the_rates() {
        let row = json!({ "clicks": "0", "impressions": "1", "spend": "79228162514264337593543950335" });
        let metrics = summarize_account_insights(Some(&row));

        assert_eq!(metrics.total_spend, Decimal::MAX);
        assert_eq!(metrics.cpm, Decimal::ZERO);
        assert_eq!(metrics.cpc, Decimal::ZERO);
    }

    #[test]
    fn campaign_list_is_mapped() {
        let rows = vec![json!({ "id": "1", "name": "A", "status": "ACTIVE", "effective_status": "ACTIVE", "spend": "3.5" })];
        let campaigns = campaign_performance(&rows);
        assert_eq!(campaigns[0].name.as_deref(), Some("A"));
        assert_eq!(campaigns[0].spend, Decimal::from_str("3.5").unwrap());
    }
}
