// src/services/lead_lifecycle.rs

//! Regra de conversão de leads.
//!
//! Um lead só pode ficar `converted` com um valor de venda positivo, e
//! `converted_at` é carimbado na primeira conversão. Fora isso os status
//! são livres: não existe ordem obrigatória entre eles.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{common::error::AppError, models::lead::LeadStatus};

pub const DEAL_AMOUNT_REQUIRED: &str = "deal amount required for converted lead";
pub const DEAL_AMOUNT_NEGATIVE: &str = "deal amount must not be negative";

/// Valida a combinação status/valor e devolve o `converted_at` a gravar.
///
/// * `converted` exige `deal_amount > 0`; mantém o carimbo existente ou usa `now`.
/// * qualquer outro status devolve `existing_converted_at` intacto (nunca limpa).
pub fn check_transition(
    status: LeadStatus,
    deal_amount: Option<Decimal>,
    existing_converted_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    check_deal_amount(deal_amount)?;

    if status != LeadStatus::Converted {
        return Ok(existing_converted_at);
    }

    match deal_amount {
        Some(amount) if as_stored(amount) > Decimal::ZERO => Ok(Some(existing_converted_at.unwrap_or(now))),
        _ => Err(AppError::BadRequest(DEAL_AMOUNT_REQUIRED.to_string())),
    }
}

/// Decide o `converted_at` de uma atualização completa (PUT).
///
/// A regra de conversão só roda quando o patch traz `status` ou `deal_amount`;
/// sem nenhum dos dois o carimbo salvo fica como está.
pub fn plan_update(
    current_status: LeadStatus,
    current_converted_at: Option<DateTime<Utc>>,
    status: Option<LeadStatus>,
    deal_amount: Option<Decimal>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    check_deal_amount(deal_amount)?;
    if status.is_none() && deal_amount.is_none() {
        return Ok(current_converted_at);
    }
    check_transition(status.unwrap_or(current_status), deal_amount, current_converted_at, now)
}

/// O que uma troca de status (PATCH) grava.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: LeadStatus,
    /// Só preenchido na conversão; `None` mantém o valor salvo.
    pub deal_amount: Option<Decimal>,
    pub converted_at: Option<DateTime<Utc>>,
}

pub fn plan_status_change(
    status: LeadStatus,
    deal_amount: Option<Decimal>,
    current_converted_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<StatusChange, AppError> {
    let converted_at = check_transition(status, deal_amount, current_converted_at, now)?;
    let deal_amount = match status {
        LeadStatus::Converted => deal_amount,
        _ => None,
    };
    Ok(StatusChange { status, deal_amount, converted_at })
}

// A coluna é NUMERIC(14, 2): o banco arredonda para centavos (metade para longe do zero)
fn as_stored(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Valor de venda nunca pode ser negativo, em qualquer escrita.
pub fn check_deal_amount(deal_amount: Option<Decimal>) -> Result<(), AppError> {
    match deal_amount {
        Some(amount) if amount < Decimal::ZERO => Err(AppError::BadRequest(DEAL_AMOUNT_NEGATIVE.to_string())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn is_bad_request(result: Result<Option<DateTime<Utc>>, AppError>, expected: &str) -> bool {
        matches!(result, Err(AppError::BadRequest(ref m)) if m == expected)
    }

    #[test]
    fn converting_without_amount_fails() {
        let now = Utc::now();
        assert!(is_bad_request(
            check_transition(LeadStatus::Converted, None, None, now),
            DEAL_AMOUNT_REQUIRED
        ));
        assert!(is_bad_request(
            check_transition(LeadStatus::Converted, Some(Decimal::ZERO), None, now),
            DEAL_AMOUNT_REQUIRED
        ));
    }

    #[test]
    fn amount_that_rounds_to_zero_cents_cannot_convert() {
        let now = Utc::now();
        assert!(is_bad_request(
            check_transition(LeadStatus::Converted, Some(Decimal::new(1, 3)), None, now),
            DEAL_AMOUNT_REQUIRED
        ));
        assert!(is_bad_request(
            check_transition(LeadStatus::Converted, Some(Decimal::new(4, 3)), None, now),
            DEAL_AMOUNT_REQUIRED
        ));
        // 0.005 vira 0.01 no banco
        assert_eq!(
            check_transition(LeadStatus::Converted, Some(Decimal::new(5, 3)), None, now).unwrap(),
            Some(now)
        );
    }

    #[test]
    fn negative_amount_is_rejected_for_every_status() {
        let now = Utc::now();
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Converted,
            LeadStatus::Lost,
        ] {
            assert!(is_bad_request(
                check_transition(status, Some(Decimal::from(-1)), None, now),
                DEAL_AMOUNT_NEGATIVE
            ));
        }
    }

    #[test]
    fn first_conversion_stamps_now() {
        let now = Utc::now();
        let stamped = check_transition(LeadStatus::Converted, Some(Decimal::from(500)), None, now).unwrap();
        assert_eq!(stamped, Some(now));
    }

    #[test]
    fn repeated_conversion_keeps_original_stamp() {
        let first = Utc::now() - Duration::days(3);
        let now = Utc::now();
        let stamped = check_transition(LeadStatus::Converted, Some(Decimal::from(750)), Some(first), now).unwrap();
        assert_eq!(stamped, Some(first));
    }

    #[test]
    fn other_statuses_never_need_amount_nor_clear_stamp() {
        let first = Utc::now() - Duration::hours(5);
        let now = Utc::now();
        for status in [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Qualified, LeadStatus::Lost] {
            assert_eq!(check_transition(status, None, Some(first), now).unwrap(), Some(first));
            assert_eq!(check_transition(status, None, None, now).unwrap(), None);
        }
    }

    #[test]
    fn put_without_status_or_amount_keeps_stamp() {
        let first = Utc::now() - Duration::days(10);
        let now = Utc::now();
        let stamped = plan_update(LeadStatus::Converted, Some(first), None, None, now).unwrap();
        assert_eq!(stamped, Some(first));

        let never = plan_update(LeadStatus::Qualified, None, None, None, now).unwrap();
        assert_eq!(never, None);
    }

    #[test]
    fn put_with_only_amount_uses_current_status() {
        let now = Utc::now();
        // lead já convertido sem carimbo recebe um valor: carimba agora
        assert_eq!(
            plan_update(LeadStatus::Converted, None, None, Some(Decimal::from(900)), now).unwrap(),
            Some(now)
        );
        // lead convertido recebendo valor zero é recusado
        assert!(is_bad_request(
            plan_update(LeadStatus::Converted, Some(now), None, Some(Decimal::ZERO), now),
            DEAL_AMOUNT_REQUIRED
        ));
    }

    #[test]
    fn put_converting_without_amount_is_rejected() {
        let now = Utc::now();
        assert!(is_bad_request(
            plan_update(LeadStatus::Qualified, None, Some(LeadStatus::Converted), None, now),
            DEAL_AMOUNT_REQUIRED
        ));
        assert!(is_bad_request(
            plan_update(LeadStatus::New, None, None, Some(Decimal::from(-5)), now),
            DEAL_AMOUNT_NEGATIVE
        ));
    }

    #[test]
    fn status_patch_outside_conversion_does_not_write_amount() {
        let first = Utc::now() - Duration::days(1);
        let now = Utc::now();
        let change = plan_status_change(LeadStatus::Lost, Some(Decimal::from(300)), Some(first), now).unwrap();

        assert_eq!(
            change,
            StatusChange { status: LeadStatus::Lost, deal_amount: None, converted_at: Some(first) }
        );
    }

    #[test]
    fn status_patch_to_converted_writes_amount_and_stamp() {
        let now = Utc::now();
        let change = plan_status_change(LeadStatus::Converted, Some(Decimal::from(300)), None, now).unwrap();

        assert_eq!(change.deal_amount, Some(Decimal::from(300)));
        assert_eq!(change.converted_at, Some(now));
    }

    #[test]
    fn rejected_status_patch_produces_nothing_to_write() {
        let now = Utc::now();
        let result = plan_status_change(LeadStatus::Converted, None, None, now);
        assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m == DEAL_AMOUNT_REQUIRED));
    }

    #[test]
    fn statuses_can_go_backwards() {
        let now = Utc::now();
        // converted -> new é permitido; o carimbo fica
        assert_eq!(
            check_transition(LeadStatus::New, Some(Decimal::ZERO), Some(now), now).unwrap(),
            Some(now)
        );
    }
}
