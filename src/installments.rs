use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::CalcError;
use crate::models::Installment;

const CENTS: u32 = 2;

/// Split `total` into `count` monthly installments starting on `start`.
///
/// Every installment but the last is `total / count` rounded to the cent;
/// the last absorbs whatever remains so the amounts sum to `total` exactly.
/// Due dates step by calendar month from `start`, clamped to month end.
pub fn generate_schedule(
    total: Decimal,
    count: u32,
    start: NaiveDate,
) -> Result<Vec<Installment>, CalcError> {
    if count == 0 {
        return Err(CalcError::InvalidSchedule(
            "installment count must be positive".to_string(),
        ));
    }
    if total <= Decimal::ZERO {
        return Err(CalcError::InvalidSchedule(format!(
            "total amount must be positive, got {total}"
        )));
    }
    if total.normalize().scale() > CENTS {
        return Err(CalcError::InvalidSchedule(format!(
            "total amount {total} has fractional cents"
        )));
    }

    let mut base = (total / Decimal::from(count))
        .round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero);
    let mut last = total - base * Decimal::from(count - 1);
    if last <= Decimal::ZERO {
        return Err(CalcError::InvalidSchedule(format!(
            "{total} is too small to split into {count} installments"
        )));
    }
    base.rescale(CENTS);
    last.rescale(CENTS);

    if last != base {
        debug!(%base, %last, count, "final installment absorbs rounding remainder");
    }

    (0..count)
        .map(|offset| -> Result<Installment, CalcError> {
            let due_date = start.checked_add_months(Months::new(offset)).ok_or_else(|| {
                CalcError::InvalidSchedule(format!(
                    "due date {offset} months after {start} is out of range"
                ))
            })?;
            let amount = if offset + 1 == count { last } else { base };
            Ok(Installment {
                number: offset + 1,
                amount,
                due_date,
            })
        })
        .collect()
}

pub fn schedule_total(installments: &[Installment]) -> Decimal {
    installments.iter().map(|i| i.amount).sum()
}
