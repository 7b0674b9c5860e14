//! Bill breakdown for the guest cart and bill views
//!
//! Order: subtotal -> service charge (percent of subtotal) -> tax (percent of
//! subtotal + service charge). Inclusive tax is already inside the menu
//! prices, so it is reported but not added to the total.

use crate::format::round_money;
use rust_decimal::prelude::*;
use serde::Serialize;
use shared::models::TenantSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillBreakdown {
    pub subtotal: Decimal,
    pub service_charge: Decimal,
    pub tax: Decimal,
    /// Whether `tax` is contained in `subtotal + service_charge`
    pub tax_inclusive: bool,
    pub total: Decimal,
}

impl BillBreakdown {
    /// Each line is rounded to the currency's minor units before summing
    pub fn compute(subtotal: Decimal, settings: &TenantSettings) -> Self {
        let units = settings.minor_units();
        let hundred = Decimal::ONE_HUNDRED;
        let subtotal = round_money(subtotal.max(Decimal::ZERO), units);

        // Negative rates count as zero
        let service_rate = settings.service_charge.rate.max(Decimal::ZERO);
        let tax_rate = settings.tax.rate.max(Decimal::ZERO);

        let service_charge = if settings.service_charge.enabled {
            round_money(subtotal * service_rate / hundred, units)
        } else {
            Decimal::ZERO
        };

        let taxable = subtotal + service_charge;
        let tax_config = &settings.tax;
        let tax = match (tax_config.enabled, tax_config.inclusive) {
            (false, _) => Decimal::ZERO,
            (true, false) => round_money(taxable * tax_rate / hundred, units),
            (true, true) => {
                let net = taxable / (Decimal::ONE + tax_rate / hundred);
                round_money(taxable - net, units)
            }
        };

        let total = if tax_config.inclusive {
            taxable
        } else {
            taxable + tax
        };

        Self {
            subtotal,
            service_charge,
            tax,
            tax_inclusive: tax_config.enabled && tax_config.inclusive,
            total,
        }
    }
}
