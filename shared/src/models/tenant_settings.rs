//! Tenant Settings Model

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax configuration; `rate` is a percentage (11 means 11%)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rate: Decimal,
    /// Menu prices already include the tax
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Service charge configuration; `rate` is a percentage of the subtotal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChargeConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rate: Decimal,
}

/// Opening window for one weekday, times as "HH:MM"
///
/// A close time earlier than the open time runs past midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub day: Weekday,
    pub open: String,
    pub close: String,
    #[serde(default)]
    pub closed: bool,
}

impl OperatingHours {
    fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.closed {
            return None;
        }
        let open = NaiveTime::parse_from_str(&self.open, "%H:%M").ok()?;
        let close = NaiveTime::parse_from_str(&self.close, "%H:%M").ok()?;
        Some((open, close))
    }

    /// Whether `time` on this entry's own day falls inside the window
    fn covers_same_day(&self, time: NaiveTime) -> bool {
        match self.window() {
            Some((open, close)) if open == close => true,
            Some((open, close)) if open < close => time >= open && time < close,
            Some((open, _)) => time >= open,
            None => false,
        }
    }

    /// Whether `time` on the following day is still inside an overnight window
    fn covers_next_day(&self, time: NaiveTime) -> bool {
        match self.window() {
            Some((open, close)) if close < open => time < close,
            _ => false,
        }
    }
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

/// Tenant configuration shared read-only for a session (stored under `tenant_settings`)
///
/// `Default` is the value consumers see before the store has been read:
/// USD with a `$` symbol, no tax, no service charge, no operating hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub tax: TaxConfig,
    #[serde(default)]
    pub service_charge: ServiceChargeConfig,
    #[serde(default)]
    pub operating_hours: Vec<OperatingHours>,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            tax: TaxConfig::default(),
            service_charge: ServiceChargeConfig::default(),
            operating_hours: Vec::new(),
        }
    }
}

impl TenantSettings {
    /// Digits after the decimal point for the configured currency
    pub fn minor_units(&self) -> u32 {
        match self.currency_code.to_ascii_uppercase().as_str() {
            "IDR" | "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" => 0,
            "BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
            _ => 2,
        }
    }

    /// Whether the restaurant is open at a local date-time
    ///
    /// An empty schedule means no restriction. Entries that fail to parse
    /// are ignored.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        if self.operating_hours.is_empty() {
            return true;
        }

        let day = at.weekday();
        let time = at.time();
        let previous = day.pred();

        self.operating_hours.iter().any(|hours| {
            (hours.day == day && hours.covers_same_day(time))
                || (hours.day == previous && hours.covers_next_day(time))
        })
    }
}
