use crate::settings::Settings;

use anyhow::{anyhow, Result};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum GroupBy {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "Group by Voucher")]
    Voucher,
    #[serde(rename = "Group by Account")]
    Account,
    #[serde(rename = "Group by Party")]
    Party,
}

/// Filters of the Lebanese General Ledger report. The report engine gets
/// them as JSON; nothing here runs a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneralLedgerFilters {
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_book: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    party_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    party: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    party_name: Option<String>,
    #[serde(default)]
    pub group_by: GroupBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    pub show_in_lbp: bool,
    pub show_foreign_currency: bool,
    pub include_dimensions: bool,
    pub show_cancelled_entries: bool,
    pub include_default_book_entries: bool,
}

impl GeneralLedgerFilters {
    /// Last month up to `today`, everything else at its default.
    pub fn new(company: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            company: company.into(),
            finance_book: None,
            from_date: today.checked_sub_months(Months::new(1)).unwrap_or(today),
            to_date: today,
            account: None,
            voucher_no: None,
            project: None,
            party_type: None,
            party: Vec::new(),
            party_name: None,
            group_by: GroupBy::None,
            cost_center: None,
            show_in_lbp: true,
            show_foreign_currency: true,
            include_dimensions: true,
            show_cancelled_entries: false,
            include_default_book_entries: true,
        }
    }

    pub fn from_settings(settings: &Settings, today: NaiveDate) -> Result<Self> {
        let company = settings
            .default_company
            .as_ref()
            .ok_or(anyhow!("no company given and no `default_company' option set"))?;
        Ok(Self::new(company.as_str(), today))
    }

    pub fn party_type(&self) -> Option<&str> {
        self.party_type.as_deref()
    }

    pub fn party(&self) -> &[String] {
        &self.party
    }

    pub fn party_name(&self) -> Option<&str> {
        self.party_name.as_deref()
    }

    /// Changing the party type invalidates any selected party.
    pub fn set_party_type(&mut self, party_type: Option<String>) {
        self.party_type = party_type.filter(|p| !p.is_empty());
        self.party.clear();
        self.party_name = None;
    }

    /// Selects parties. The display name is only resolved for a single
    /// party of a known type, through `lookup(party_type, party)`.
    pub fn set_party<F>(&mut self, parties: Vec<String>, lookup: F)
    where
        F: FnOnce(&str, &str) -> Option<String>,
    {
        self.party = parties;
        self.party_name = match (self.party_type.as_deref(), self.party.as_slice()) {
            (Some(party_type), [party]) => lookup(party_type, party),
            _ => None,
        };
    }

    pub fn validate(&self) -> Result<()> {
        if self.company.trim().is_empty() {
            return Err(anyhow!("filter `company' is mandatory"));
        }
        if self.from_date > self.to_date {
            return Err(anyhow!(format!(
                "from date {} must not be after to date {}",
                self.from_date, self.to_date
            )));
        }
        if !self.party.is_empty() && self.party_type.is_none() {
            return Err(anyhow!("select a party type before selecting parties"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tone {
    Red,
    Green,
}

/// Debits are shown red and credits green, in every currency column.
pub fn row_tone(column: &str, value: f64) -> Option<Tone> {
    if value <= 0.0 {
        return None;
    }

    match column {
        "debit" | "debit_lbp" | "debit_fc" => Some(Tone::Red),
        "credit" | "credit_lbp" | "credit_fc" => Some(Tone::Green),
        _ => None,
    }
}
