//! Raw customer attributes as captured by the form.
//!
//! Field names follow the training dataset's column headers so a CSV export
//! of customers deserializes straight into [`RawInput`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{ChurnError, Result};

pub const CREDIT_SCORE_RANGE: RangeInclusive<u32> = 300..=900;
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
pub const TENURE_RANGE: RangeInclusive<u32> = 0..=10;
pub const NUM_OF_PRODUCTS_RANGE: RangeInclusive<u32> = 1..=4;
pub const BALANCE_RANGE: RangeInclusive<f64> = 0.0..=300_000.0;
pub const ESTIMATED_SALARY_RANGE: RangeInclusive<f64> = 0.0..=200_000.0;

/// Customer country. The set is closed: anything else is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Geography {
    France,
    Germany,
    Spain,
}

impl Geography {
    pub const ALL: [Geography; 3] = [Geography::France, Geography::Germany, Geography::Spain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Geography::France => "France",
            Geography::Germany => "Germany",
            Geography::Spain => "Spain",
        }
    }

    /// Name of the one-hot indicator column for this country.
    pub fn feature_name(&self) -> &'static str {
        match self {
            Geography::France => crate::features::GEOGRAPHY_FRANCE,
            Geography::Germany => crate::features::GEOGRAPHY_GERMANY,
            Geography::Spain => crate::features::GEOGRAPHY_SPAIN,
        }
    }
}

impl fmt::Display for Geography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Geography {
    type Err = ChurnError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim();
        Geography::ALL
            .into_iter()
            .find(|geo| geo.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| {
                ChurnError::invalid_category(
                    "Geography",
                    s,
                    Geography::ALL.iter().map(Geography::as_str),
                )
            })
    }
}

impl TryFrom<String> for Geography {
    type Error = ChurnError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A Yes/No answer from the form, encoded as 1/0.
///
/// The dataset stores these flags as `1`/`0`, so those are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    pub fn flag(&self) -> f64 {
        match self {
            YesNo::Yes => 1.0,
            YesNo::No => 0.0,
        }
    }

    fn parse_field(field: &str, value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "YES" | "Y" | "1" => Ok(YesNo::Yes),
            "NO" | "N" | "0" => Ok(YesNo::No),
            _ => Err(ChurnError::invalid_category(field, value, ["Yes", "No"])),
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = ChurnError;

    fn from_str(s: &str) -> Result<Self> {
        YesNo::parse_field("Yes/No", s)
    }
}

impl TryFrom<String> for YesNo {
    type Error = ChurnError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// One customer record as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInput {
    pub credit_score: u32,
    pub age: u32,
    pub tenure: u32,
    pub balance: f64,
    pub num_of_products: u32,
    pub has_cr_card: YesNo,
    pub is_active_member: YesNo,
    pub estimated_salary: f64,
    /// Free label; checked against the fitted encoder's classes at encode time.
    pub gender: String,
    pub geography: Geography,
}

impl Default for RawInput {
    /// The values the form starts with.
    fn default() -> Self {
        Self {
            credit_score: 600,
            age: 40,
            tenure: 3,
            balance: 60_000.0,
            num_of_products: 1,
            has_cr_card: YesNo::Yes,
            is_active_member: YesNo::Yes,
            estimated_salary: 50_000.0,
            gender: "Female".to_string(),
            geography: Geography::France,
        }
    }
}

impl RawInput {
    /// Check every numeric field against the range the form allows.
    ///
    /// Categorical fields are not checked here: geography is closed by its
    /// type and gender is checked against the encoder.
    pub fn validate(&self) -> Result<()> {
        check_int("CreditScore", self.credit_score, &CREDIT_SCORE_RANGE)?;
        check_int("Age", self.age, &AGE_RANGE)?;
        check_int("Tenure", self.tenure, &TENURE_RANGE)?;
        check_float("Balance", self.balance, &BALANCE_RANGE)?;
        check_int("NumOfProducts", self.num_of_products, &NUM_OF_PRODUCTS_RANGE)?;
        check_float("EstimatedSalary", self.estimated_salary, &ESTIMATED_SALARY_RANGE)?;
        Ok(())
    }

    pub fn parse_has_cr_card(value: &str) -> Result<YesNo> {
        YesNo::parse_field("HasCrCard", value)
    }

    pub fn parse_is_active_member(value: &str) -> Result<YesNo> {
        YesNo::parse_field("IsActiveMember", value)
    }
}

fn check_int(field: &str, value: u32, range: &RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ChurnError::OutOfRange {
        field: field.to_string(),
        value: f64::from(value),
        min: f64::from(*range.start()),
        max: f64::from(*range.end()),
    })
}

fn check_float(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    // NaN fails `contains`, so non-finite input is rejected here too.
    if value.is_finite() && range.contains(&value) {
        return Ok(());
    }
    Err(ChurnError::OutOfRange {
        field: field.to_string(),
        value,
        min: *range.start(),
        max: *range.end(),
    })
}
