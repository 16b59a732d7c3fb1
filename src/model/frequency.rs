use chrono::{Month, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{parse_month, parse_weekday, weekday_from_index, weekday_name};

// ─── Frequency spec ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl IntervalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Hours  => "hours",
            IntervalUnit::Days   => "days",
            IntervalUnit::Weeks  => "weeks",
            IntervalUnit::Months => "months",
            IntervalUnit::Years  => "years",
        }
    }

    /// Largest accepted `every` for this unit; a thousand years of steps.
    pub fn max_every(&self) -> u32 {
        match self {
            IntervalUnit::Hours  => 24 * 366 * 1000,
            IntervalUnit::Days   => 366 * 1000,
            IntervalUnit::Weeks  => 53 * 1000,
            IntervalUnit::Months => 12 * 1000,
            IntervalUnit::Years  => 1000,
        }
    }
}

/// How a task recurs. `DaysOfWeek` and `DayOfMonth` keep the caller's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FrequencyWire", into = "FrequencyWire")]
pub enum FrequencySpec {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Interval { every: u32, unit: IntervalUnit },
    DaysOfWeek { days: Vec<Weekday> },
    DayOfMonth { months: Vec<Month> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrequencyError {
    #[error("repeat interval must be at least 1")]
    ZeroInterval,
    #[error("repeat interval is limited to {max} {unit}")]
    IntervalTooLarge { max: u32, unit: &'static str },
    #[error("interval frequency needs a unit")]
    MissingUnit,
    #[error("select at least one day of the week")]
    EmptyDays,
    #[error("select at least one month")]
    EmptyMonths,
    #[error("unknown weekday {0:?}")]
    UnknownWeekday(String),
    #[error("unknown month {0:?}")]
    UnknownMonth(String),
    #[error("unknown frequency type {0:?}")]
    UnknownType(String),
}

impl FrequencyError {
    /// Form field the error belongs to, in the API's naming.
    pub fn field(&self) -> &'static str {
        match self {
            FrequencyError::ZeroInterval
            | FrequencyError::IntervalTooLarge { .. } => "frequency",
            FrequencyError::MissingUnit       => "frequencyMetadata.unit",
            FrequencyError::EmptyDays
            | FrequencyError::UnknownWeekday(_) => "frequencyMetadata.days",
            FrequencyError::EmptyMonths
            | FrequencyError::UnknownMonth(_) => "frequencyMetadata.months",
            FrequencyError::UnknownType(_)    => "frequencyType",
        }
    }
}

impl FrequencySpec {
    pub fn interval(every: u32, unit: IntervalUnit) -> Result<Self, FrequencyError> {
        let spec = FrequencySpec::Interval { every, unit };
        spec.validate()?;
        Ok(spec)
    }

    pub fn days_of_week(days: Vec<Weekday>) -> Result<Self, FrequencyError> {
        let spec = FrequencySpec::DaysOfWeek { days };
        spec.validate()?;
        Ok(spec)
    }

    /// Sunday-based indices, 0 = Sunday .. 6 = Saturday.
    pub fn days_of_week_from_indices(indices: &[u8]) -> Result<Self, FrequencyError> {
        let days = indices
            .iter()
            .map(|&i| weekday_from_index(i).ok_or_else(|| FrequencyError::UnknownWeekday(i.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::days_of_week(days)
    }

    pub fn day_of_month(months: Vec<Month>) -> Result<Self, FrequencyError> {
        let spec = FrequencySpec::DayOfMonth { months };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), FrequencyError> {
        match self {
            FrequencySpec::Interval { every: 0, .. }            => Err(FrequencyError::ZeroInterval),
            FrequencySpec::Interval { every, unit } if *every > unit.max_every() => {
                Err(FrequencyError::IntervalTooLarge { max: unit.max_every(), unit: unit.as_str() })
            }
            FrequencySpec::DaysOfWeek { days } if days.is_empty() => Err(FrequencyError::EmptyDays),
            FrequencySpec::DayOfMonth { months } if months.is_empty() => Err(FrequencyError::EmptyMonths),
            _ => Ok(()),
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, FrequencySpec::Once)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FrequencySpec::Once              => "once",
            FrequencySpec::Daily             => "daily",
            FrequencySpec::Weekly            => "weekly",
            FrequencySpec::Monthly           => "monthly",
            FrequencySpec::Yearly            => "yearly",
            FrequencySpec::Interval { .. }   => "interval",
            FrequencySpec::DaysOfWeek { .. } => "days_of_the_week",
            FrequencySpec::DayOfMonth { .. } => "day_of_the_month",
        }
    }
}

// ─── Wire shape ───────────────────────────────────────────────────────────────

/// The API's flat representation: `frequencyType`, `frequency`, `frequencyMetadata`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyWire {
    pub frequency_type: String,
    #[serde(default)]
    pub frequency: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_metadata: Option<FrequencyMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<IntervalUnit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub months: Vec<String>,
}

impl TryFrom<FrequencyWire> for FrequencySpec {
    type Error = FrequencyError;

    fn try_from(wire: FrequencyWire) -> Result<Self, Self::Error> {
        let meta = wire.frequency_metadata.unwrap_or_default();
        match wire.frequency_type.as_str() {
            "once" | "no_repeat" => Ok(FrequencySpec::Once),
            "daily"   => Ok(FrequencySpec::Daily),
            "weekly"  => Ok(FrequencySpec::Weekly),
            "monthly" => Ok(FrequencySpec::Monthly),
            "yearly"  => Ok(FrequencySpec::Yearly),
            "interval" => {
                let unit = meta.unit.ok_or(FrequencyError::MissingUnit)?;
                FrequencySpec::interval(wire.frequency, unit)
            }
            "days_of_the_week" => {
                let days = meta.days.iter()
                    .map(|d| parse_weekday(d).ok_or_else(|| FrequencyError::UnknownWeekday(d.clone())))
                    .collect::<Result<Vec<_>, _>>()?;
                FrequencySpec::days_of_week(days)
            }
            "day_of_the_month" => {
                let months = meta.months.iter()
                    .map(|m| parse_month(m).ok_or_else(|| FrequencyError::UnknownMonth(m.clone())))
                    .collect::<Result<Vec<_>, _>>()?;
                FrequencySpec::day_of_month(months)
            }
            other => Err(FrequencyError::UnknownType(other.to_owned())),
        }
    }
}

impl From<FrequencySpec> for FrequencyWire {
    fn from(spec: FrequencySpec) -> Self {
        let type_name = spec.type_name().to_owned();
        let (frequency, frequency_metadata) = match spec {
            FrequencySpec::Interval { every, unit } => (every, Some(FrequencyMetadata {
                unit: Some(unit), ..Default::default()
            })),
            FrequencySpec::DaysOfWeek { days } => (1, Some(FrequencyMetadata {
                days: days.into_iter().map(|d| weekday_name(d).to_owned()).collect(),
                ..Default::default()
            })),
            FrequencySpec::DayOfMonth { months } => (1, Some(FrequencyMetadata {
                months: months.into_iter().map(|m| m.name().to_lowercase()).collect(),
                ..Default::default()
            })),
            _ => (1, None),
        };
        FrequencyWire { frequency_type: type_name, frequency, frequency_metadata }
    }
}
