//! Per-platform period calendars.
//!
//! Each platform publishes invoices on its own cadence and only keeps a
//! window of periods downloadable. The rules map a platform name to the
//! inclusive range of period indices worth requesting this year.

use std::collections::BTreeMap;

use thiserror::Error;

/// Calendar year the standard rules cover.
pub const DEFAULT_YEAR: i32 = 2025;

/// How often a platform issues invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Twelve periods per year.
    Monthly,
    /// Six periods per year.
    Bimonthly,
}

impl Cadence {
    /// Number of periods this cadence yields per year.
    #[must_use]
    pub fn periods_per_year(self) -> u8 {
        match self {
            Self::Monthly => 12,
            Self::Bimonthly => 6,
        }
    }
}

/// One platform's downloadable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRule {
    /// Issue cadence.
    pub cadence: Cadence,
    /// First downloadable period index (1-based, inclusive).
    pub first: u8,
    /// Last downloadable period index (inclusive).
    pub last: u8,
}

/// Errors raised when resolving platform rules.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The requested platform has no matching rule. Configuration-level and
    /// fatal: there is nothing sensible to download without a calendar.
    #[error("no period rules found for platform '{platform}'; known platforms: {}", known.join(", "))]
    RulesMismatch {
        /// The unmatched platform name.
        platform: String,
        /// Platforms that do have rules.
        known: Vec<String>,
    },
}

/// Platform-to-calendar rules for one year.
#[derive(Debug, Clone)]
pub struct PeriodRules {
    year: i32,
    platforms: BTreeMap<String, PlatformRule>,
}

impl PeriodRules {
    /// Creates an empty rule set for `year`.
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self {
            year,
            platforms: BTreeMap::new(),
        }
    }

    /// The built-in rule set, updated once per year.
    ///
    /// Bimonthly platforms: a period becomes downloadable at the start of
    /// the first month of the current bimonthly period (arnona) or at the
    /// first day of the next one (meitav). Monthly platforms: partner opens
    /// the current month on its 14th; `google_workspace` on the 2nd of the
    /// next month, keeping only the last six months.
    #[must_use]
    pub fn standard() -> Self {
        let mut rules = Self::new(DEFAULT_YEAR);
        rules.insert("arnona", PlatformRule { cadence: Cadence::Bimonthly, first: 4, last: 6 });
        rules.insert("meitav", PlatformRule { cadence: Cadence::Bimonthly, first: 4, last: 6 });
        rules.insert("partner", PlatformRule { cadence: Cadence::Monthly, first: 4, last: 11 });
        rules.insert(
            "google_workspace",
            PlatformRule { cadence: Cadence::Monthly, first: 7, last: 11 },
        );
        rules
    }

    /// Adds or replaces the rule for `platform`.
    pub fn insert(&mut self, platform: impl Into<String>, rule: PlatformRule) {
        self.platforms.insert(platform.into(), rule);
    }

    /// The calendar year these rules cover.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Known platform names, sorted.
    #[must_use]
    pub fn platforms(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    /// Period labels to download for `platform`, in calendar order
    /// (`PERIOD_4`, `PERIOD_5`, ...). Ranges are inclusive on both ends.
    ///
    /// # Errors
    ///
    /// [`RulesError::RulesMismatch`] when the platform has no rule.
    pub fn periods_to_download(&self, platform: &str) -> Result<Vec<String>, RulesError> {
        let rule = self
            .platforms
            .get(platform)
            .ok_or_else(|| RulesError::RulesMismatch {
                platform: platform.to_string(),
                known: self.platforms(),
            })?;

        let last = rule.last.min(rule.cadence.periods_per_year());
        Ok((rule.first..=last).map(|i| format!("PERIOD_{i}")).collect())
    }
}

impl Default for PeriodRules {
    fn default() -> Self {
        Self::standard()
    }
}
