//! Configuration for assertion failure messages.

use crate::{error, trace_categories};

/// How much diagnostic detail to include in failure messages.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum_macros::EnumString, strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum Detail {
    /// Append the dynamic type name of each operand to equality, nil, boolean and
    /// comparability failures.
    #[default]
    Extended,
    /// Emit only the headline of each failure.
    Compact,
}

/// Settings that shape how an assertion chain reports failures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Level of detail for failure messages.
    pub detail: Detail,
}

impl Config {
    /// Name of the environment variable that selects the [`Detail`] level.
    pub const DETAIL_VAR: &'static str = "FLUENT_ASSERT_DETAIL";

    /// Loads configuration from the process environment. Unset or blank variables leave the
    /// corresponding default in place.
    pub fn from_env() -> Result<Self, error::Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration using the given lookup function in place of the process
    /// environment.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the raw value of the named setting, if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, error::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::DETAIL_VAR) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                config.detail =
                    trimmed
                        .parse()
                        .map_err(|source| error::Error::InvalidSetting {
                            name: Self::DETAIL_VAR,
                            value: value.clone(),
                            source,
                        })?;
            }
        }

        tracing::debug!(target: trace_categories::CONFIG, "loaded assertion config: {config:?}");

        Ok(config)
    }

    /// Returns a copy of this configuration with the given detail level.
    #[must_use]
    pub const fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = detail;
        self
    }

    /// Returns whether failure messages should name the dynamic types of their operands.
    pub const fn includes_type_names(&self) -> bool {
        matches!(self.detail, Detail::Extended)
    }
}
