//! Error facilities

/// Error raised while loading assertion configuration.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A configuration setting held a value that could not be parsed.
    #[error("invalid value for {name}: '{value}'")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// The rejected value, as provided.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: strum::ParseError,
    },
}
