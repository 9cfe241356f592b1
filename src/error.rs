use thiserror::Error;

/// Errors raised by the validated Context setters and by the adapter's
/// string-to-enum parsing.
///
/// `InvalidMode`/`InvalidErrorMode` are only ever raised by the CLI adapter
/// parsing `--mode`/`--error-mode` text; the core's typed setters never
/// produce them since `Mode`/`ErrorMode` are already-validated enums by the
/// time they reach `Context`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VprecError {
    #[error("invalid value for `{field}`: {value}")]
    InvalidParameter { field: &'static str, value: i64 },

    #[error("unknown preset `{name}`")]
    UnknownPreset { name: String },

    #[error("invalid mode `{value}`")]
    InvalidMode { value: String },

    #[error("invalid error mode `{value}`")]
    InvalidErrorMode { value: String },
}
