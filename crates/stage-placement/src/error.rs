use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::internship::OfferImportError;
use std::fmt;

/// Startup and wiring failures for the binaries built on this crate.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    OfferImport(OfferImportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::OfferImport(err) => write!(f, "offer import error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::OfferImport(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<OfferImportError> for AppError {
    fn from(value: OfferImportError) -> Self {
        Self::OfferImport(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn offer_import_failures_keep_their_source() {
        let error = AppError::from(OfferImportError::DuplicateOffer(4));
        assert!(error.to_string().starts_with("offer import error"));
        let source = error.source().expect("wrapped error");
        assert_eq!(source.to_string(), OfferImportError::DuplicateOffer(4).to_string());
    }

    #[test]
    fn io_failures_are_reported_as_io() {
        let error = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(matches!(error, AppError::Io(_)));
        assert_eq!(error.to_string(), "io error: disk");
    }
}
