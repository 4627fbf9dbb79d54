//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use csv::Error as CsvError;
use reqwest::Error as HttpError;
use riskscreen_common::auth::AuthError;
use riskscreen_domain::ScreeningError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ScreeningError);

impl From<InfraError> for ScreeningError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ScreeningError> for InfraError {
    fn from(value: ScreeningError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoScreeningError {
    fn into_screening(self) -> ScreeningError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ScreeningError */
/* -------------------------------------------------------------------------- */

impl IntoScreeningError for HttpError {
    fn into_screening(self) -> ScreeningError {
        if self.is_timeout() {
            return ScreeningError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ScreeningError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return ScreeningError::RemoteApi {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        if self.is_decode() {
            return ScreeningError::MalformedResponse(self.to_string());
        }

        ScreeningError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_screening())
    }
}

/* -------------------------------------------------------------------------- */
/* AuthError → ScreeningError */
/* -------------------------------------------------------------------------- */

impl IntoScreeningError for AuthError {
    fn into_screening(self) -> ScreeningError {
        ScreeningError::Auth(self.to_string())
    }
}

impl From<AuthError> for InfraError {
    fn from(value: AuthError) -> Self {
        InfraError(value.into_screening())
    }
}

/* -------------------------------------------------------------------------- */
/* Filesystem and CSV errors → ScreeningError */
/* -------------------------------------------------------------------------- */

impl IntoScreeningError for IoError {
    fn into_screening(self) -> ScreeningError {
        ScreeningError::Transfer(format!("{} ({:?})", self, self.kind()))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_screening())
    }
}

impl IntoScreeningError for CsvError {
    fn into_screening(self) -> ScreeningError {
        if self.is_io_error() {
            return ScreeningError::Transfer(format!("failed to write report: {self}"));
        }
        ScreeningError::Internal(format!("CSV encoding failed: {self}"))
    }
}

impl From<CsvError> for InfraError {
    fn from(value: CsvError) -> Self {
        InfraError(value.into_screening())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
