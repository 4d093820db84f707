//! Remote firmware-update provider

use thiserror_no_std::Error;

use crate::errors::FatalCondition;

/// Failure classes reported by the update transport
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateError {
    /// Uploader failed authentication
    #[error("authentication failed")]
    Auth,
    /// Update could not be started
    #[error("could not begin update")]
    Begin,
    /// Uploader could not be reached
    #[error("could not connect to uploader")]
    Connect,
    /// Transfer stopped part way
    #[error("transfer interrupted")]
    Receive,
    /// Image could not be committed
    #[error("could not finalise update")]
    End,
    /// Any other failure
    #[error("unclassified update failure")]
    Other,
}

impl From<UpdateError> for FatalCondition {
    fn from(error: UpdateError) -> Self {
        match error {
            UpdateError::Auth => FatalCondition::UpdateAuthFailure,
            UpdateError::Begin => FatalCondition::UpdateBeginFailure,
            UpdateError::Connect => FatalCondition::UpdateConnectFailure,
            UpdateError::Receive => FatalCondition::UpdateReceiveFailure,
            UpdateError::End => FatalCondition::UpdateEndFailure,
            UpdateError::Other => FatalCondition::UpdateOtherFailure,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for UpdateError {
    fn format(&self, fmt: defmt::Formatter) {
        let name = match self {
            Self::Auth => "auth",
            Self::Begin => "begin",
            Self::Connect => "connect",
            Self::Receive => "receive",
            Self::End => "end",
            Self::Other => "other",
        };
        defmt::write!(fmt, "update error: {}", name)
    }
}

/// Over-the-air update listener
///
/// Errors surface as the return value of [`poll`](UpdateProvider::poll) rather
/// than through a callback, so they flow through the same tick as everything
/// else.
pub trait UpdateProvider {
    /// Set listening port, advertised host name and optional password
    fn configure(&mut self, port: u16, host_name: &str, password: Option<&str>);

    /// Start listening (calling it again is harmless)
    fn activate(&mut self);

    /// Service the listener once
    fn poll(&mut self) -> Result<(), UpdateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_maps_to_its_own_condition() {
        let errors = [
            UpdateError::Auth,
            UpdateError::Begin,
            UpdateError::Connect,
            UpdateError::Receive,
            UpdateError::End,
            UpdateError::Other,
        ];
        let codes: Vec<u8> = errors
            .iter()
            .map(|&e| FatalCondition::from(e).code())
            .collect();
        assert_eq!(codes, vec![3, 4, 5, 6, 7, 8]);
        assert!(errors.iter().all(|&e| FatalCondition::from(e).is_update_failure()));
    }
}
