use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("not initialized: run 'roster init'")]
    NotInitialized,

    #[error("flight not found: {0}")]
    FlightNotFound(String),

    #[error("roster not found for flight {0}: generate it first")]
    RosterNotFound(String),

    #[error("passenger {passenger_id} not found on flight {flight_number}")]
    PassengerNotFound {
        flight_number: String,
        passenger_id: u64,
    },

    #[error("invalid flight number '{0}': expected 1-10 uppercase letters or digits")]
    InvalidFlightNumber(String),

    #[error("invalid seat code '{0}': expected a row number followed by a column letter")]
    InvalidSeat(String),

    #[error("validation failed: {}", details.join("; "))]
    Validation { details: Vec<String> },

    #[error("no seats available in {0} class")]
    SeatPoolExhausted(String),

    #[error("directory error: {0}")]
    Directory(String),

    #[error("roster store error: {0}")]
    RosterDb(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RosterError {
    /// Single-message validation failure.
    pub fn invalid(detail: impl Into<String>) -> Self {
        RosterError::Validation {
            details: vec![detail.into()],
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
