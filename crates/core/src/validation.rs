use thiserror::Error;

use crate::models::TripParams;

pub const MIN_TRIP_DAYS: u8 = 1;
pub const MAX_TRIP_DAYS: u8 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("trip length must be between 1 and 14 days, got {0}")]
    TripLengthOutOfRange(u8),
    #[error("return date {return_date} is before departure date {departure_date}")]
    ReturnBeforeDeparture {
        departure_date: String,
        return_date: String,
    },
}

/// Checks the bounds the planning form enforces. Airport codes are passed to
/// the provider as given.
pub fn validate_trip(params: &TripParams) -> Result<(), CoreError> {
    if !(MIN_TRIP_DAYS..=MAX_TRIP_DAYS).contains(&params.trip_days) {
        return Err(CoreError::TripLengthOutOfRange(params.trip_days));
    }

    if params.return_date < params.departure_date {
        return Err(CoreError::ReturnBeforeDeparture {
            departure_date: params.departure_date.to_string(),
            return_date: params.return_date.to_string(),
        });
    }

    Ok(())
}
