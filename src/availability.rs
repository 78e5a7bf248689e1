// Availability checker: validates a proposed booking against a venue's
// known reservation intervals and business rules, synchronously at
// submit time. The first failing rule wins.

use chrono::{Local, NaiveDate};

use crate::error::ValidationError;
use crate::model::Venue;

/// A booking as entered in the form; dates may still be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingProposal {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub guests: u32,
}

/// Runs the validation rules in order and returns the normalized
/// [check-in, check-out) interval on success.
///
/// `requester` is the signed-in customer name, or `None` when anonymous.
/// `today` is passed explicitly so callers and tests share one clock.
pub fn check(
    proposal: &BookingProposal,
    venue: &Venue,
    requester: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let (Some(from), Some(to)) = (proposal.date_from, proposal.date_to) else {
        return Err(ValidationError::MissingDates);
    };
    if from < today {
        return Err(ValidationError::PastCheckIn);
    }
    if from >= to {
        return Err(ValidationError::CheckOutNotAfterCheckIn);
    }
    if proposal.guests < 1 {
        return Err(ValidationError::NoGuests);
    }
    if proposal.guests > venue.max_guests {
        return Err(ValidationError::TooManyGuests {
            max_guests: venue.max_guests,
        });
    }
    let Some(name) = requester else {
        return Err(ValidationError::NotSignedIn);
    };

    // Duplicate guard: same requester, exact same day range. Deliberately
    // not an interval-overlap check; overlapping ranges are arbitrated by
    // the server.
    let duplicate = venue.bookings.iter().any(|booking| {
        booking
            .customer
            .as_ref()
            .is_some_and(|customer| customer.name == name)
            && booking.check_in_day() == from
            && booking.check_out_day() == to
    });
    if duplicate {
        return Err(ValidationError::DuplicateBooking);
    }

    Ok((from, to))
}

/// Convenience wrapper using the local calendar date.
pub fn check_now(
    proposal: &BookingProposal,
    venue: &Venue,
    requester: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    check(proposal, venue, requester, Local::now().date_naive())
}
