// Booking submission: validate locally, create remotely, then mirror the
// new reservation into the cached venue so the caller sees it without a
// re-fetch. Validation failures never reach the network.

use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tracing::info;

use crate::availability::{self, BookingProposal};
use crate::client::{encode_segment, to_body, ApiRequest, RestClient};
use crate::error::{ApiError, ValidationError};
use crate::model::{Booking, CreateBookingBody, Customer, Venue};
use crate::session::SessionStore;
use crate::venues::VenueCache;

/// Failure channel for a submission attempt. `Invalid` is raised before
/// any network call; `Remote` carries the API outcome, including 401 for
/// unauthorized and cancellation (which callers swallow).
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] ApiError),
}

pub struct BookingFlow {
    client: RestClient,
    session: Arc<SessionStore>,
    cache: Arc<VenueCache>,
}

impl BookingFlow {
    pub fn new(client: RestClient, session: Arc<SessionStore>, cache: Arc<VenueCache>) -> Self {
        Self {
            client,
            session,
            cache,
        }
    }

    /// Validates the proposal against the venue's known reservations and
    /// the session identity, creates the booking, and optimistically
    /// appends it to the cached venue. The cache entry stays advisory; the
    /// next authoritative venue fetch overwrites it.
    pub async fn submit(
        &self,
        venue: &Venue,
        proposal: BookingProposal,
    ) -> Result<Booking, SubmitError> {
        let user = self.session.user();
        let requester = user.as_ref().map(|u| u.name.as_str());
        let (date_from, date_to) =
            availability::check(&proposal, venue, requester, Local::now().date_naive())?;

        let token = self.session.token().ok_or(ApiError::Unauthenticated)?;
        let body = CreateBookingBody {
            date_from,
            date_to,
            guests: proposal.guests,
            venue_id: venue.id.clone(),
        };
        let mut booking: Booking = self
            .client
            .send(ApiRequest::post("/holidaze/bookings", to_body(&body)?).with_token(token))
            .await
            .map_err(SubmitError::Remote)?;

        // The create response may omit the creator; enrich from the locally
        // known identity so availability display stays accurate.
        if booking.customer.is_none() {
            if let Some(user) = user {
                booking.customer = Some(Customer {
                    name: user.name,
                    email: user.email,
                    avatar: user.avatar,
                    banner: None,
                    bio: None,
                });
            }
        }

        self.cache.append_booking(&venue.id, booking.clone());
        info!(venue = %venue.id, booking = %booking.id, "booking created");
        Ok(booking)
    }

    /// All bookings made by a profile, each with its venue inlined.
    pub async fn bookings_for_profile(&self, name: &str) -> Result<Vec<Booking>, ApiError> {
        let token = self.session.token().ok_or(ApiError::Unauthenticated)?;
        let path = format!("/holidaze/profiles/{}/bookings", encode_segment(name));
        self.client
            .send(
                ApiRequest::get(&path)
                    .with_query(vec![("_venue".to_string(), "true".to_string())])
                    .with_token(token),
            )
            .await
    }

    /// Cancels an existing reservation.
    pub async fn cancel(&self, booking_id: &str) -> Result<(), ApiError> {
        let token = self.session.token().ok_or(ApiError::Unauthenticated)?;
        let path = format!("/holidaze/bookings/{}", encode_segment(booking_id));
        self.client
            .send_empty(ApiRequest::delete(&path).with_token(token))
            .await?;
        info!(booking = %booking_id, "booking cancelled");
        Ok(())
    }
}
