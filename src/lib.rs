// Client-side core for a vacation-rental marketplace: venue retrieval and
// filtering, booking validation and submission, and session lifecycle over
// a third-party REST API. Views are external collaborators; all durable
// state lives server-side.

pub mod availability;
pub mod bookings;
pub mod client;
pub mod error;
pub mod filter;
pub mod model;
pub mod query;
pub mod session;
pub mod venues;

// Re-export key types for convenience
pub use availability::BookingProposal;
pub use bookings::{BookingFlow, SubmitError};
pub use client::{ApiRequest, ClientConfig, FlightSlot, RestClient, Transport};
pub use error::{ApiError, ValidationError};
pub use filter::FilterCriteria;
pub use model::{AuthUser, Booking, Profile, Venue};
pub use query::{PageDisposition, RetrievalMode, SortKey, SortOrder, VenueQuery};
pub use session::{FileVault, MemoryVault, SessionStore, SessionVault};
pub use venues::{VenueBrowser, VenueCache, VenueSource};
