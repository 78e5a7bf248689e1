// Venue retrieval: the two-mode source over the REST client, an advisory
// in-memory cache, and a browser that accumulates listing pages while
// guaranteeing that superseded in-flight loads never surface.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{Abortable, Aborted};
use parking_lot::Mutex;
use tracing::debug;

use crate::client::{encode_segment, to_body, ApiRequest, FlightSlot, RestClient};
use crate::error::ApiError;
use crate::model::{Booking, CreateVenueBody, Venue};
use crate::query::{PageDisposition, RetrievalMode, SortKey, SortOrder, VenueQuery};

/// Advisory cache of venue records keyed by id. Entries are overwritten by
/// every authoritative fetch; the booking flow appends optimistically and
/// the next fetch reconciles.
#[derive(Default)]
pub struct VenueCache {
    entries: DashMap<String, Venue>,
}

impl VenueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Venue> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    pub fn put(&self, venue: Venue) {
        self.entries.insert(venue.id.clone(), venue);
    }

    /// Optimistic insert of a freshly created booking into the cached
    /// venue's reservation list. Returns false when the venue is not cached.
    pub fn append_booking(&self, venue_id: &str, booking: Booking) -> bool {
        match self.entries.get_mut(venue_id) {
            Some(mut venue) => {
                venue.bookings.push(booking);
                true
            }
            None => false,
        }
    }

    pub fn invalidate(&self, id: &str) {
        self.entries.remove(id);
    }
}

/// Fetches venues in the two mutually exclusive modes and performs venue
/// mutations. Mutations require a bearer token; the manager capability is
/// enforced server-side.
pub struct VenueSource {
    client: RestClient,
    cache: Arc<VenueCache>,
}

impl VenueSource {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            cache: Arc::new(VenueCache::new()),
        }
    }

    pub fn cache(&self) -> Arc<VenueCache> {
        Arc::clone(&self.cache)
    }

    /// One page of venues for the query's current mode: the paged listing
    /// endpoint, or the flat search endpoint.
    pub async fn fetch_page(&self, query: &VenueQuery) -> Result<Vec<Venue>, ApiError> {
        let path = match query.mode() {
            RetrievalMode::Search { .. } => "/holidaze/venues/search",
            RetrievalMode::Listing { .. } => "/holidaze/venues",
        };
        self.client
            .send(ApiRequest::get(path).with_query(query.params()))
            .await
    }

    /// Single venue with its reservation list; refreshes the cache entry
    /// (the authoritative overwrite of any optimistic state).
    pub async fn get(&self, id: &str) -> Result<Venue, ApiError> {
        let path = format!("/holidaze/venues/{}", encode_segment(id));
        let venue: Venue = self
            .client
            .send(ApiRequest::get(&path).with_query(vec![(
                "_bookings".to_string(),
                "true".to_string(),
            )]))
            .await?;
        self.cache.put(venue.clone());
        Ok(venue)
    }

    pub async fn venues_for_profile(&self, name: &str) -> Result<Vec<Venue>, ApiError> {
        let path = format!("/holidaze/profiles/{}/venues", encode_segment(name));
        self.client.send(ApiRequest::get(&path)).await
    }

    pub async fn create(&self, body: &CreateVenueBody, token: &str) -> Result<Venue, ApiError> {
        let venue: Venue = self
            .client
            .send(ApiRequest::post("/holidaze/venues", to_body(body)?).with_token(token))
            .await?;
        self.cache.put(venue.clone());
        Ok(venue)
    }

    pub async fn update(
        &self,
        id: &str,
        body: &CreateVenueBody,
        token: &str,
    ) -> Result<Venue, ApiError> {
        let path = format!("/holidaze/venues/{}", encode_segment(id));
        let venue: Venue = self
            .client
            .send(ApiRequest::put(&path, to_body(body)?).with_token(token))
            .await?;
        self.cache.put(venue.clone());
        Ok(venue)
    }

    pub async fn delete(&self, id: &str, token: &str) -> Result<(), ApiError> {
        let path = format!("/holidaze/venues/{}", encode_segment(id));
        self.client
            .send_empty(ApiRequest::delete(&path).with_token(token))
            .await?;
        self.cache.invalidate(id);
        Ok(())
    }
}

#[derive(Default)]
struct BrowserState {
    query: VenueQuery,
    venues: Vec<Venue>,
    has_more: bool,
    generation: u64,
}

/// Accumulates listing pages with "load more" semantics. Every issued load
/// supersedes the previous one: the in-flight request is aborted and any
/// result from an older generation is dropped without touching state.
pub struct VenueBrowser {
    source: Arc<VenueSource>,
    state: Mutex<BrowserState>,
    flight: FlightSlot,
}

impl VenueBrowser {
    pub fn new(source: Arc<VenueSource>) -> Self {
        Self {
            source,
            state: Mutex::new(BrowserState::default()),
            flight: FlightSlot::new(),
        }
    }

    pub fn with_page_size(source: Arc<VenueSource>, page_size: u32) -> Self {
        let browser = Self::new(source);
        browser.state.lock().query = VenueQuery::with_page_size(page_size);
        browser
    }

    pub fn venues(&self) -> Vec<Venue> {
        self.state.lock().venues.clone()
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().has_more
    }

    pub fn query(&self) -> VenueQuery {
        self.state.lock().query.clone()
    }

    /// Initial load, or reload of page 1 in the current mode.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let disposition = self.state.lock().query.reset();
        self.load(disposition).await
    }

    /// New search text (or back to listing when empty); replaces results.
    pub async fn search(&self, text: &str) -> Result<(), ApiError> {
        let disposition = self.state.lock().query.set_search_text(text);
        self.load(disposition).await
    }

    /// New sort; replaces results from page 1.
    pub async fn sort(&self, sort: SortKey, order: SortOrder) -> Result<(), ApiError> {
        let disposition = self.state.lock().query.set_sort(sort, order);
        self.load(disposition).await
    }

    /// Appends the next listing page; no-op in search mode.
    pub async fn load_more(&self) -> Result<(), ApiError> {
        let Some(disposition) = self.state.lock().query.next_page() else {
            return Ok(());
        };
        match self.load(disposition).await {
            Ok(()) => Ok(()),
            Err(err) => {
                // A failed fetch must not consume the page number; the
                // retry asks for the same page again.
                self.state.lock().query.retreat_page();
                Err(err)
            }
        }
    }

    /// Cancels any outstanding load, e.g. on view teardown.
    pub fn cancel(&self) {
        self.flight.cancel();
    }

    async fn load(&self, disposition: PageDisposition) -> Result<(), ApiError> {
        // Registering the flight under the same lock as the generation bump
        // keeps "newest load wins" consistent between the two mechanisms.
        let (query, generation, registration) = {
            let mut state = self.state.lock();
            state.generation += 1;
            (state.query.clone(), state.generation, self.flight.begin())
        };

        let result = match Abortable::new(self.source.fetch_page(&query), registration).await {
            Ok(result) => result,
            // Superseded by a newer load; silently discarded.
            Err(Aborted) => return Ok(()),
        };
        let page = match result {
            Ok(page) => page,
            Err(err) if err.is_cancelled() => return Ok(()),
            Err(err) => return Err(err),
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(generation, "discarding stale venue page");
            return Ok(());
        }
        state.has_more = query.has_more(page.len());
        match disposition {
            PageDisposition::Replace => state.venues = page,
            PageDisposition::Append => state.venues.extend(page),
        }
        Ok(())
    }
}
