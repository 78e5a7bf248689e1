// Wire-faithful data model for the marketplace API.
// Every payload arrives camelCased and wrapped in a `{ data }` envelope;
// optional amenity and location fields default rather than fail.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

// Absence of a flag on the wire means false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amenities {
    pub wifi: bool,
    pub parking: bool,
    pub breakfast: bool,
    pub pets: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
}

impl Location {
    /// Human-readable place string; any subset of fields may be missing.
    pub fn display(&self) -> String {
        let region = self.country.as_deref().or(self.continent.as_deref());
        match (self.city.as_deref(), region) {
            (Some(city), Some(region)) => format!("{}, {}", city, region),
            (Some(city), None) => city.to_string(),
            (None, Some(region)) => region.to_string(),
            (None, None) => "Location unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<Media>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub media: Vec<Media>,
    pub price: f64,
    pub max_guests: u32,
    // 0 means "unrated"
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub meta: Amenities,
    #[serde(default)]
    pub location: Option<Location>,
    // Set server-side from the authenticated creator; read-only here.
    #[serde(default)]
    pub owner: Option<Customer>,
    // Advisory copy for availability display; the server is authoritative.
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Venue {
    pub fn cover_image(&self) -> Option<&Media> {
        self.media.first()
    }

    pub fn location_display(&self) -> String {
        self.location
            .as_ref()
            .map(Location::display)
            .unwrap_or_else(|| "Location unknown".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub date_from: DateTime<FixedOffset>,
    pub date_to: DateTime<FixedOffset>,
    pub guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
}

impl Booking {
    /// Check-in truncated to the calendar day, for date-only comparison.
    pub fn check_in_day(&self) -> NaiveDate {
        self.date_from.date_naive()
    }

    /// Check-out truncated to the calendar day.
    pub fn check_out_day(&self) -> NaiveDate {
        self.date_to.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<Media>,
    #[serde(default)]
    pub banner: Option<Media>,
    #[serde(default)]
    pub venue_manager: bool,
}

/// The locally cached identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Media>,
    #[serde(default)]
    pub venue_manager: bool,
}

impl From<Profile> for AuthUser {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            avatar: profile.avatar,
            venue_manager: profile.venue_manager,
        }
    }
}

// Request bodies

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub max_guests: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub meta: Amenities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub guests: u32,
    pub venue_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Media>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

// Auth responses

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<Media>,
    // Present in the login payload but not trusted; the authoritative value
    // comes from a follow-up profile fetch.
    #[serde(default)]
    pub venue_manager: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_venue_deserializes_with_missing_optionals() {
        let raw = json!({
            "id": "v1",
            "name": "Fjord Cabin",
            "price": 120.0,
            "maxGuests": 4
        });

        let venue: Venue = serde_json::from_value(raw).unwrap();
        assert_eq!(venue.rating, 0.0);
        assert_eq!(venue.meta, Amenities::default());
        assert!(venue.location.is_none());
        assert!(venue.bookings.is_empty());
        assert!(venue.cover_image().is_none());
        assert_eq!(venue.location_display(), "Location unknown");
    }

    #[test]
    fn test_venue_deserializes_full_record() {
        let raw = json!({
            "id": "v2",
            "name": "Harbour Loft",
            "description": "Top floor with a view",
            "media": [{ "url": "https://img.example/1.jpg", "alt": "facade" }],
            "price": 210.5,
            "maxGuests": 2,
            "rating": 4.5,
            "meta": { "wifi": true, "pets": true },
            "location": { "city": "Bergen", "country": "Norway" },
            "bookings": [{
                "id": "b1",
                "dateFrom": "2025-07-01T00:00:00.000Z",
                "dateTo": "2025-07-05T00:00:00.000Z",
                "guests": 2,
                "customer": { "name": "alice", "email": "alice@example.com" }
            }]
        });

        let venue: Venue = serde_json::from_value(raw).unwrap();
        assert!(venue.meta.wifi);
        assert!(venue.meta.pets);
        assert!(!venue.meta.parking);
        assert_eq!(venue.location_display(), "Bergen, Norway");
        assert_eq!(venue.cover_image().unwrap().url, "https://img.example/1.jpg");

        let booking = &venue.bookings[0];
        assert_eq!(
            booking.check_in_day(),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
        assert_eq!(
            booking.check_out_day(),
            NaiveDate::from_ymd_opt(2025, 7, 5).unwrap()
        );
    }

    #[test]
    fn test_location_display_degrades() {
        let continent_only = Location {
            city: None,
            country: None,
            continent: Some("Europe".to_string()),
        };
        assert_eq!(continent_only.display(), "Europe");

        let city_only = Location {
            city: Some("Oslo".to_string()),
            country: None,
            continent: None,
        };
        assert_eq!(city_only.display(), "Oslo");

        assert_eq!(Location::default().display(), "Location unknown");
    }

    #[test]
    fn test_booking_body_serializes_date_only() {
        let body = CreateBookingBody {
            date_from: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            guests: 2,
            venue_id: "v1".to_string(),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["dateFrom"], "2025-06-01");
        assert_eq!(value["dateTo"], "2025-06-05");
        assert_eq!(value["venueId"], "v1");
    }

    #[test]
    fn test_login_result_without_manager_flag() {
        let raw = json!({
            "accessToken": "token-1",
            "name": "alice",
            "email": "alice@stud.example.no"
        });

        let result: LoginResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.access_token, "token-1");
        assert_eq!(result.venue_manager, None);
    }
}
