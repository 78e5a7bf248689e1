// Client-side filter engine. Applied to already-fetched pages only; filter
// state is never sent to the server (search and filter are mutually
// exclusive retrieval concerns).

use crate::model::Venue;

/// Ephemeral, client-only criteria. An inactive criterion (empty string,
/// unset number, false flag) imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub country: String,
    pub city: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub wifi: bool,
    pub parking: bool,
    pub breakfast: bool,
    pub pets: bool,
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        !self.country.is_empty()
            || !self.city.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.min_rating.is_some()
            || self.wifi
            || self.parking
            || self.breakfast
            || self.pets
    }

    /// Logical AND of all active criteria.
    pub fn matches(&self, venue: &Venue) -> bool {
        if !self.country.is_empty() {
            // Missing location fails the match only because the criterion
            // is active.
            let Some(country) = venue.location.as_ref().and_then(|l| l.country.as_deref())
            else {
                return false;
            };
            if !contains_ci(country, &self.country) {
                return false;
            }
        }

        if !self.city.is_empty() {
            let Some(city) = venue.location.as_ref().and_then(|l| l.city.as_deref()) else {
                return false;
            };
            if !contains_ci(city, &self.city) {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if venue.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if venue.price > max {
                return false;
            }
        }

        if let Some(min) = self.min_rating {
            if venue.rating < min {
                return false;
            }
        }

        if self.wifi && !venue.meta.wifi {
            return false;
        }
        if self.parking && !venue.meta.parking {
            return false;
        }
        if self.breakfast && !venue.meta.breakfast {
            return false;
        }
        if self.pets && !venue.meta.pets {
            return false;
        }

        true
    }

    /// Produces the visible subset. Pure and order-preserving, so applying
    /// the same criteria twice yields the same subset as applying once.
    pub fn apply<'a>(&self, venues: &'a [Venue]) -> Vec<&'a Venue> {
        venues.iter().filter(|venue| self.matches(venue)).collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amenities, Location};
    use test_case::test_case;

    fn venue(id: &str, price: f64, rating: f64, meta: Amenities, location: Option<Location>) -> Venue {
        Venue {
            id: id.to_string(),
            name: format!("Venue {}", id),
            description: None,
            media: Vec::new(),
            price,
            max_guests: 4,
            rating,
            meta,
            location,
            owner: None,
            bookings: Vec::new(),
        }
    }

    fn sample_set() -> Vec<Venue> {
        vec![
            venue(
                "v1",
                80.0,
                4.5,
                Amenities {
                    wifi: true,
                    ..Amenities::default()
                },
                Some(Location {
                    city: Some("Bergen".to_string()),
                    country: Some("Norway".to_string()),
                    continent: Some("Europe".to_string()),
                }),
            ),
            venue(
                "v2",
                200.0,
                0.0,
                Amenities {
                    wifi: true,
                    parking: true,
                    breakfast: true,
                    pets: true,
                },
                Some(Location {
                    city: Some("Lisbon".to_string()),
                    country: Some("Portugal".to_string()),
                    continent: Some("Europe".to_string()),
                }),
            ),
            venue("v3", 120.0, 3.0, Amenities::default(), None),
        ]
    }

    #[test_case(FilterCriteria { country: "nor".to_string(), ..FilterCriteria::default() }, vec!["v1"]; "country substring, case-insensitive")]
    #[test_case(FilterCriteria { city: "LIS".to_string(), ..FilterCriteria::default() }, vec!["v2"]; "city substring")]
    #[test_case(FilterCriteria { min_price: Some(100.0), ..FilterCriteria::default() }, vec!["v2", "v3"]; "min price inclusive")]
    #[test_case(FilterCriteria { max_price: Some(120.0), ..FilterCriteria::default() }, vec!["v1", "v3"]; "max price inclusive")]
    #[test_case(FilterCriteria { min_rating: Some(3.0), ..FilterCriteria::default() }, vec!["v1", "v3"]; "min rating")]
    #[test_case(FilterCriteria { pets: true, ..FilterCriteria::default() }, vec!["v2"]; "amenity flag")]
    #[test_case(FilterCriteria { wifi: true, max_price: Some(100.0), ..FilterCriteria::default() }, vec!["v1"]; "combined criteria")]
    #[test_case(FilterCriteria::default(), vec!["v1", "v2", "v3"]; "inactive criteria impose nothing")]
    fn test_filter_subsets(criteria: FilterCriteria, expected: Vec<&str>) {
        let venues = sample_set();
        let visible: Vec<&str> = criteria.apply(&venues).iter().map(|v| v.id.as_str()).collect();
        assert_eq!(visible, expected);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let venues = sample_set();
        let criteria = FilterCriteria {
            min_price: Some(80.0),
            max_price: Some(80.0),
            ..FilterCriteria::default()
        };
        let visible: Vec<&str> = criteria.apply(&venues).iter().map(|v| v.id.as_str()).collect();
        assert_eq!(visible, vec!["v1"]);
    }

    #[test]
    fn test_missing_location_fails_only_active_criteria() {
        let venues = sample_set();

        let with_country = FilterCriteria {
            country: "norway".to_string(),
            ..FilterCriteria::default()
        };
        assert!(!with_country.matches(&venues[2]));

        // v3 has no location, but passes when no location criterion is set.
        let price_only = FilterCriteria {
            max_price: Some(150.0),
            ..FilterCriteria::default()
        };
        assert!(price_only.matches(&venues[2]));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let venues = sample_set();
        let criteria = FilterCriteria {
            wifi: true,
            min_rating: Some(1.0),
            ..FilterCriteria::default()
        };

        let once: Vec<Venue> = criteria.apply(&venues).into_iter().cloned().collect();
        let twice: Vec<Venue> = criteria.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_is_monotone() {
        let venues = sample_set();
        let base = FilterCriteria {
            max_price: Some(250.0),
            ..FilterCriteria::default()
        };
        let narrowed = FilterCriteria {
            max_price: Some(250.0),
            breakfast: true,
            ..FilterCriteria::default()
        };
        assert!(narrowed.apply(&venues).len() <= base.apply(&venues).len());
    }

    #[test]
    fn test_filter_preserves_order() {
        let venues = sample_set();
        let criteria = FilterCriteria {
            min_price: Some(0.0),
            ..FilterCriteria::default()
        };
        let ids: Vec<&str> = criteria.apply(&venues).iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn test_unrated_venue_fails_min_rating() {
        let venues = sample_set();
        let criteria = FilterCriteria {
            min_rating: Some(0.5),
            ..FilterCriteria::default()
        };
        // v2 is unrated (0) and must not pass a positive rating bound.
        assert!(!criteria.matches(&venues[1]));
    }

    #[test]
    fn test_is_active() {
        assert!(!FilterCriteria::default().is_active());
        assert!(FilterCriteria {
            city: "Oslo".to_string(),
            ..FilterCriteria::default()
        }
        .is_active());
        assert!(FilterCriteria {
            breakfast: true,
            ..FilterCriteria::default()
        }
        .is_active());
    }
}
