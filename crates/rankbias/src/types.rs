use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Name used when a ranking entry has no name link.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A raw ranking entry as extracted from the page, before filtering and geocoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub location: String,
    pub stars: u32,
}

impl Default for Candidate {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            location: String::new(),
            stars: 0,
        }
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) {}*", self.name, self.location, self.stars)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A geocoded, highly rated recruit ready to be placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recruit {
    pub name: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub stars: u32,
}

impl Recruit {
    pub fn new(candidate: Candidate, coords: Coordinates) -> Self {
        Self {
            name: candidate.name,
            location: candidate.location,
            lat: coords.lat,
            lng: coords.lng,
            stars: candidate.stars,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

impl Display for Recruit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}*] {} ({})",
            self.name,
            self.stars,
            self.location,
            self.coordinates()
        )
    }
}

/// Body of the `/api/data` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<Recruit>,
}
