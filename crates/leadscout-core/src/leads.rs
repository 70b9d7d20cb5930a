use serde::{Deserialize, Serialize};

use crate::categories::SearchTarget;

/// City and state a run is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geography {
    pub state: String,
    pub city: String,
}

impl Geography {
    #[must_use]
    pub fn new(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
        }
    }

    /// Returns `true` when both city and state carry non-blank text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.state.trim().is_empty() && !self.city.trim().is_empty()
    }
}

/// Geographic scope of one crawl: a named neighborhood, or the whole city
/// with no neighborhood restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Area {
    WholeCity,
    Neighborhood(String),
}

impl Area {
    /// Builds the ordered area sequence for a run.
    ///
    /// Blank names are dropped. When nothing is left the sequence is exactly
    /// `[Area::WholeCity]`.
    #[must_use]
    pub fn sequence<S: AsRef<str>>(names: &[S]) -> Vec<Area> {
        let areas: Vec<Area> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .map(|n| Area::Neighborhood(n.to_string()))
            .collect();

        if areas.is_empty() {
            vec![Area::WholeCity]
        } else {
            areas
        }
    }

    /// The neighborhood name, or `None` for the whole city.
    #[must_use]
    pub fn neighborhood(&self) -> Option<&str> {
        match self {
            Area::WholeCity => None,
            Area::Neighborhood(name) => Some(name),
        }
    }

    /// Human-readable name used in status text: the neighborhood, or the
    /// city itself for [`Area::WholeCity`].
    #[must_use]
    pub fn label<'a>(&'a self, city: &'a str) -> &'a str {
        self.neighborhood().unwrap_or(city)
    }
}

/// One raw result returned by the places search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceHit {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
}

/// A captured business record, tagged with the category and geography it
/// was found under. `place_id` is the deduplication key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    /// Category label, e.g. `"Restaurants"`.
    pub category: String,
    pub category_id: String,
    pub city: String,
    pub state: String,
}

impl Lead {
    /// Enriches a raw hit with category and geography metadata.
    #[must_use]
    pub fn from_hit(hit: PlaceHit, target: &SearchTarget, geography: &Geography) -> Self {
        Self {
            place_id: hit.place_id,
            name: hit.name,
            address: hit.address,
            phone: hit.phone,
            website: hit.website,
            rating: hit.rating,
            category: target.label.clone(),
            category_id: target.id.clone(),
            city: geography.city.clone(),
            state: geography.state.clone(),
        }
    }
}
