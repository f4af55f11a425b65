//! Records the convenience batch operations work on.

use crate::client::Query;
use serde::{Deserialize, Serialize};

/// A record that can carry a placekey.
pub trait PlaceRecord {
    /// The stored placekey, if any.
    fn placekey(&self) -> Option<&str>;

    fn set_placekey(&mut self, placekey: String);

    /// `(latitude, longitude)` when both are present.
    fn coordinates(&self) -> Option<(f64, f64)>;

    /// Address fields as a lookup query, or `None` without any.
    fn address_query(&self) -> Option<Query>;
}

/// A place as read from JSON, CSV or a database row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placekey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_country_code: Option<String>,
}

impl Place {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }
}

impl PlaceRecord for Place {
    fn placekey(&self) -> Option<&str> {
        self.placekey.as_deref().filter(|pk| !pk.is_empty())
    }

    fn set_placekey(&mut self, placekey: String) {
        self.placekey = Some(placekey);
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    fn address_query(&self) -> Option<Query> {
        let fields = [
            ("location_name", &self.location_name),
            ("street_address", &self.street_address),
            ("city", &self.city),
            ("region", &self.region),
            ("postal_code", &self.postal_code),
            ("iso_country_code", &self.iso_country_code),
        ];

        let mut query = Query::new();
        let mut any = false;
        for (key, value) in fields {
            if let Some(value) = value {
                query = query.with(key, value.as_str());
                any = true;
            }
        }
        any.then_some(query)
    }
}
