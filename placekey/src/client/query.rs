//! Resolution API queries.

use super::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys a query may carry.
pub const QUERY_KEYS: [&str; 10] = [
    "latitude",
    "longitude",
    "location_name",
    "street_address",
    "city",
    "region",
    "postal_code",
    "iso_country_code",
    "query_id",
    "place_metadata",
];

/// Keys allowed inside `place_metadata`.
pub const METADATA_KEYS: [&str; 5] = [
    "store_id",
    "phone_number",
    "website",
    "naics_code",
    "mcc_code",
];

/// Field combinations, any one of which is enough to resolve a place.
pub const MINIMUM_INPUTS: [&[&str]; 4] = [
    &["latitude", "longitude"],
    &["street_address", "city", "region", "postal_code"],
    &["street_address", "region", "postal_code"],
    &["street_address", "region", "city"],
];

/// A single place query, serialized as a flat JSON object.
///
/// ```
/// use placekey::client::Query;
///
/// let query = Query::new()
///     .with("street_address", "598 Portola Dr")
///     .with("city", "San Francisco")
///     .with("region", "CA")
///     .with("postal_code", "94131");
/// assert!(query.validate().is_ok());
///
/// assert!(Query::new().with("city", "San Francisco").validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Map<String, Value>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// A coordinate query.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::new()
            .with("latitude", latitude)
            .with("longitude", longitude)
    }

    /// Sets `key`, replacing any previous value.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Sets one `place_metadata` entry.
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        let metadata = self
            .0
            .entry("place_metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = metadata {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` is present with a non-null, non-blank value.
    pub fn has(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    pub fn query_id(&self) -> Option<&str> {
        self.0.get("query_id").and_then(Value::as_str)
    }

    pub fn set_query_id(&mut self, id: impl Into<String>) {
        self.0.insert("query_id".to_string(), Value::String(id.into()));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Checks keys against the allow-lists and the minimum inputs.
    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(key) = self.0.keys().find(|k| !QUERY_KEYS.contains(&k.as_str())) {
            return Err(ClientError::Argument(format!("Invalid query key: {}", key)));
        }

        match self.0.get("place_metadata") {
            None | Some(Value::Null) => {}
            Some(Value::Object(metadata)) => {
                if let Some(key) = metadata
                    .keys()
                    .find(|k| !METADATA_KEYS.contains(&k.as_str()))
                {
                    return Err(ClientError::Argument(format!(
                        "Invalid place_metadata key: {}",
                        key
                    )));
                }
            }
            Some(_) => {
                return Err(ClientError::Argument(
                    "place_metadata must be an object".to_string(),
                ))
            }
        }

        if !MINIMUM_INPUTS
            .iter()
            .any(|fields| fields.iter().all(|f| self.has(f)))
        {
            return Err(ClientError::Argument(
                "Query needs latitude and longitude, or street_address and region \
                 with city or postal_code"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Cache key: the serialized query without its `query_id`.
    ///
    /// Map keys serialize in sorted order, so equal queries share a key.
    pub fn cache_key(&self) -> String {
        let mut map = self.0.clone();
        map.remove("query_id");
        Value::Object(map).to_string()
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Query {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ClientError::Argument(format!(
                "Query must be a JSON object, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address() -> Query {
        Query::new()
            .with("street_address", "598 Portola Dr")
            .with("region", "CA")
    }

    #[test]
    fn test_coordinates_are_enough() {
        assert!(Query::from_coordinates(37.7371, -122.44283).validate().is_ok());
    }

    #[test]
    fn test_address_combinations() {
        assert!(address().with("city", "SF").validate().is_ok());
        assert!(address().with("postal_code", "94131").validate().is_ok());
        assert!(address()
            .with("city", "SF")
            .with("postal_code", "94131")
            .validate()
            .is_ok());
        assert!(address().validate().is_err());
    }

    #[test]
    fn test_missing_inputs_message() {
        match address().validate() {
            Err(ClientError::Argument(message)) => {
                assert!(message.contains("street_address and region with city or postal_code"))
            }
            other => panic!("expected Argument error, got {:?}", other),
        }
    }

    #[test]
    fn test_latitude_alone_is_not_enough() {
        let query = Query::new().with("latitude", 37.0);
        assert!(matches!(query.validate(), Err(ClientError::Argument(_))));
    }

    #[test]
    fn test_blank_values_do_not_count() {
        let query = address().with("city", "  ");
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Query::from_coordinates(0.0, 0.0)
            .with("country", "US")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Argument("Invalid query key: country".to_string())
        );
    }

    #[test]
    fn test_metadata_keys() {
        let ok = Query::from_coordinates(0.0, 0.0)
            .with_metadata("store_id", "1234")
            .with_metadata("naics_code", "722511");
        assert!(ok.validate().is_ok());
        assert_eq!(ok.get("place_metadata").unwrap()["store_id"], "1234");

        let bad = Query::from_coordinates(0.0, 0.0).with_metadata("owner", "me");
        assert!(bad.validate().is_err());

        let not_object = Query::from_coordinates(0.0, 0.0).with("place_metadata", "x");
        assert!(not_object.validate().is_err());
    }

    #[test]
    fn test_cache_key_ignores_query_id() {
        let mut a = Query::from_coordinates(1.0, 2.0);
        let b = Query::new().with("longitude", 2.0).with("latitude", 1.0);
        a.set_query_id("place_0");

        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.query_id(), Some("place_0"));
    }

    #[test]
    fn test_try_from_value() {
        let query = Query::try_from(json!({"latitude": 1.0, "longitude": 2.0})).unwrap();
        assert!(query.validate().is_ok());
        assert!(Query::try_from(json!([1, 2])).is_err());
    }

    #[test]
    fn test_serializes_flat() {
        let value = serde_json::to_value(Query::from_coordinates(1.0, 2.0)).unwrap();
        assert_eq!(value, json!({"latitude": 1.0, "longitude": 2.0}));
    }
}
