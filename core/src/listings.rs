use serde::{Deserialize, Deserializer, Serialize};

/// A property card as returned by the backend. Listings are never mutated
/// client-side, only redisplayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyListing {
    /// Backend identifier. Some data sources emit numeric ids.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// Display price (e.g. "₹1.2Cr"). Raw numbers are kept as their decimal text.
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
    pub location: String,
    /// Raw records may carry "3 BHK" style text; the first digit run wins.
    #[serde(
        rename = "bedrooms",
        alias = "bedrooms_count",
        alias = "bhk",
        default,
        deserialize_with = "lenient_count"
    )]
    pub bedroom_count: u32,
    /// Assistant replies send `image`; raw search records send `image_url`.
    #[serde(
        rename = "image",
        alias = "image_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<String>,
}

/// Structured shorthand for a search: city, budget band and bedroom count.
/// Blank fields count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<String>,
}

pub const ANY_CITY: &str = "any city";
pub const ANY: &str = "any";

impl QuickFilters {
    pub fn new(
        location: Option<impl Into<String>>,
        budget: Option<impl Into<String>>,
        bedrooms: Option<impl Into<String>>,
    ) -> Self {
        Self {
            location: location.map(Into::into),
            budget: budget.map(Into::into),
            bedrooms: bedrooms.map(Into::into),
        }
    }

    /// Drop blank fields and trim the rest.
    pub fn normalized(&self) -> Self {
        fn clean(v: &Option<String>) -> Option<String> {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }
        Self {
            location: clean(&self.location),
            budget: clean(&self.budget),
            bedrooms: clean(&self.bedrooms),
        }
    }

    pub fn is_empty(&self) -> bool {
        let n = self.normalized();
        n.location.is_none() && n.budget.is_none() && n.bedrooms.is_none()
    }

    /// Human-readable request text. Field order is fixed: location, budget,
    /// bedrooms.
    pub fn summary(&self) -> String {
        let n = self.normalized();
        format!(
            "Looking for homes in {} with budget {} and {} bedrooms",
            n.location.as_deref().unwrap_or(ANY_CITY),
            n.budget.as_deref().unwrap_or(ANY),
            n.bedrooms.as_deref().unwrap_or(ANY),
        )
    }

    /// Query pairs for `GET /properties`, absent fields omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let n = self.normalized();
        [
            ("location", n.location),
            ("budget", n.budget),
            ("bedrooms", n.bedrooms),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
    }
}

/// Body of `POST /chat/message`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<&'a QuickFilters>,
}

/// What the assistant endpoint returns. Older backends use `message`
/// instead of `response`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssistantReply {
    #[serde(default, alias = "message")]
    pub response: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Vec<PropertyListing>,
    /// Filters the backend resolved from the message, if it reports them.
    #[serde(default, deserialize_with = "lenient_filters")]
    pub filters: Option<QuickFilters>,
}

/// `GET /properties` answers either with a wrapper object or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropertySearchResponse {
    Wrapped {
        #[serde(deserialize_with = "null_as_empty")]
        properties: Vec<PropertyListing>,
    },
    Bare(Vec<PropertyListing>),
}

impl PropertySearchResponse {
    pub fn into_properties(self) -> Vec<PropertyListing> {
        match self {
            Self::Wrapped { properties } | Self::Bare(properties) => properties,
        }
    }
}

/// Body of `POST /user/save`.
#[derive(Debug, Clone, Serialize)]
pub struct SavePropertyRequest<'a> {
    pub user_id: &'a str,
    pub property_id: &'a str,
}

/// `GET /user/saved/{user_id}`. Entries are property ids or full records;
/// only the id is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedPropertiesResponse {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub saved_properties: Vec<serde_json::Value>,
}

impl SavedPropertiesResponse {
    pub fn property_ids(&self) -> Vec<String> {
        self.saved_properties
            .iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Object(obj) => obj
                    .get("property_id")
                    .or_else(|| obj.get("id"))
                    .and_then(|id| match id {
                        serde_json::Value::String(s) => Some(s.clone()),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    }),
                _ => None,
            })
            .collect()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let count = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Raw::Text(s)) => s
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0),
        None => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// The backend echoes `filters` with null members, or `{}` when nothing was
// extracted. Both collapse to `None`.
fn lenient_filters<'de, D>(deserializer: D) -> Result<Option<QuickFilters>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<QuickFilters>::deserialize(deserializer)?;
    Ok(raw.map(|f| f.normalized()).filter(|f| !f.is_empty()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summary_keeps_field_order() {
        let filters = QuickFilters::new(Some("Mumbai"), Some("50L-1Cr"), Some("2"));
        let summary = filters.summary();

        let loc = summary.find("Mumbai").unwrap();
        let budget = summary.find("50L-1Cr").unwrap();
        let beds = summary.rfind('2').unwrap();
        assert!(loc < budget && budget < beds, "unexpected order: {summary}");
    }

    #[test]
    fn summary_uses_placeholders_for_missing_fields() {
        let filters = QuickFilters::new(None::<String>, Some("0-50L"), None::<String>);
        assert_eq!(
            filters.summary(),
            "Looking for homes in any city with budget 0-50L and any bedrooms"
        );
    }

    #[test]
    fn blank_fields_count_as_empty() {
        let filters = QuickFilters::new(Some("  "), Some(""), None::<String>);
        assert!(filters.is_empty());
        assert!(QuickFilters::default().is_empty());
        assert!(!QuickFilters::new(None::<String>, None::<String>, Some("3")).is_empty());
    }

    #[test]
    fn query_pairs_skip_absent_fields() {
        let filters = QuickFilters::new(Some(" Pune "), None::<String>, Some("2"));
        assert_eq!(
            filters.query_pairs(),
            vec![("location", "Pune".to_string()), ("bedrooms", "2".to_string())]
        );
    }

    #[test]
    fn listing_accepts_numeric_id_and_price() {
        let listing: PropertyListing = serde_json::from_value(json!({
            "id": 42,
            "title": "Sea-facing 2BHK",
            "price": 12500000,
            "location": "Mumbai",
            "bedrooms": 2
        }))
        .unwrap();

        assert_eq!(listing.id, "42");
        assert_eq!(listing.price, "12500000");
        assert_eq!(listing.bedroom_count, 2);
        assert_eq!(listing.image_ref, None);
    }

    #[test]
    fn listing_reads_image_url_and_text_bedrooms() {
        let listing: PropertyListing = serde_json::from_value(json!({
            "id": "p5",
            "title": "Lake view",
            "price": 8900000,
            "location": "Bangalore",
            "bedrooms": "3 BHK",
            "image_url": "https://img/1.jpg"
        }))
        .unwrap();

        assert_eq!(listing.bedroom_count, 3);
        assert_eq!(listing.image_ref.as_deref(), Some("https://img/1.jpg"));
    }

    #[test]
    fn unparseable_or_null_bedrooms_fall_back_to_zero() {
        for bedrooms in [json!("studio"), json!(null), json!(-2)] {
            let listing: PropertyListing = serde_json::from_value(json!({
                "id": "p6", "title": "T", "price": "₹40L", "location": "Delhi",
                "bedrooms": bedrooms
            }))
            .unwrap();
            assert_eq!(listing.bedroom_count, 0);
        }
    }

    #[test]
    fn null_properties_decode_as_empty() {
        let reply: AssistantReply =
            serde_json::from_value(json!({"response": "hi", "properties": null})).unwrap();
        assert_eq!(reply.response.as_deref(), Some("hi"));
        assert!(reply.properties.is_empty());

        let search: PropertySearchResponse =
            serde_json::from_value(json!({"properties": null})).unwrap();
        assert!(search.into_properties().is_empty());
    }

    #[test]
    fn search_response_with_raw_records_decodes() {
        let search: PropertySearchResponse = serde_json::from_value(json!({"properties": [{
            "id": 11, "title": "Row house", "price": 15000000, "location": "Pune",
            "bedrooms": "4 BHK", "image_url": "https://img/11.jpg",
            "bathrooms": 3, "size_sqft": 1800, "amenities": ["gym"]
        }]}))
        .unwrap();

        let properties = search.into_properties();
        assert_eq!(properties[0].id, "11");
        assert_eq!(properties[0].bedroom_count, 4);
        assert_eq!(properties[0].image_ref.as_deref(), Some("https://img/11.jpg"));
    }

    #[test]
    fn reply_accepts_message_alias_and_drops_empty_filters() {
        let reply: AssistantReply = serde_json::from_value(json!({
            "message": "Hello!",
            "filters": {"location": null, "budget": null, "bedrooms": null}
        }))
        .unwrap();

        assert_eq!(reply.response.as_deref(), Some("Hello!"));
        assert!(reply.properties.is_empty());
        assert_eq!(reply.filters, None);
    }

    #[test]
    fn search_response_accepts_both_shapes() {
        let card = json!({"id": "p1", "title": "T", "price": "₹50L", "location": "Delhi", "bedrooms": 1});

        let wrapped: PropertySearchResponse =
            serde_json::from_value(json!({"properties": [card.clone()]})).unwrap();
        let bare: PropertySearchResponse = serde_json::from_value(json!([card])).unwrap();

        assert_eq!(wrapped.into_properties()[0].id, "p1");
        assert_eq!(bare.into_properties()[0].id, "p1");
    }

    #[test]
    fn saved_ids_from_mixed_entries() {
        let resp: SavedPropertiesResponse = serde_json::from_value(json!({
            "user_id": "user_123",
            "saved_properties": ["p1", 7, {"property_id": "p9"}, {"id": "p3"}, null]
        }))
        .unwrap();

        assert_eq!(resp.property_ids(), vec!["p1", "7", "p9", "p3"]);
    }
}
