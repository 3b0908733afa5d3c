// Cleveland Museum of Art API Data Models

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ============================================================================
// Artwork
// ============================================================================

/// One artwork as returned in the `data` array of the artworks endpoint
///
/// Every field is optional. Records are decoded one at a time so a single odd
/// record cannot take down the page. Only `id` and `images` are structural;
/// descriptive fields with an unexpected JSON type decode as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtwork {
    /// Numeric in the live API; strings are accepted too
    #[serde(default, deserialize_with = "identifier")]
    pub id: Option<String>,

    /// Collection page for the artwork
    #[serde(default, deserialize_with = "text")]
    pub url: Option<String>,

    /// "CC0" for open-access works
    #[serde(default, deserialize_with = "text")]
    pub share_license_status: Option<String>,

    pub images: Option<ImageSet>,

    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "creator_list")]
    pub creators: Option<Vec<Creator>>,

    #[serde(default, deserialize_with = "text")]
    pub accession_number: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub technique: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub creation_date: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub creditline: Option<String>,

    /// Object classification, e.g. "Painting"
    #[serde(rename = "type", default, deserialize_with = "text")]
    pub classification: Option<String>,

    /// One-line citation of the work
    #[serde(default, deserialize_with = "text")]
    pub tombstone: Option<String>,

    /// A list in the live API; a bare string counts as one entry
    #[serde(default, deserialize_with = "text_list")]
    pub culture: Option<Vec<String>>,
}

impl RawArtwork {
    /// Decode a single element of the page's `data` array
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Creator entry; only the display description is used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Creator {
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
}

// ============================================================================
// Images
// ============================================================================

/// Renditions offered for an artwork; other keys are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSet {
    pub web: Option<ImageVariant>,
    pub print: Option<ImageVariant>,
    pub full: Option<ImageVariant>,
}

impl ImageSet {
    /// Look up a rendition by its API key
    pub fn variant(&self, name: &str) -> Option<&ImageVariant> {
        match name {
            "web" => self.web.as_ref(),
            "print" => self.print.as_ref(),
            "full" => self.full.as_ref(),
            _ => None,
        }
    }
}

/// One image rendition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageVariant {
    #[serde(default, deserialize_with = "text")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "dimension")]
    pub width: Option<u32>,

    #[serde(default, deserialize_with = "dimension")]
    pub height: Option<u32>,
}

fn identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

// Scalars become text; arrays, objects and nulls are absent.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Some(Value::String(s)) => Some(vec![s]),
        _ => None,
    })
}

fn creator_list<'de, D>(deserializer: D) -> Result<Option<Vec<Creator>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

// The API has served dimensions both as numbers and as numeric strings.
fn dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
