//! Data documents read by the page controllers.
//!
//! Two JSON documents drive the site:
//!
//! - `plants-data.json`: `{ "categories": [...], "plants": [...] }`
//! - `photos.json`: `{ "albums": [...] }`
//!
//! Documents are hand-edited, so the types are lenient where the live data
//! is: missing arrays become empty, missing album details render as empty
//! text, and a few fields (album month/year, camera settings) accept either
//! JSON strings or numbers.

use serde::{Deserialize, Deserializer};

/// Filter value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    /// Id of the owning [`Category`].
    pub category: String,
    pub description: String,
    pub sunlight: String,
    pub watering: String,
    pub climate: String,
    pub soil: String,
    pub harvest_time: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
}

impl Plant {
    pub fn has_video(&self) -> bool {
        has_text(self.video.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlantsDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub plants: Vec<Plant>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub theme_en: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub month: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub year: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Photo {
    pub title: String,
    #[serde(default)]
    pub title_en: Option<String>,
    pub src: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub lens: Option<String>,
    #[serde(default)]
    pub settings: Option<CameraSettings>,
    #[serde(default)]
    pub composition: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
}

impl Photo {
    /// Grid image: the thumbnail when one is given, else the full image.
    pub fn card_src(&self) -> &str {
        self.thumb
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.src)
    }

    pub fn has_video(&self) -> bool {
        has_text(self.video.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CameraSettings {
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub iso: Option<String>,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub aperture: Option<String>,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub shutter: Option<String>,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub focal_length: Option<String>,
}

impl CameraSettings {
    /// Present settings as `(label, value)` pairs in display order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("ISO", &self.iso),
            ("Aperture", &self.aperture),
            ("Shutter", &self.shutter),
            ("Focal", &self.focal_length),
        ]
        .into_iter()
        .filter_map(|(key, val)| {
            val.as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PhotosDocument {
    #[serde(default)]
    pub albums: Vec<Album>,
}

/// True when the value has non-whitespace content.
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// String or number as text; `null` reads as empty.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text_or_number(deserializer)?.unwrap_or_default())
}

fn optional_text_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}
