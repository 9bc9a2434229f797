//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the source root next to the page shells. Every key is optional: user
//! values are merged on top of the stock defaults, which describe the
//! KuttyTeachers site as shipped.
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! name = "KuttyTeachers"
//! name_local = "കട്ടിടീച്ചേഴ്സ്"
//! tagline = "പാലക്കാട്ടിൽ നിന്ന്, ഹൃദയത്തിൽ നിന്ന്"
//! email = "contact@kuttyteachers.in"
//! location = "പാലക്കാട്, കേരളം"
//! year = "2026"
//!
//! [social]
//! facebook = "#"
//! instagram = "#"
//! youtube = "#"
//! whatsapp = "#"
//!
//! [data]
//! plants = "plants-data.json"   # Looked up next to each page shell
//! photos = "photos.json"
//! load_timeout_secs = 10
//!
//! [display]
//! description_chars = 100       # Card description budget
//! care_chars = 25               # Card care-value budget
//! truncation_marker = "..."
//! swipe_threshold_px = 50
//! default_page = "index.html"   # Active nav entry for an empty path
//! loader_hide_ms = 2000         # Splash screen delay
//!
//! [[nav]]
//! label = "🏠 വീട്"
//! href = "index.html"
//!
//! [footer]
//! pages_heading = "പേജുകൾ"
//! classes_heading = "ക്ലാസുകൾ"
//! contact_heading = "സമ്പർക്കം"
//!
//! [labels]
//! no_plants = "ഈ വിഭാഗത്തിൽ ചെടികൾ ഇല്ല."
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Brand identity shown in the footer.
    pub site: SiteIdentity,
    /// Social profile links, rendered as footer icons.
    pub social: SocialLinks,
    /// Primary navigation entries (desktop nav, drawer, footer pages column).
    pub nav: Vec<NavLink>,
    /// Footer columns and fine print.
    pub footer: FooterConfig,
    /// Data document names and loading policy.
    pub data: DataConfig,
    /// Display budgets and interaction thresholds.
    pub display: DisplayConfig,
    /// Localized interface strings.
    pub labels: Labels,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteIdentity::default(),
            social: SocialLinks::default(),
            nav: default_nav(),
            footer: FooterConfig::default(),
            data: DataConfig::default(),
            display: DisplayConfig::default(),
            labels: Labels::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.description_chars == 0 || self.display.care_chars == 0 {
            return Err(ConfigError::Validation(
                "display budgets must be non-zero".into(),
            ));
        }
        if self.display.swipe_threshold_px <= 0.0 {
            return Err(ConfigError::Validation(
                "display.swipe_threshold_px must be positive".into(),
            ));
        }
        if self.display.default_page.trim().is_empty() {
            return Err(ConfigError::Validation(
                "display.default_page must not be empty".into(),
            ));
        }
        if self.data.load_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "data.load_timeout_secs must be at least 1".into(),
            ));
        }
        if self.data.plants.trim().is_empty() || self.data.photos.trim().is_empty() {
            return Err(ConfigError::Validation(
                "data document names must not be empty".into(),
            ));
        }
        if let Some(link) = self
            .nav
            .iter()
            .chain(&self.footer.classes)
            .find(|l| l.href.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "link '{}' has an empty href",
                link.label
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteIdentity {
    pub name: String,
    /// Name in the local script, shown under the latin name.
    pub name_local: String,
    pub tagline: String,
    pub email: String,
    pub location: String,
    /// Copyright year. Kept as text so ranges like "2024–2026" work.
    pub year: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            name: "KuttyTeachers".to_string(),
            name_local: "കട്ടിടീച്ചേഴ്സ്".to_string(),
            tagline: "പാലക്കാട്ടിൽ നിന്ന്, ഹൃദയത്തിൽ നിന്ന്".to_string(),
            email: "contact@kuttyteachers.in".to_string(),
            location: "പാലക്കാട്, കേരളം".to_string(),
            year: "2026".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialLinks {
    pub facebook: String,
    pub instagram: String,
    pub youtube: String,
    pub whatsapp: String,
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            facebook: "#".to_string(),
            instagram: "#".to_string(),
            youtube: "#".to_string(),
            whatsapp: "#".to_string(),
        }
    }
}

/// A labelled link to a page of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

fn default_nav() -> Vec<NavLink> {
    vec![
        NavLink::new("🏠 വീട്", "index.html"),
        NavLink::new("📸 ഫോട്ടോഗ്രാഫി", "photography.html"),
        NavLink::new("📚 പഠനം", "tutoring.html"),
        NavLink::new("🎹 സംഗീതം", "piano.html"),
        NavLink::new("🌿 തോട്ടം", "gardening.html"),
        NavLink::new("ℹ️ ഞങ്ങളെക്കുറിച്ച്", "about.html"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    pub pages_heading: String,
    pub classes_heading: String,
    pub classes: Vec<NavLink>,
    pub contact_heading: String,
    /// Text after `© {year}` in the bottom bar.
    pub copyright: String,
    pub attribution: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            pages_heading: "പേജുകൾ".to_string(),
            classes_heading: "ക്ലാസുകൾ".to_string(),
            classes: vec![
                NavLink::new("ഒന്നാം ക്ലാസ്", "class-1.html"),
                NavLink::new("രണ്ടാം ക്ലാസ്", "class-2.html"),
                NavLink::new("മൂന്നാം ക്ലാസ്", "class-3.html"),
                NavLink::new("നാലാം ക്ലാസ്", "class-4.html"),
                NavLink::new("അഞ്ചാം ക്ലാസ്", "class-5.html"),
            ],
            contact_heading: "സമ്പർക്കം".to_string(),
            copyright: "KuttyTeachers.in — പാലക്കാട്ടിൽ 🌱 നിർമ്മിതം".to_string(),
            attribution: "ഈ ഉള്ളടക്കം KuttyTeachers സൃഷ്ടിച്ചതാണ്. AI സഹായത്തോടെ. \
                          യഥാർത്ഥ ആശയങ്ങളും ക്യൂറേഷനും ലേഖകന്റേതാണ്."
                .to_string(),
        }
    }
}

/// Data documents, resolved relative to each page shell's directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub plants: String,
    pub photos: String,
    /// Upper bound on a single document load. A stalled read surfaces as
    /// a load error instead of hanging the build.
    pub load_timeout_secs: u64,
}

impl DataConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            plants: "plants-data.json".to_string(),
            photos: "photos.json".to_string(),
            load_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Character budget for the card description.
    pub description_chars: usize,
    /// Character budget for each care value on a card.
    pub care_chars: usize,
    pub truncation_marker: String,
    /// Horizontal displacement a swipe must exceed to page the lightbox.
    pub swipe_threshold_px: f32,
    /// Path segment treated as current when the location has none.
    pub default_page: String,
    /// Delay before the page script hides the `#kt-loader` splash.
    pub loader_hide_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            description_chars: 100,
            care_chars: 25,
            truncation_marker: "...".to_string(),
            swipe_threshold_px: 50.0,
            default_page: "index.html".to_string(),
            loader_hide_ms: 2000,
        }
    }
}

/// Interface strings. Defaults are Malayalam, as on the live site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub all_plants: String,
    pub no_plants: String,
    pub plants_load_failed: String,
    pub read_more: String,
    pub sunlight: String,
    pub watering: String,
    pub climate: String,
    pub soil: String,
    pub description: String,
    pub harvest_time: String,
    pub video_badge: String,
    pub video_heading: String,
    pub video_coming_soon: String,
    pub video_unsupported: String,
    pub plants_video_hint: String,
    pub photos_video_hint: String,
    pub no_photos: String,
    pub photos_load_failed: String,
    pub photos_load_hint: String,
    pub click_to_view: String,
    pub photo_description: String,
    pub camera: String,
    pub settings: String,
    pub composition: String,
    pub close: String,
    pub previous_photo: String,
    pub next_photo: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            all_plants: "🌿 എല്ലാ ചെടികൾ".to_string(),
            no_plants: "ഈ വിഭാഗത്തിൽ ചെടികൾ ഇല്ല.".to_string(),
            plants_load_failed: "ഡേറ്റ ലോഡ് ചെയ്യാൻ കഴിഞ്ഞില്ല. ദയവായി പേജ് രീഫ്രഷ് ചെയ്യുക."
                .to_string(),
            read_more: "വായിക്കുക".to_string(),
            sunlight: "☀️ സൂര്യപ്രകാശം".to_string(),
            watering: "💧 നീരാൾ".to_string(),
            climate: "🌡️ കാലാവസ്ഥ".to_string(),
            soil: "🥔 വളം".to_string(),
            description: "📖 വിവരണം".to_string(),
            harvest_time: "⏱️ വളർച്ചി സമയം".to_string(),
            video_badge: "▶ വീഡിയോ".to_string(),
            video_heading: "🎬 വീഡിയോ".to_string(),
            video_coming_soon: "വീഡിയോ ഉടൻ വരും".to_string(),
            video_unsupported: "നിങ്ങളുടെ ബ്രൗസർ വീഡിയോ പിന്തുണയ്ക്കുന്നില്ല.".to_string(),
            plants_video_hint: "plants-data.json ൽ \"video\": \"your-url\" ചേർക്കുക".to_string(),
            photos_video_hint: "photos.json ൽ \"video\" ഫീൽഡ് ചേർക്കുക".to_string(),
            no_photos: "ഫോട്ടോകൾ ഉടൻ വരും...".to_string(),
            photos_load_failed: "photos.json ലോഡ് ചെയ്യാൻ കഴിഞ്ഞില്ല.".to_string(),
            photos_load_hint: "Make sure photos.json is in the same folder.".to_string(),
            click_to_view: "കാണാൻ ക്ലിക്ക് ചെയ്യുക".to_string(),
            photo_description: "വിവരണം".to_string(),
            camera: "📷 Camera".to_string(),
            settings: "⚙️ Settings".to_string(),
            composition: "🎨 Composition".to_string(),
            close: "Close".to_string(),
            previous_photo: "Previous photo".to_string(),
            next_photo: "Next photo".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value (arrays included)
/// replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the source root.
///
/// Missing file means stock defaults. User values are merged over the
/// defaults, unknown keys are rejected, and the result is validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let base = stock_defaults_value();
    let merged = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let overlay: toml::Value = toml::from_str(&content)?;
        merge_toml(base, overlay)
    } else {
        base
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a commented stock `config.toml`. Used by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# kutty-site configuration
# ========================
# All settings are optional; values below are the defaults.
# Unknown keys cause an error.

[site]
name = "KuttyTeachers"
name_local = "കട്ടിടീച്ചേഴ്സ്"
tagline = "പാലക്കാട്ടിൽ നിന്ന്, ഹൃദയത്തിൽ നിന്ന്"
email = "contact@kuttyteachers.in"
location = "പാലക്കാട്, കേരളം"
year = "2026"

# Footer social icons. "#" keeps the icon without a destination.
[social]
facebook = "#"
instagram = "#"
youtube = "#"
whatsapp = "#"

# ---------------------------------------------------------------------------
# Data documents (resolved next to each page shell)
# ---------------------------------------------------------------------------
[data]
plants = "plants-data.json"
photos = "photos.json"
# A load that takes longer than this is reported as failed.
load_timeout_secs = 10

# ---------------------------------------------------------------------------
# Display
# ---------------------------------------------------------------------------
[display]
# Card text budgets, in characters.
description_chars = 100
care_chars = 25
truncation_marker = "..."
# Minimum horizontal swipe (px) that pages the photo lightbox.
swipe_threshold_px = 50.0
# Nav entry marked active when the page path is empty (site root).
default_page = "index.html"
# Delay (ms) before the `kt-loader` splash screen is hidden.
loader_hide_ms = 2000

# ---------------------------------------------------------------------------
# Navigation. Replaces the whole list when present.
# ---------------------------------------------------------------------------
[[nav]]
label = "🏠 വീട്"
href = "index.html"

[[nav]]
label = "📸 ഫോട്ടോഗ്രാഫി"
href = "photography.html"

[[nav]]
label = "📚 പഠനം"
href = "tutoring.html"

[[nav]]
label = "🎹 സംഗീതം"
href = "piano.html"

[[nav]]
label = "🌿 തോട്ടം"
href = "gardening.html"

[[nav]]
label = "ℹ️ ഞങ്ങളെക്കുറിച്ച്"
href = "about.html"

# [footer] and [labels] hold the footer columns and every interface
# string. Override individual keys as needed, e.g.:
#
# [labels]
# no_plants = "No plants in this category."
"##
}
