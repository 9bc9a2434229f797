//! Photography page controller.
//!
//! Albums nest photos, but the lightbox pages through every photo of the
//! gallery as one sequence. [`FlatSequence`] is that sequence: positions
//! into the album list, rebuilt whenever the albums are replaced.
//!
//! ```text
//! albums:  [ a0: p0 p1 p2 ] [ a1: p0 p1 ]
//! flat:      0  1  2          3  4
//! offsets:   0                3
//! ```
//!
//! Output for a shell `photography.html` is the album list plus one
//! `photography-photo-N.html` per flat position, with the lightbox open.

use crate::config::{Labels, SiteConfig};
use crate::icons;
use crate::loader::Loaded;
use crate::media::{MediaContext, MediaSource, render_media};
use crate::overlay::{Navigator, OverlayState};
use crate::page::{GestureTargets, RenderedPage, render_open_state, script_markup, state_file};
use crate::shell::Shell;
use crate::types::{Album, Photo, PhotosDocument};
use maud::{Markup, html};
use tracing::info;

pub const ALBUMS_MOUNT: &str = "albums-container";
pub const LIGHTBOX_ID: &str = "kt-lightbox";

const DISABLED_ARROW: &str = "opacity:0.3";

/// One photo's position in the album list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatPhotoEntry {
    pub album: usize,
    pub photo: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatSequence {
    entries: Vec<FlatPhotoEntry>,
    offsets: Vec<usize>,
}

impl FlatSequence {
    pub fn flatten(albums: &[Album]) -> Self {
        let mut entries = Vec::new();
        let mut offsets = Vec::with_capacity(albums.len());
        for (a, album) in albums.iter().enumerate() {
            offsets.push(entries.len());
            entries.extend((0..album.photos.len()).map(|p| FlatPhotoEntry { album: a, photo: p }));
        }
        Self { entries, offsets }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<FlatPhotoEntry> {
        self.entries.get(index).copied()
    }

    /// Flat position of the first photo of album `album`.
    pub fn offset(&self, album: usize) -> Option<usize> {
        self.offsets.get(album).copied()
    }

    pub fn entries(&self) -> &[FlatPhotoEntry] {
        &self.entries
    }
}

/// Loaded albums and their flattened photo sequence.
#[derive(Debug, Default)]
pub struct Gallery {
    albums: Vec<Album>,
    flat: FlatSequence,
}

impl Gallery {
    pub fn new(doc: PhotosDocument) -> Self {
        let mut gallery = Self::default();
        gallery.replace(doc);
        gallery
    }

    /// Swap in a freshly loaded document, rebuilding the sequence.
    pub fn replace(&mut self, doc: PhotosDocument) {
        self.flat = FlatSequence::flatten(&doc.albums);
        self.albums = doc.albums;
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn flat(&self) -> &FlatSequence {
        &self.flat
    }

    pub fn entry(&self, index: usize) -> Option<(&Album, &Photo)> {
        let FlatPhotoEntry { album, photo } = self.flat.get(index)?;
        let album = self.albums.get(album)?;
        Some((album, album.photos.get(photo)?))
    }
}

#[derive(Debug, Clone)]
pub struct GalleryLinks {
    stem: String,
}

impl GalleryLinks {
    pub fn new(stem: &str) -> Self {
        Self {
            stem: stem.to_string(),
        }
    }

    pub fn base(&self) -> String {
        format!("{}.html", self.stem)
    }

    pub fn photo_href(&self, index: usize) -> String {
        state_file(&self.stem, "photo", index)
    }

    /// Where closing the lightbox lands: the list, scrolled to the album.
    pub fn close_href(&self, album: &Album) -> String {
        format!("{}#{}", self.base(), album_anchor(album))
    }
}

fn album_anchor(album: &Album) -> String {
    format!("album-{}", album.id)
}

fn photo_count(n: usize) -> String {
    format!("{n} {}", if n == 1 { "photo" } else { "photos" })
}

/// Every album, with `open` expanded. No albums renders the empty state.
pub fn render_albums(
    gallery: &Gallery,
    open: Option<usize>,
    links: &GalleryLinks,
    labels: &Labels,
) -> Markup {
    if gallery.albums().is_empty() {
        return render_empty(labels);
    }
    html! {
        @for (a, album) in gallery.albums().iter().enumerate() {
            (render_album(
                album,
                gallery.flat().offset(a).unwrap_or(0),
                open == Some(a),
                links,
                labels,
            ))
        }
    }
}

pub fn render_album(
    album: &Album,
    offset: usize,
    open: bool,
    links: &GalleryLinks,
    labels: &Labels,
) -> Markup {
    html! {
        details.album id=(album_anchor(album)) open[open] {
            summary.album-header {
                div.album-header-left {
                    img.album-cover-thumb src=(album.cover) alt="" loading="lazy";
                    div.album-meta {
                        div.album-date { (album.month) " " (album.year) " · " (album.location) }
                        div.album-title { (album.theme) }
                        div.album-title-en { (album.theme_en) }
                    }
                }
                div.album-header-right {
                    span.album-count { (photo_count(album.photos.len())) }
                    div.album-chevron { (icons::CHEVRON) }
                }
            }
            div.album-body {
                @for (p, photo) in album.photos.iter().enumerate() {
                    (render_photo_card(album, photo, links.photo_href(offset + p), labels))
                }
            }
        }
    }
}

pub fn render_photo_card(album: &Album, photo: &Photo, href: String, labels: &Labels) -> Markup {
    let chips = photo.settings.as_ref().map(|s| s.pairs()).unwrap_or_default();
    html! {
        a.photo-card href=(href) aria-label={ (photo.title) " · " (labels.click_to_view) } {
            div.photo-card-img-wrap {
                img src=(photo.card_src()) alt=(photo.title) loading="lazy";
                @if photo.has_video() {
                    div.photo-video-badge { (labels.video_badge) }
                }
                div.photo-card-overlay {
                    div.photo-card-overlay-hint { (icons::EXPAND) " " (labels.click_to_view) }
                }
            }
            div.photo-card-body {
                div.photo-card-location {
                    "📍 " (album.location) " · " (album.month) " " (album.year)
                }
                div.photo-card-title { (photo.title) }
                @if !chips.is_empty() {
                    div.photo-card-settings {
                        @for (_, value) in &chips {
                            span.setting-chip { (value) }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_empty(labels: &Labels) -> Markup {
    html! {
        div.empty-state {
            div.empty-state-icon { "📷" }
            p { (labels.no_photos) }
        }
    }
}

pub fn render_load_error(labels: &Labels) -> Markup {
    html! {
        div.empty-state {
            div.empty-state-icon { "⚠️" }
            p { (labels.photos_load_failed) }
            p.empty-state-hint style="font-size:0.85rem;margin-top:8px;opacity:0.7;" {
                (labels.photos_load_hint)
            }
        }
    }
}

/// The open lightbox on flat position `index`.
///
/// Arrows at either end of the sequence are dimmed and carry no link.
pub fn render_lightbox(
    gallery: &Gallery,
    index: usize,
    navigator: &Navigator,
    links: &GalleryLinks,
    labels: &Labels,
) -> Markup {
    let Some((album, photo)) = gallery.entry(index) else {
        return html! {};
    };
    let state = OverlayState::Open(index);
    let close = links.close_href(album);
    let prev = navigator.prev_of(state).map(|i| links.photo_href(i));
    let next = navigator.next_of(state).map(|i| links.photo_href(i));
    let settings = photo.settings.as_ref().map(|s| s.pairs()).unwrap_or_default();
    let media = MediaSource::resolve(photo.video.as_deref());

    html! {
        div.lightbox.open id=(LIGHTBOX_ID) role="dialog" aria-modal="true" aria-label="Photo viewer" {
            a.lightbox-backdrop id="lb-backdrop" href=(close) aria-label=(labels.close) {}
            div.lightbox-panel {
                div.lightbox-img-wrap {
                    img id="lb-img" src=(photo.src) alt=(photo.title);
                    (arrow(prev.as_deref(), "lb-arrow-prev", &labels.previous_photo, icons::ARROW_LEFT))
                    (arrow(next.as_deref(), "lb-arrow-next", &labels.next_photo, icons::ARROW_RIGHT))
                }
                div.lightbox-info id="lb-info" {
                    div {
                        div.lb-section-label {
                            "📍 " (album.location) " · " (album.month) " " (album.year)
                            " · " (index + 1) " / " (gallery.flat().len())
                        }
                        div.lb-title { (photo.title) }
                        @if let Some(title_en) = photo.title_en.as_deref().filter(|t| !t.is_empty()) {
                            div.lb-title-en { (title_en) }
                        }
                    }
                    div.lb-divider {}
                    div {
                        div.lb-section-label { (labels.photo_description) }
                        div.lb-description { (photo.description) }
                    }
                    div.lb-divider {}
                    div {
                        div.lb-section-label { (labels.camera) }
                        div.lb-camera-name {
                            (photo.camera.as_deref().filter(|c| !c.is_empty()).unwrap_or("—"))
                        }
                        @if let Some(lens) = photo.lens.as_deref().filter(|l| !l.is_empty()) {
                            div.lb-lens-name { (lens) }
                        }
                    }
                    @if !settings.is_empty() {
                        div {
                            div.lb-section-label { (labels.settings) }
                            div.lb-settings-grid {
                                @for (key, value) in &settings {
                                    div.lb-setting-item {
                                        div.lb-setting-key { (key) }
                                        div.lb-setting-val { (value) }
                                    }
                                }
                            }
                        }
                    }
                    @if !photo.composition.is_empty() {
                        div.lb-divider {}
                        div {
                            div.lb-section-label { (labels.composition) }
                            div.lb-composition-tags {
                                @for tag in &photo.composition {
                                    span.lb-comp-tag { (tag) }
                                }
                            }
                        }
                    }
                    div.lb-divider {}
                    div {
                        div.lb-section-label { (labels.video_heading) }
                        (render_media(&media, &photo.title, &labels.photos_video_hint, labels, MediaContext::Lightbox))
                    }
                }
                a.lb-close id="lb-close" href=(close) aria-label=(labels.close) { (icons::CLOSE) }
            }
        }
    }
}

fn arrow(href: Option<&str>, side: &str, label: &str, icon: maud::PreEscaped<&str>) -> Markup {
    html! {
        @match href {
            Some(href) => {
                a class={ "lb-arrow " (side) } href=(href) aria-label=(label) { (icon) }
            }
            None => {
                span class={ "lb-arrow " (side) } style=(DISABLED_ARROW) aria-disabled="true" aria-label=(label) {
                    (icon)
                }
            }
        }
    }
}

/// Render the album list page and one lightbox page per photo.
pub fn render_pages(
    shell: &Shell,
    loaded: Loaded<PhotosDocument>,
    config: &SiteConfig,
    stem: &str,
) -> Vec<RenderedPage> {
    let labels = &config.labels;
    let threshold = config.display.swipe_threshold_px;
    let links = GalleryLinks::new(stem);

    let gallery = match loaded {
        Loaded::Ready(doc) => Gallery::new(doc),
        Loaded::Failed(_) => {
            let mut page = shell.clone();
            page.fill_if_present(ALBUMS_MOUNT, render_load_error(labels));
            page.append_to_body(script_markup(None, &config.display));
            return vec![RenderedPage {
                file_name: links.base(),
                html: page.into_string(),
            }];
        }
    };

    let mut pages = Vec::with_capacity(gallery.flat().len() + 1);
    let mut base = shell.clone();
    base.fill_if_present(ALBUMS_MOUNT, render_albums(&gallery, Some(0), &links, labels));
    base.append_to_body(script_markup(None, &config.display));
    pages.push(RenderedPage {
        file_name: links.base(),
        html: base.into_string(),
    });

    let navigator = Navigator::lightbox(gallery.flat().len(), threshold);
    for (index, entry) in gallery.flat().entries().iter().enumerate() {
        let mut page = shell.clone();
        page.fill_if_present(
            ALBUMS_MOUNT,
            render_albums(&gallery, Some(entry.album), &links, labels),
        );
        let opened = render_open_state(page, navigator, index, |page, i| {
            page.append_to_body(render_lightbox(&gallery, i, &navigator, &links, labels));
        });
        let Some((state, mut page)) = opened else {
            continue;
        };
        let targets = GestureTargets {
            close: Some(links.close_href(&gallery.albums()[entry.album])),
            prev: navigator.prev_of(state).map(|i| links.photo_href(i)),
            next: navigator.next_of(state).map(|i| links.photo_href(i)),
            backdrop: None,
        };
        page.append_to_body(script_markup(Some(&targets), &config.display));
        pages.push(RenderedPage {
            file_name: links.photo_href(index),
            html: page.into_string(),
        });
    }

    info!(
        page = %links.base(),
        albums = gallery.albums().len(),
        photos = gallery.flat().len(),
        files = pages.len(),
        "rendered photography page"
    );
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;
    use crate::test_helpers::*;

    fn links() -> GalleryLinks {
        GalleryLinks::new("photography")
    }

    fn lightbox_html(gallery: &Gallery, index: usize) -> String {
        let nav = Navigator::lightbox(gallery.flat().len(), 50.0);
        render_lightbox(gallery, index, &nav, &links(), &Labels::default()).into_string()
    }

    #[test]
    fn flatten_computes_offsets() {
        let flat = FlatSequence::flatten(&sample_photos().albums);
        assert_eq!(flat.len(), 5);
        assert_eq!(flat.offset(0), Some(0));
        assert_eq!(flat.offset(1), Some(3));
        assert_eq!(flat.get(3), Some(FlatPhotoEntry { album: 1, photo: 0 }));
        assert_eq!(flat.get(5), None);
    }

    #[test]
    fn flatten_handles_empty_albums() {
        let mut doc = sample_photos();
        doc.albums[0].photos.clear();
        let flat = FlatSequence::flatten(&doc.albums);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.offset(1), Some(0));
        assert!(FlatSequence::flatten(&[]).is_empty());
    }

    #[test]
    fn replace_rebuilds_sequence() {
        let mut gallery = Gallery::new(sample_photos());
        gallery.replace(PhotosDocument::default());
        assert!(gallery.flat().is_empty());
        assert!(gallery.entry(0).is_none());
    }

    #[test]
    fn no_albums_renders_single_empty_state() {
        let gallery = Gallery::new(PhotosDocument::default());
        let html = render_albums(&gallery, Some(0), &links(), &Labels::default()).into_string();
        assert_eq!(html.matches("empty-state\"").count(), 1);
        assert!(!html.contains("album"));
    }

    #[test]
    fn only_requested_album_is_open() {
        let gallery = Gallery::new(sample_photos());
        let html = render_albums(&gallery, Some(1), &links(), &Labels::default()).into_string();
        assert_eq!(html.matches(" open>").count(), 1);
        assert!(html.contains(r#"<details class="album" id="album-kerala-birds" open>"#));
    }

    #[test]
    fn album_count_pluralises() {
        let mut doc = sample_photos();
        doc.albums[1].photos.truncate(1);
        let gallery = Gallery::new(doc);
        let html = render_albums(&gallery, None, &links(), &Labels::default()).into_string();
        assert!(html.contains("3 photos"));
        assert!(html.contains("1 photo<"));
    }

    #[test]
    fn cards_link_by_flat_index() {
        let gallery = Gallery::new(sample_photos());
        let html = render_albums(&gallery, Some(0), &links(), &Labels::default()).into_string();
        for n in 1..=5 {
            assert!(html.contains(&format!(r#"href="photography-photo-{n}.html""#)));
        }
        assert!(!html.contains("photography-photo-6.html"));
    }

    #[test]
    fn card_prefers_thumbnail_and_shows_only_present_settings() {
        let gallery = Gallery::new(sample_photos());
        let (album, photo) = gallery.entry(0).unwrap();
        let html =
            render_photo_card(album, photo, "x.html".into(), &Labels::default()).into_string();
        assert!(html.contains(r#"src="images/sunrise-thumb.jpg""#));
        assert_eq!(html.matches("setting-chip").count(), 2);
        assert!(html.contains("photo-video-badge"));
    }

    #[test]
    fn lightbox_dims_arrows_at_bounds() {
        let gallery = Gallery::new(sample_photos());

        let first = lightbox_html(&gallery, 0);
        assert!(first.contains("1 / 5"));
        assert!(first.contains(r#"<span class="lb-arrow lb-arrow-prev" style="opacity:0.3""#));
        assert!(first.contains(r#"href="photography-photo-2.html""#));

        let last = lightbox_html(&gallery, 4);
        assert!(last.contains("5 / 5"));
        assert!(last.contains(r#"<span class="lb-arrow lb-arrow-next" style="opacity:0.3""#));
        assert!(last.contains(r#"href="photography-photo-4.html""#));
    }

    #[test]
    fn lightbox_shows_camera_fallback_and_settings() {
        let gallery = Gallery::new(sample_photos());
        let with_camera = lightbox_html(&gallery, 0);
        assert!(with_camera.contains("Canon EOS R6"));
        assert_eq!(with_camera.matches("lb-setting-item").count(), 2);
        assert!(with_camera.contains("lb-comp-tag"));
        assert!(with_camera.contains("https://www.youtube.com/embed/sun1"));

        let bare = lightbox_html(&gallery, 1);
        assert!(bare.contains(r#"<div class="lb-camera-name">—</div>"#));
        assert!(!bare.contains("lb-settings-grid"));
        assert!(!bare.contains("lb-lens-name"));
        assert!(bare.contains("lb-video-placeholder"));
    }

    #[test]
    fn lightbox_close_returns_to_album() {
        let gallery = Gallery::new(sample_photos());
        let html = lightbox_html(&gallery, 3);
        assert!(html.contains(r#"href="photography.html#album-kerala-birds""#));
    }

    #[test]
    fn render_pages_writes_one_page_per_photo() {
        let shell = Shell::new(PHOTOGRAPHY_SHELL);
        let pages = render_pages(
            &shell,
            Loaded::Ready(sample_photos()),
            &SiteConfig::default(),
            "photography",
        );
        let names: Vec<&str> = pages.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "photography.html",
                "photography-photo-1.html",
                "photography-photo-2.html",
                "photography-photo-3.html",
                "photography-photo-4.html",
                "photography-photo-5.html",
            ]
        );

        assert!(!pages[0].html.contains(r#"id="kt-lightbox""#));

        let first = &pages[1].html;
        assert!(first.contains(r#"id="kt-lightbox""#));
        assert!(first.contains(r#"<body class="kt-scroll-lock">"#));
        assert!(first.contains(r#"data-next="photography-photo-2.html""#));
        assert!(!first.contains("data-prev="));

        let fourth = &pages[4].html;
        assert!(fourth.contains(r#"data-close="photography.html#album-kerala-birds""#));
        assert!(fourth.contains(r#"id="album-kerala-birds" open>"#));
    }

    #[test]
    fn failed_load_renders_error_state() {
        let shell = Shell::new(PHOTOGRAPHY_SHELL);
        let config = SiteConfig::default();
        let loaded = Loaded::Failed(LoadError::Timeout {
            path: "photos.json".into(),
            timeout: std::time::Duration::from_secs(1),
        });
        let pages = render_pages(&shell, loaded, &config, "photography");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].html.contains(&config.labels.photos_load_failed));
        assert!(pages[0].html.contains(&config.labels.photos_load_hint));
    }

    #[test]
    fn photo_text_is_escaped() {
        let mut doc = sample_photos();
        doc.albums[0].photos[0].title = "<script>x</script>".into();
        doc.albums[0].location = "<b>".into();
        let gallery = Gallery::new(doc);
        let html = format!(
            "{}{}",
            render_albums(&gallery, Some(0), &links(), &Labels::default()).into_string(),
            lightbox_html(&gallery, 0)
        );
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
    }
}
