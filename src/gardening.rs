//! Gardening page controller.
//!
//! Loads the plants document, renders the category filter bar and the plant
//! grid, and produces one modal page per plant.
//!
//! ## Mount Points
//!
//! | Id | Content |
//! |----|---------|
//! | `category-filter` | "all" control plus one control per category |
//! | `plants-grid` | plant cards, the "no plants" placeholder, or the load error |
//! | `plant-modal` | modal root (backdrop); gets `active` while open |
//! | `modal-body` | expanded plant view |
//!
//! ## Output Files
//!
//! For a shell `gardening.html`:
//!
//! ```text
//! gardening.html               # filter = all
//! gardening-category-1.html    # filter = first category
//! gardening-plant-1.html       # modal open on the first plant
//! ```

use crate::config::{Labels, SiteConfig};
use crate::loader::Loaded;
use crate::media::{MediaContext, MediaSource, render_media};
use crate::overlay::Navigator;
use crate::page::{GestureTargets, RenderedPage, render_open_state, script_markup, state_file};
use crate::shell::Shell;
use crate::types::{ALL_CATEGORIES, Category, Plant, PlantsDocument};
use maud::{Markup, html};
use tracing::{debug, info, warn};
use unicode_segmentation::UnicodeSegmentation;

pub const FILTER_MOUNT: &str = "category-filter";
pub const GRID_MOUNT: &str = "plants-grid";
pub const MODAL_ROOT: &str = "plant-modal";
pub const MODAL_BODY_MOUNT: &str = "modal-body";

const FALLBACK_EMOJI: &str = "🌿";
const FULL_WIDTH: &str = "text-align:center;padding:40px;grid-column:1/-1;";

/// Active category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn id(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(id) => id,
        }
    }

    pub fn matches(&self, plant: &Plant) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(id) => plant.category == *id,
        }
    }
}

/// Loaded plants plus the current filter.
#[derive(Debug, Default)]
pub struct GardenState {
    categories: Vec<Category>,
    plants: Vec<Plant>,
    current: CategoryFilter,
}

impl GardenState {
    pub fn new(doc: PlantsDocument) -> Self {
        let mut state = Self::default();
        state.replace(doc);
        state
    }

    /// Swap in a freshly loaded document. The filter resets to "all".
    ///
    /// Categories whose id collides with the "all" sentinel are dropped.
    pub fn replace(&mut self, doc: PlantsDocument) {
        self.categories = doc
            .categories
            .into_iter()
            .filter(|c| {
                let reserved = c.id == ALL_CATEGORIES;
                if reserved {
                    warn!(category = %c.name, id = %c.id, "skipping category with reserved id");
                }
                !reserved
            })
            .collect();
        self.plants = doc.plants;
        self.current = CategoryFilter::All;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn current(&self) -> &CategoryFilter {
        &self.current
    }

    /// Select `id` (or `"all"`). Unknown ids leave the filter unchanged.
    ///
    /// Returns whether the filter was applied.
    pub fn filter_by_category(&mut self, id: &str) -> bool {
        if id == ALL_CATEGORIES {
            self.current = CategoryFilter::All;
            return true;
        }
        if self.categories.iter().any(|c| c.id == id) {
            self.current = CategoryFilter::Category(id.to_string());
            true
        } else {
            debug!(category = id, "ignoring unknown category filter");
            false
        }
    }

    /// Plants passing the current filter, in document order.
    pub fn visible_plants(&self) -> impl Iterator<Item = (usize, &Plant)> {
        self.plants
            .iter()
            .enumerate()
            .filter(|(_, p)| self.current.matches(p))
    }

    pub fn category_of(&self, plant: &Plant) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == plant.category)
    }

    pub fn emoji_for(&self, plant: &Plant) -> &str {
        self.category_of(plant)
            .map_or(FALLBACK_EMOJI, |c| c.emoji.as_str())
    }

    pub fn plant_index(&self, id: &str) -> Option<usize> {
        self.plants.iter().position(|p| p.id == id)
    }

    /// Every selectable filter: "all" first, then categories in order.
    pub fn filters(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(
                self.categories
                    .iter()
                    .map(|c| CategoryFilter::Category(c.id.clone())),
            )
            .collect()
    }
}

/// Cut `text` to `max` user-perceived characters (grapheme clusters),
/// appending `marker` when anything was cut. Malayalam conjuncts count as
/// one character and are never split after the virama.
pub fn truncate(text: &str, max: usize, marker: &str) -> String {
    match text.grapheme_indices(true).nth(max) {
        Some((cut, _)) => format!("{}{}", &text[..cut], marker),
        None => text.to_string(),
    }
}

/// Output names for the state pages of one gardening shell.
#[derive(Debug, Clone)]
pub struct GardenLinks {
    stem: String,
    modal: bool,
}

impl GardenLinks {
    pub fn new(stem: &str, modal: bool) -> Self {
        Self {
            stem: stem.to_string(),
            modal,
        }
    }

    pub fn base(&self) -> String {
        format!("{}.html", self.stem)
    }

    pub fn filter_href(&self, state: &GardenState, filter: &CategoryFilter) -> String {
        match filter {
            CategoryFilter::All => self.base(),
            CategoryFilter::Category(id) => state
                .categories()
                .iter()
                .position(|c| c.id == *id)
                .map_or_else(|| self.base(), |p| state_file(&self.stem, "category", p)),
        }
    }

    /// Modal page for the plant at `index`, when the shell can show one.
    pub fn plant_href(&self, index: usize) -> Option<String> {
        self.modal.then(|| state_file(&self.stem, "plant", index))
    }
}

pub fn render_filter_bar(state: &GardenState, links: &GardenLinks, labels: &Labels) -> Markup {
    html! {
        @for filter in state.filters() {
            @let active = filter == *state.current();
            a.category-btn.active[active] href=(links.filter_href(state, &filter)) {
                @match &filter {
                    CategoryFilter::All => { (labels.all_plants) }
                    CategoryFilter::Category(id) => {
                        @if let Some(cat) = state.categories().iter().find(|c| c.id == *id) {
                            (cat.emoji) " " (cat.name)
                        }
                    }
                }
            }
        }
    }
}

pub fn render_grid(state: &GardenState, links: &GardenLinks, config: &SiteConfig) -> Markup {
    let cards: Vec<Markup> = state
        .visible_plants()
        .map(|(i, plant)| render_card(state, plant, links.plant_href(i), config))
        .collect();
    html! {
        @if cards.is_empty() {
            p.grid-message style=(FULL_WIDTH) { (config.labels.no_plants) }
        } @else {
            @for card in cards {
                (card)
            }
        }
    }
}

pub fn render_load_error(labels: &Labels) -> Markup {
    html! {
        p.grid-message.grid-error style=(FULL_WIDTH) { (labels.plants_load_failed) }
    }
}

pub fn render_card(
    state: &GardenState,
    plant: &Plant,
    modal_href: Option<String>,
    config: &SiteConfig,
) -> Markup {
    let display = &config.display;
    let labels = &config.labels;
    let emoji = state.emoji_for(plant);
    let care = |text: &str| truncate(text, display.care_chars, &display.truncation_marker);
    html! {
        div.plant-card {
            div.plant-images {
                @if let Some(image) = plant.images.first() {
                    img.plant-image src=(image) alt=(plant.name) loading="lazy";
                } @else {
                    div.plant-image-placeholder { (emoji) }
                }
                @if plant.has_video() {
                    div.plant-video-badge { (labels.video_badge) }
                }
            }
            div.plant-info {
                div.plant-header {
                    span.plant-emoji { (emoji) }
                    span.plant-name { (plant.name) }
                }
                div.plant-scientific { (plant.scientific_name) }
                p.plant-description {
                    (truncate(&plant.description, display.description_chars, &display.truncation_marker))
                }
                div.care-grid {
                    @for (label, value) in [
                        (&labels.sunlight, &plant.sunlight),
                        (&labels.watering, &plant.watering),
                        (&labels.climate, &plant.climate),
                        (&labels.soil, &plant.soil),
                    ] {
                        div.care-item {
                            span.care-label { (label) }
                            span.care-value { (care(value.as_str())) }
                        }
                    }
                }
                div.plant-footer {
                    span.harvest-time { "⏱️ " (plant.harvest_time) }
                    @if let Some(href) = modal_href {
                        a.read-more href=(href) { (labels.read_more) }
                    }
                }
            }
        }
    }
}

/// Expanded plant view shown inside the modal.
pub fn render_modal_body(
    state: &GardenState,
    plant: &Plant,
    close_href: &str,
    labels: &Labels,
) -> Markup {
    let media = MediaSource::resolve(plant.video.as_deref());
    html! {
        a.modal-close href=(close_href) aria-label=(labels.close) { "✕" }
        div.modal-header {
            span.modal-emoji { (state.emoji_for(plant)) }
            div {
                h2.modal-title { (plant.name) }
                p.modal-scientific { (plant.scientific_name) }
            }
        }
        @if !plant.images.is_empty() {
            div.modal-images {
                @for image in &plant.images {
                    img.modal-image src=(image) alt=(plant.name) loading="lazy";
                }
            }
        }
        (modal_section(&labels.description, &plant.description))
        div.modal-care-grid {
            (modal_section(&labels.sunlight, &plant.sunlight))
            (modal_section(&labels.watering, &plant.watering))
            (modal_section(&labels.climate, &plant.climate))
            (modal_section(&labels.soil, &plant.soil))
        }
        (modal_section(&labels.harvest_time, &plant.harvest_time))
        div.modal-section {
            h3.modal-section-title { (labels.video_heading) }
            (render_media(&media, &plant.name, &labels.plants_video_hint, labels, MediaContext::Modal))
        }
    }
}

fn modal_section(title: &str, content: &str) -> Markup {
    html! {
        div.modal-section {
            h3.modal-section-title { (title) }
            p.modal-section-content { (content) }
        }
    }
}

/// Render every state page of a gardening shell.
///
/// A failed load yields the base page with the error message in the grid.
/// Modal pages are produced only when the shell carries `modal-body`.
pub fn render_pages(
    shell: &Shell,
    loaded: Loaded<PlantsDocument>,
    config: &SiteConfig,
    stem: &str,
) -> Vec<RenderedPage> {
    let links = GardenLinks::new(stem, shell.has_mount(MODAL_BODY_MOUNT));

    let doc = match loaded {
        Loaded::Ready(doc) => doc,
        Loaded::Failed(_) => {
            let mut page = shell.clone();
            page.fill_if_present(GRID_MOUNT, render_load_error(&config.labels));
            page.append_to_body(script_markup(None, &config.display));
            return vec![RenderedPage {
                file_name: links.base(),
                html: page.into_string(),
            }];
        }
    };

    let mut state = GardenState::new(doc);
    let mut pages = Vec::new();

    for filter in state.filters() {
        state.filter_by_category(filter.id());
        let mut page = list_page(shell, &state, &links, config);
        page.append_to_body(script_markup(None, &config.display));
        pages.push(RenderedPage {
            file_name: links.filter_href(&state, &filter),
            html: page.into_string(),
        });
    }

    state.filter_by_category(ALL_CATEGORIES);
    let base = list_page(shell, &state, &links, config);
    let navigator = Navigator::modal(state.plants().len());
    let close = links.base();
    for index in 0..state.plants().len() {
        let Some(file_name) = links.plant_href(index) else {
            break;
        };
        let opened = render_open_state(base.clone(), navigator, index, |page, i| {
            let plant = &state.plants()[i];
            page.fill_if_present(
                MODAL_BODY_MOUNT,
                render_modal_body(&state, plant, &close, &config.labels),
            );
            if let Err(e) = page.add_class(MODAL_ROOT, "active") {
                debug!(error = %e, "modal root missing");
            }
        });
        if let Some((_, mut page)) = opened {
            let targets = GestureTargets {
                close: Some(close.clone()),
                backdrop: Some(MODAL_ROOT.to_string()),
                ..Default::default()
            };
            page.append_to_body(script_markup(Some(&targets), &config.display));
            pages.push(RenderedPage {
                file_name,
                html: page.into_string(),
            });
        }
    }

    info!(
        page = %links.base(),
        plants = state.plants().len(),
        categories = state.categories().len(),
        files = pages.len(),
        "rendered gardening page"
    );
    pages
}

fn list_page(shell: &Shell, state: &GardenState, links: &GardenLinks, config: &SiteConfig) -> Shell {
    let mut page = shell.clone();
    page.fill_if_present(FILTER_MOUNT, render_filter_bar(state, links, &config.labels));
    page.fill_if_present(GRID_MOUNT, render_grid(state, links, config));
    page
}
