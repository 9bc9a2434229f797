//! Page assembly shared by the controllers.
//!
//! Every reachable view state is written as its own HTML file. An open
//! overlay is realised by driving an [`OverlayController`] against a
//! [`ShellSurface`], which renders into a copy of the page shell and turns
//! the scroll lock into a `body` class.
//!
//! Gestures that the static page cannot express as plain links (Escape,
//! arrow keys, swipes, backdrop clicks on shell-authored overlays) are
//! handled by `static/site.js`, which reads pre-computed targets from a
//! hidden `#kt-gestures` element. The same script hides the `#kt-loader`
//! splash screen after the configured delay.

use crate::config::DisplayConfig;
use crate::overlay::{Navigator, OverlayController, OverlayEvent, OverlayState, Surface};
use crate::shell::Shell;
use maud::{Markup, PreEscaped, html};
use tracing::debug;

const SITE_JS: &str = include_str!("../static/site.js");

/// Body class applied while an overlay holds the scroll lock.
pub const SCROLL_LOCK_CLASS: &str = "kt-scroll-lock";

/// One generated output file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub file_name: String,
    pub html: String,
}

/// Navigation targets for an open overlay, as relative hrefs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureTargets {
    pub close: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    /// Id of the element whose direct clicks dismiss the overlay.
    pub backdrop: Option<String>,
}

/// Page script plus, for an open overlay, its gesture targets.
pub fn script_markup(targets: Option<&GestureTargets>, display: &DisplayConfig) -> Markup {
    html! {
        @if let Some(t) = targets {
            div #kt-gestures hidden
                data-close=[t.close.as_deref()]
                data-prev=[t.prev.as_deref()]
                data-next=[t.next.as_deref()]
                data-backdrop=[t.backdrop.as_deref()]
                data-swipe-threshold=(display.swipe_threshold_px) {}
        }
        style { "body." (SCROLL_LOCK_CLASS) "{overflow:hidden}" }
        script data-loader-hide-ms=(display.loader_hide_ms) { (PreEscaped(SITE_JS)) }
    }
}

/// A [`Surface`] backed by a copy of the page shell.
pub struct ShellSurface<F>
where
    F: FnMut(&mut Shell, usize),
{
    shell: Shell,
    locked: bool,
    populate: F,
}

impl<F> ShellSurface<F>
where
    F: FnMut(&mut Shell, usize),
{
    pub fn new(shell: Shell, populate: F) -> Self {
        Self {
            shell,
            locked: false,
            populate,
        }
    }

    /// The rendered shell, with the scroll lock applied when held.
    pub fn finish(self) -> Shell {
        let mut shell = self.shell;
        if self.locked {
            if let Err(e) = shell.add_body_class(SCROLL_LOCK_CLASS) {
                debug!(error = %e, "page has no body to lock");
            }
        }
        shell
    }
}

impl<F> Surface for ShellSurface<F>
where
    F: FnMut(&mut Shell, usize),
{
    fn scroll_locked(&self) -> bool {
        self.locked
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn show(&mut self, index: usize) {
        (self.populate)(&mut self.shell, index);
    }

    // Each state page starts from a fresh shell, so there is nothing to undo.
    fn hide(&mut self) {}
}

/// Render the page for `Open(index)` starting from a closed overlay.
///
/// Returns `None` when the index addresses no record. The returned state
/// is the one actually reached, for computing prev/next targets.
pub fn render_open_state<F>(
    shell: Shell,
    navigator: Navigator,
    index: usize,
    populate: F,
) -> Option<(OverlayState, Shell)>
where
    F: FnMut(&mut Shell, usize),
{
    let mut controller = OverlayController::new(navigator, ShellSurface::new(shell, populate));
    let state = controller.dispatch(OverlayEvent::Open(index));
    state
        .is_open()
        .then(|| (state, controller.into_surface().finish()))
}

/// Output file name for a state of the page with file stem `stem`.
pub fn state_file(stem: &str, kind: &str, position: usize) -> String {
    format!("{stem}-{kind}-{}.html", position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><div id="slot"></div></body></html>"#;

    #[test]
    fn open_state_populates_and_locks() {
        let (state, shell) = render_open_state(
            Shell::new(PAGE),
            Navigator::modal(3),
            1,
            |shell, i| {
                shell.fill("slot", html! { span { "record " (i) } }).unwrap();
            },
        )
        .unwrap();
        assert_eq!(state, OverlayState::Open(1));
        let out = shell.into_string();
        assert!(out.contains("record 1"));
        assert!(out.contains(r#"<body class="kt-scroll-lock">"#));
    }

    #[test]
    fn open_state_for_missing_record_is_none() {
        let result = render_open_state(Shell::new(PAGE), Navigator::modal(2), 2, |_, _| {
            panic!("must not populate");
        });
        assert!(result.is_none());
    }

    #[test]
    fn script_carries_gesture_targets() {
        let targets = GestureTargets {
            close: Some("photography.html".into()),
            prev: None,
            next: Some("photography-photo-2.html".into()),
            backdrop: None,
        };
        let html = script_markup(Some(&targets), &DisplayConfig::default()).into_string();
        assert!(html.contains(r#"<div id="kt-gestures" hidden"#));
        assert!(html.contains(r#"data-close="photography.html""#));
        assert!(html.contains(r#"data-next="photography-photo-2.html""#));
        assert!(!html.contains("data-prev"));
        assert!(html.contains(r#"data-swipe-threshold="50""#));
        assert!(html.contains("<script "));
    }

    #[test]
    fn script_without_overlay_has_no_targets() {
        let html = script_markup(None, &DisplayConfig::default()).into_string();
        assert!(!html.contains(r#"id="kt-gestures""#));
        assert!(html.contains("kt-scroll-lock"));
    }

    #[test]
    fn script_carries_loader_delay() {
        let display = DisplayConfig {
            loader_hide_ms: 750,
            ..DisplayConfig::default()
        };
        let html = script_markup(None, &display).into_string();
        assert!(html.contains(r#"<script data-loader-hide-ms="750">"#));
        assert!(html.contains("kt-loader"));
    }

    #[test]
    fn state_file_is_one_based() {
        assert_eq!(state_file("gardening", "plant", 0), "gardening-plant-1.html");
        assert_eq!(state_file("photography", "photo", 9), "photography-photo-10.html");
    }
}
