//! Detail overlay state machine (plant modal, photo lightbox).
//!
//! The overlay is either [`OverlayState::Closed`] or open on one record,
//! addressed by its index in the controller's sequence. Transitions are a
//! pure function of `(state, event)` given a [`Navigator`] that knows the
//! sequence length and whether paging is allowed:
//!
//! ```text
//!            Open(i), i < len
//!   Closed ─────────────────────▶ Open(i) ──┐ Next / Prev (clamped)
//!     ▲                             │  ▲    │
//!     └─ Close / Escape / Backdrop ─┘  └────┘
//! ```
//!
//! Side effects live in [`OverlayController`], which applies the reducer and
//! then syncs the new state onto a [`Surface`]. The surface owns the page's
//! scroll lock: opening saves the current flag and locks, and every close
//! path restores the saved flag.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(usize),
}

impl OverlayState {
    pub fn index(self) -> Option<usize> {
        match self {
            OverlayState::Closed => None,
            OverlayState::Open(i) => Some(i),
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, OverlayState::Open(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayEvent {
    Open(usize),
    Close,
    Next,
    Prev,
    BackdropClick,
    Key(Key),
    /// Touch gesture, horizontal client coordinates at start and end.
    Swipe { start_x: f32, end_x: f32 },
}

/// Sequence bounds and paging policy for one overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigator {
    pub len: usize,
    pub paging: bool,
    pub swipe_threshold: f32,
}

impl Navigator {
    /// A modal: opens on any record, no prev/next.
    pub fn modal(len: usize) -> Self {
        Self {
            len,
            paging: false,
            swipe_threshold: f32::INFINITY,
        }
    }

    /// A lightbox: pages through the sequence by arrows, keys and swipes.
    pub fn lightbox(len: usize, swipe_threshold: f32) -> Self {
        Self {
            len,
            paging: true,
            swipe_threshold,
        }
    }

    pub fn reduce(&self, state: OverlayState, event: OverlayEvent) -> OverlayState {
        match event {
            OverlayEvent::Open(i) if i < self.len => OverlayState::Open(i),
            OverlayEvent::Open(i) => {
                debug!(index = i, len = self.len, "ignoring open of missing record");
                state
            }
            OverlayEvent::Close | OverlayEvent::BackdropClick | OverlayEvent::Key(Key::Escape) => {
                OverlayState::Closed
            }
            OverlayEvent::Next | OverlayEvent::Key(Key::ArrowRight) => self.step(state, true),
            OverlayEvent::Prev | OverlayEvent::Key(Key::ArrowLeft) => self.step(state, false),
            OverlayEvent::Key(Key::Other) => state,
            OverlayEvent::Swipe { start_x, end_x } => {
                let diff = start_x - end_x;
                if diff.abs() > self.swipe_threshold {
                    self.step(state, diff > 0.0)
                } else {
                    state
                }
            }
        }
    }

    fn step(&self, state: OverlayState, forward: bool) -> OverlayState {
        match state {
            OverlayState::Open(i) if self.paging => {
                if forward && i + 1 < self.len {
                    OverlayState::Open(i + 1)
                } else if !forward && i > 0 {
                    OverlayState::Open(i - 1)
                } else {
                    state
                }
            }
            _ => state,
        }
    }

    /// Index reached by `Prev` from `state`, if it moves.
    pub fn prev_of(&self, state: OverlayState) -> Option<usize> {
        self.moved(state, OverlayEvent::Prev)
    }

    /// Index reached by `Next` from `state`, if it moves.
    pub fn next_of(&self, state: OverlayState) -> Option<usize> {
        self.moved(state, OverlayEvent::Next)
    }

    fn moved(&self, state: OverlayState, event: OverlayEvent) -> Option<usize> {
        let next = self.reduce(state, event);
        (next != state).then_some(next).and_then(OverlayState::index)
    }
}

/// Display target an overlay state is synced onto.
pub trait Surface {
    fn scroll_locked(&self) -> bool;
    fn set_scroll_locked(&mut self, locked: bool);
    /// Populate and reveal the overlay for the record at `index`.
    fn show(&mut self, index: usize);
    fn hide(&mut self);
}

/// Owns an overlay's state and keeps a [`Surface`] in step with it.
pub struct OverlayController<S: Surface> {
    navigator: Navigator,
    state: OverlayState,
    saved_lock: Option<bool>,
    surface: S,
}

impl<S: Surface> OverlayController<S> {
    pub fn new(navigator: Navigator, surface: S) -> Self {
        Self {
            navigator,
            state: OverlayState::Closed,
            saved_lock: None,
            surface,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn dispatch(&mut self, event: OverlayEvent) -> OverlayState {
        let next = self.navigator.reduce(self.state, event);
        self.sync(next);
        next
    }

    fn sync(&mut self, next: OverlayState) {
        match (self.state, next) {
            (_, OverlayState::Open(i)) => {
                if self.saved_lock.is_none() {
                    self.saved_lock = Some(self.surface.scroll_locked());
                }
                if self.state != next {
                    self.surface.show(i);
                }
                self.surface.set_scroll_locked(true);
            }
            (OverlayState::Open(_), OverlayState::Closed) => {
                self.surface.hide();
                let restored = self.saved_lock.take().unwrap_or(false);
                self.surface.set_scroll_locked(restored);
            }
            (OverlayState::Closed, OverlayState::Closed) => {}
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        locked: bool,
        shown: Vec<usize>,
        hides: usize,
    }

    impl Surface for RecordingSurface {
        fn scroll_locked(&self) -> bool {
            self.locked
        }
        fn set_scroll_locked(&mut self, locked: bool) {
            self.locked = locked;
        }
        fn show(&mut self, index: usize) {
            self.shown.push(index);
        }
        fn hide(&mut self) {
            self.hides += 1;
        }
    }

    fn lightbox(len: usize) -> Navigator {
        Navigator::lightbox(len, 50.0)
    }

    #[test]
    fn next_at_last_index_is_noop() {
        let nav = lightbox(3);
        assert_eq!(
            nav.reduce(OverlayState::Open(2), OverlayEvent::Next),
            OverlayState::Open(2)
        );
    }

    #[test]
    fn prev_at_first_index_is_noop() {
        let nav = lightbox(3);
        assert_eq!(
            nav.reduce(OverlayState::Open(0), OverlayEvent::Prev),
            OverlayState::Open(0)
        );
    }

    #[test]
    fn arrows_step_within_bounds() {
        let nav = lightbox(3);
        let state = nav.reduce(OverlayState::Open(0), OverlayEvent::Key(Key::ArrowRight));
        assert_eq!(state, OverlayState::Open(1));
        let state = nav.reduce(state, OverlayEvent::Key(Key::ArrowLeft));
        assert_eq!(state, OverlayState::Open(0));
    }

    #[test]
    fn paging_ignored_when_closed() {
        let nav = lightbox(3);
        assert_eq!(
            nav.reduce(OverlayState::Closed, OverlayEvent::Next),
            OverlayState::Closed
        );
    }

    #[test]
    fn modal_does_not_page() {
        let nav = Navigator::modal(3);
        assert_eq!(
            nav.reduce(OverlayState::Open(1), OverlayEvent::Key(Key::ArrowRight)),
            OverlayState::Open(1)
        );
    }

    #[test]
    fn open_missing_record_is_ignored() {
        let nav = lightbox(2);
        assert_eq!(
            nav.reduce(OverlayState::Closed, OverlayEvent::Open(2)),
            OverlayState::Closed
        );
        assert_eq!(
            nav.reduce(OverlayState::Open(1), OverlayEvent::Open(7)),
            OverlayState::Open(1)
        );
        assert_eq!(
            Navigator::modal(0).reduce(OverlayState::Closed, OverlayEvent::Open(0)),
            OverlayState::Closed
        );
    }

    #[test]
    fn open_from_open_switches_record() {
        let nav = Navigator::modal(3);
        assert_eq!(
            nav.reduce(OverlayState::Open(0), OverlayEvent::Open(2)),
            OverlayState::Open(2)
        );
    }

    #[test]
    fn close_is_idempotent() {
        let nav = lightbox(2);
        assert_eq!(
            nav.reduce(OverlayState::Closed, OverlayEvent::Close),
            OverlayState::Closed
        );
    }

    #[test]
    fn swipe_direction_follows_displacement_sign() {
        let nav = lightbox(3);
        let open = OverlayState::Open(1);
        let left = OverlayEvent::Swipe { start_x: 300.0, end_x: 200.0 };
        let right = OverlayEvent::Swipe { start_x: 200.0, end_x: 300.0 };
        assert_eq!(nav.reduce(open, left), OverlayState::Open(2));
        assert_eq!(nav.reduce(open, right), OverlayState::Open(0));
    }

    #[test]
    fn short_swipe_is_ignored() {
        let nav = lightbox(3);
        let open = OverlayState::Open(1);
        let swipe = OverlayEvent::Swipe { start_x: 100.0, end_x: 50.0 };
        assert_eq!(nav.reduce(open, swipe), open);
    }

    #[test]
    fn prev_next_targets() {
        let nav = lightbox(3);
        assert_eq!(nav.prev_of(OverlayState::Open(0)), None);
        assert_eq!(nav.next_of(OverlayState::Open(0)), Some(1));
        assert_eq!(nav.prev_of(OverlayState::Open(2)), Some(1));
        assert_eq!(nav.next_of(OverlayState::Open(2)), None);
        assert_eq!(nav.next_of(OverlayState::Closed), None);
    }

    #[test]
    fn key_from_dom_names() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_dom("Enter"), Key::Other);
    }

    #[test]
    fn every_dismissal_restores_scroll_lock() {
        for dismissal in [
            OverlayEvent::Close,
            OverlayEvent::BackdropClick,
            OverlayEvent::Key(Key::Escape),
        ] {
            for initially_locked in [false, true] {
                let surface = RecordingSurface {
                    locked: initially_locked,
                    ..Default::default()
                };
                let mut controller = OverlayController::new(lightbox(3), surface);
                controller.dispatch(OverlayEvent::Open(0));
                assert!(controller.surface().scroll_locked());
                controller.dispatch(OverlayEvent::Next);
                controller.dispatch(dismissal);
                assert_eq!(controller.state(), OverlayState::Closed);
                assert_eq!(controller.surface().scroll_locked(), initially_locked);
            }
        }
    }

    #[test]
    fn controller_shows_each_new_index_once() {
        let mut controller = OverlayController::new(lightbox(2), RecordingSurface::default());
        controller.dispatch(OverlayEvent::Open(0));
        controller.dispatch(OverlayEvent::Next);
        controller.dispatch(OverlayEvent::Next);
        controller.dispatch(OverlayEvent::Close);
        controller.dispatch(OverlayEvent::Close);
        let surface = controller.into_surface();
        assert_eq!(surface.shown, vec![0, 1]);
        assert_eq!(surface.hides, 1);
        assert!(!surface.locked);
    }

    #[test]
    fn ignored_open_leaves_surface_untouched() {
        let mut controller = OverlayController::new(lightbox(1), RecordingSurface::default());
        controller.dispatch(OverlayEvent::Open(5));
        let surface = controller.into_surface();
        assert!(surface.shown.is_empty());
        assert!(!surface.locked);
    }
}
