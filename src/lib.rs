//! # Kutty Site
//!
//! Renders the dynamic parts of the KuttyTeachers static site: the gardening
//! guide, the photo gallery, and the navigation and footer shared by every
//! page. Pages are hand-written HTML *shells*; data comes from two JSON
//! documents next to them.
//!
//! # Architecture: Shell → State Pages
//!
//! ```text
//! site/*.html  ──▶  chrome::inject  ──▶  controller  ──▶  dist/*.html
//!   (shells)         (nav, footer)     (one page per view state)
//! ```
//!
//! Each controller follows the same shape: a loader reads its document once,
//! a renderer turns records into markup for the shell's mount points, and an
//! overlay (plant modal, photo lightbox) is driven through a small state
//! machine. Every reachable view state is written as its own file, so the
//! generated site needs nothing beyond a file server and a short embedded
//! script for keyboard and touch gestures.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Plant and photo documents as read from JSON |
//! | [`loader`] | One-shot, time-bounded document loading |
//! | [`shell`] | Mount point lookup and filling in page shells |
//! | [`chrome`] | Shared navigation, mobile drawer and footer |
//! | [`overlay`] | `Closed`/`Open(i)` reducer and the scroll-lock [`overlay::Surface`] |
//! | [`media`] | YouTube embed, native video or placeholder for a record |
//! | [`page`] | State page assembly, gesture targets, embedded script |
//! | [`gardening`] | Category filter, plant grid, plant modal |
//! | [`photography`] | Album list, flattened photo sequence, lightbox |
//! | [`icons`] | Inline SVG icons |
//! | [`generate`] | Source walk, per-shell rendering, asset copying |
//! | [`output`] | CLI output formatting for `build` and `check` |
//!
//! # Design Decisions
//!
//! ## Static State Pages
//!
//! A filter selection or an open overlay is a URL, not in-memory page
//! state. `gardening-category-2.html` is the grid filtered to the second
//! category; `photography-photo-4.html` is the gallery with the lightbox
//! open on the fourth photo. Links between states are plain anchors, and
//! the embedded script only maps Escape, arrow keys and swipes onto links
//! computed at build time.
//!
//! ## Maud for Markup
//!
//! All fragments are built with [Maud](https://maud.lambda.xyz/), so every
//! string from the JSON documents or the config is escaped on interpolation.
//! Only the inline SVG icons and the page script are inserted pre-escaped.
//!
//! ## Missing Mounts Are No-Ops
//!
//! Controllers are shared across pages that carry different subsets of the
//! mount points. A mount the shell does not carry is skipped (logged at
//! `debug`), never an error.

pub mod chrome;
pub mod config;
pub mod gardening;
pub mod generate;
pub mod icons;
pub mod loader;
pub mod media;
pub mod output;
pub mod overlay;
pub mod page;
pub mod photography;
pub mod shell;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
