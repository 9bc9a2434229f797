//! Video resolution for overlay media blocks.
//!
//! A record's `video` field takes one of three forms:
//!
//! | Value | Rendered as |
//! |-------|-------------|
//! | absent or blank | "coming soon" placeholder |
//! | contains `youtube.com` or `youtu.be` | embedded `iframe` at the embed URL |
//! | anything else | native `video` element pointing at the value |
//!
//! The YouTube rewrite applies both substitutions in sequence and each
//! replaces only its first occurrence, so a value can be touched by both.

use crate::config::Labels;
use crate::types::has_text;
use maud::{Markup, html};

const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    Placeholder,
    Embed(String),
    File(String),
}

impl MediaSource {
    pub fn resolve(video: Option<&str>) -> Self {
        match video {
            Some(url) if has_text(Some(url)) => {
                if url.contains("youtube.com") || url.contains("youtu.be") {
                    MediaSource::Embed(embed_url(url))
                } else {
                    MediaSource::File(url.to_string())
                }
            }
            _ => MediaSource::Placeholder,
        }
    }
}

/// Rewrite a YouTube watch or short URL to its embeddable form.
pub fn embed_url(url: &str) -> String {
    url.replacen("watch?v=", "embed/", 1)
        .replacen("youtu.be/", "www.youtube.com/embed/", 1)
}

/// Where a media block is rendered; selects the CSS class family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaContext {
    Modal,
    Lightbox,
}

impl MediaContext {
    fn class(self, suffix: &str) -> String {
        match self {
            MediaContext::Modal => format!("modal-{suffix}"),
            MediaContext::Lightbox => format!("lb-{suffix}"),
        }
    }
}

/// Render the body of a media section: embed, player or placeholder.
///
/// `hint` is the small print under the placeholder telling editors which
/// document field to fill in.
pub fn render_media(
    source: &MediaSource,
    title: &str,
    hint: &str,
    labels: &Labels,
    context: MediaContext,
) -> Markup {
    html! {
        @match source {
            MediaSource::Embed(url) => {
                div class=(context.class("video-wrap")) {
                    iframe src=(url) title={ (title) " video" } frameborder="0"
                        allow=(IFRAME_ALLOW) allowfullscreen loading="lazy" {}
                }
            }
            MediaSource::File(path) => {
                div class=(context.class("video-wrap")) {
                    video controls preload="none" {
                        source src=(path) type="video/mp4";
                        (labels.video_unsupported)
                    }
                }
            }
            MediaSource::Placeholder => {
                div class=(context.class("video-placeholder")) {
                    span class=(context.class("video-placeholder-icon")) { "▶" }
                    p { (labels.video_coming_soon) }
                    small { (hint) }
                }
            }
        }
    }
}
