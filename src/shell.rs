//! Page shells and their mount points.
//!
//! A shell is a hand-written HTML page. Controllers never rewrite the page
//! structure; they only fill *mount points*: elements with a stable `id`
//! whose content is replaced wholesale, placeholder text included, e.g.
//!
//! ```html
//! <div id="plants-grid" class="plants-grid"><p>Loading...</p></div>
//! ```
//!
//! Pages share controllers but not every page carries every mount, so a
//! missing mount is reported as [`ShellError::MissingMountPoint`] and the
//! caller turns it into a no-op. Inserted fragments are `maud` markup and
//! therefore already escaped.

use std::sync::LazyLock;

use maud::Markup;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq)]
pub enum ShellError {
    #[error("no mount point with id '{0}'")]
    MissingMountPoint(String),
    #[error("mount point '{0}' has no closing tag")]
    Unclosed(String),
}

static BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(body)\b[^>]*>").expect("static pattern"));

static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sclass\s*=\s*"([^"]*)""#).expect("static pattern"));

/// Location of a start tag in the document.
struct StartTag {
    name: String,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
pub struct Shell {
    html: String,
}

impl Shell {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    /// True when an element with `id` exists, empty or not.
    pub fn has_element(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// True when `id` names an element with a closing tag, so it can take
    /// content.
    pub fn has_mount(&self, id: &str) -> bool {
        self.find_by_id(id)
            .is_some_and(|tag| self.content_end(&tag).is_some())
    }

    /// Replace whatever mount `id` currently contains with `markup`.
    pub fn fill(&mut self, id: &str, markup: Markup) -> Result<(), ShellError> {
        let tag = self
            .find_by_id(id)
            .ok_or_else(|| ShellError::MissingMountPoint(id.to_string()))?;
        let body_end = self
            .content_end(&tag)
            .ok_or_else(|| ShellError::Unclosed(id.to_string()))?;
        self.html
            .replace_range(tag.end..body_end, &markup.into_string());
        Ok(())
    }

    /// [`fill`](Self::fill), treating an unusable mount as a no-op.
    ///
    /// Returns whether the mount was filled.
    pub fn fill_if_present(&mut self, id: &str, markup: Markup) -> bool {
        match self.fill(id, markup) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "mount skipped");
                false
            }
        }
    }

    /// Add `class` to the element with `id`.
    pub fn add_class(&mut self, id: &str, class: &str) -> Result<(), ShellError> {
        let tag = self
            .find_by_id(id)
            .ok_or_else(|| ShellError::MissingMountPoint(id.to_string()))?;
        self.insert_class(&tag, class);
        Ok(())
    }

    /// Add `class` to the document's `body` element.
    pub fn add_body_class(&mut self, class: &str) -> Result<(), ShellError> {
        let tag = self
            .find_tag(&BODY_TAG)
            .ok_or_else(|| ShellError::MissingMountPoint("body".to_string()))?;
        self.insert_class(&tag, class);
        Ok(())
    }

    /// Insert `markup` just before `</body>`, or at the end of the document
    /// when the shell has no closing body tag.
    pub fn append_to_body(&mut self, markup: Markup) {
        let at = self
            .html
            .to_ascii_lowercase()
            .rfind("</body")
            .unwrap_or(self.html.len());
        self.html.insert_str(at, &markup.into_string());
    }

    fn find_by_id(&self, id: &str) -> Option<StartTag> {
        let pattern = format!(
            r#"<([a-zA-Z][a-zA-Z0-9-]*)\b[^>]*\sid\s*=\s*["']{}["'][^>]*>"#,
            regex::escape(id)
        );
        let re = Regex::new(&pattern).ok()?;
        self.find_tag(&re)
    }

    fn find_tag(&self, re: &Regex) -> Option<StartTag> {
        let caps = re.captures(&self.html)?;
        let whole = caps.get(0)?;
        let name = caps.get(1)?.as_str().to_ascii_lowercase();
        Some(StartTag {
            name,
            start: whole.start(),
            end: whole.end(),
        })
    }

    /// Offset of the close tag matching `tag`, skipping nested elements of
    /// the same name. `None` for self-closed or unterminated elements.
    fn content_end(&self, tag: &StartTag) -> Option<usize> {
        if self.html[tag.start..tag.end].ends_with("/>") {
            return None;
        }
        let pattern = format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(&tag.name));
        let re = Regex::new(&pattern).ok()?;
        let mut depth = 0usize;
        for caps in re.captures_iter(&self.html[tag.end..]) {
            let whole = caps.get(0)?;
            let closing = caps.get(1).is_some_and(|slash| !slash.is_empty());
            if closing {
                if depth == 0 {
                    return Some(tag.end + whole.start());
                }
                depth -= 1;
            } else if !whole.as_str().ends_with("/>") {
                depth += 1;
            }
        }
        None
    }

    fn insert_class(&mut self, tag: &StartTag, class: &str) {
        let open = &self.html[tag.start..tag.end];
        let (at, insert) = match CLASS_ATTR.captures(open).and_then(|c| c.get(1)) {
            Some(value) => {
                let existing = value.as_str();
                if existing.split_whitespace().any(|c| c == class) {
                    return;
                }
                let insert = if existing.trim().is_empty() {
                    class.to_string()
                } else {
                    format!(" {class}")
                };
                (tag.start + value.end(), insert)
            }
            None => {
                let close = if open.ends_with("/>") { 2 } else { 1 };
                (tag.end - close, format!(r#" class="{class}""#))
            }
        };
        self.html.insert_str(at, &insert);
    }
}
