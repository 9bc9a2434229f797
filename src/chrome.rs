//! Shared site chrome: navigation, mobile drawer and footer.
//!
//! Chrome is built from [`SiteConfig`] alone, once per page, and has no
//! data dependency. The only per-page input is the current location, used
//! to mark the active navigation entry.
//!
//! ## Mount Points
//!
//! | Id | Content |
//! |----|---------|
//! | `kt-nav` | desktop navigation links (`a.nav-item`) |
//! | `kt-mobile-nav` | drawer links |
//! | `kt-footer` | shared footer |
//!
//! The hamburger (`kt-hamburger`) and drawer backdrop (`kt-overlay`) are
//! authored in the shell; the embedded page script toggles them.

use crate::config::{NavLink, SiteConfig, SocialLinks};
use crate::icons;
use crate::shell::Shell;
use maud::{Markup, html};

/// Final path segment of `location`, or `default_page` when it has none.
///
/// - `"/site/gardening.html"` → `"gardening.html"`
/// - `"/"` or `""` → `default_page`
pub fn active_segment<'a>(location: &'a str, default_page: &'a str) -> &'a str {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or(location);
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => default_page,
    }
}

fn nav_links(links: &[NavLink], current: &str, class: Option<&str>) -> Markup {
    html! {
        @for link in links {
            @let active = link.href == current;
            @let classes = match (class, active) {
                (Some(c), true) => Some(format!("{c} active")),
                (Some(c), false) => Some(c.to_string()),
                (None, true) => Some("active".to_string()),
                (None, false) => None,
            };
            a href=(link.href) class=[classes] aria-current=[active.then_some("page")] {
                (link.label)
            }
        }
    }
}

/// Desktop navigation links.
pub fn render_nav(config: &SiteConfig, current: &str) -> Markup {
    nav_links(&config.nav, current, Some("nav-item"))
}

/// Mobile drawer links.
pub fn render_mobile_nav(config: &SiteConfig, current: &str) -> Markup {
    nav_links(&config.nav, current, None)
}

fn social_links(social: &SocialLinks) -> Markup {
    let entries = [
        ("Facebook", &social.facebook, icons::FACEBOOK),
        ("Instagram", &social.instagram, icons::INSTAGRAM),
        ("YouTube", &social.youtube, icons::YOUTUBE),
        ("WhatsApp", &social.whatsapp, icons::WHATSAPP),
    ];
    html! {
        div.kt-social-links {
            @for (label, href, icon) in entries {
                a.kt-social-icon href=(href) target="_blank" rel="noopener" aria-label=(label) {
                    (icon)
                }
            }
        }
    }
}

/// The shared footer: brand, page links, class links, contact, fine print.
pub fn render_footer(config: &SiteConfig) -> Markup {
    let site = &config.site;
    let footer = &config.footer;
    html! {
        footer.kt-shared-footer {
            div.kt-footer-inner {
                div.kt-footer-col.kt-footer-brand {
                    div.kt-footer-logo-text {
                        span.kt-footer-logo-en { (site.name) }
                        span.kt-footer-logo-ml { (site.name_local) }
                    }
                    p.kt-footer-tagline { (site.tagline) }
                    (social_links(&config.social))
                }
                div.kt-footer-col {
                    h4.kt-footer-heading { (footer.pages_heading) }
                    ul.kt-footer-links {
                        @for link in &config.nav {
                            li { a href=(link.href) { (link.label) } }
                        }
                    }
                }
                div.kt-footer-col {
                    h4.kt-footer-heading { (footer.classes_heading) }
                    ul.kt-footer-links {
                        @for link in &footer.classes {
                            li { a href=(link.href) { (link.label) } }
                        }
                    }
                }
                div.kt-footer-col {
                    h4.kt-footer-heading { (footer.contact_heading) }
                    ul.kt-footer-links.kt-footer-contact {
                        li { "📧 " a href={ "mailto:" (site.email) } { (site.email) } }
                        li { "📍 " (site.location) }
                    }
                }
            }
            div.kt-footer-bottom {
                p { "© " (site.year) " " (footer.copyright) }
                p.kt-footer-attribution { (footer.attribution) }
            }
        }
    }
}

/// Inject every chrome mount the shell carries. Absent mounts are skipped.
///
/// Returns the number of mounts filled.
pub fn inject(shell: &mut Shell, config: &SiteConfig, location: &str) -> usize {
    let current = active_segment(location, &config.display.default_page);
    let mounts = [
        ("kt-nav", render_nav(config, current)),
        ("kt-mobile-nav", render_mobile_nav(config, current)),
        ("kt-footer", render_footer(config)),
    ];
    let mut filled = 0;
    for (id, markup) in mounts {
        if shell.fill_if_present(id, markup) {
            filled += 1;
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_segment_takes_last_path_part() {
        assert_eq!(active_segment("/site/gardening.html", "index.html"), "gardening.html");
        assert_eq!(active_segment("photography.html", "index.html"), "photography.html");
        assert_eq!(active_segment("/a/b.html?x=1#top", "index.html"), "b.html");
    }

    #[test]
    fn active_segment_falls_back_at_root() {
        assert_eq!(active_segment("/", "index.html"), "index.html");
        assert_eq!(active_segment("", "index.html"), "index.html");
        assert_eq!(active_segment("/site/", "home.html"), "home.html");
    }

    #[test]
    fn nav_marks_exactly_one_active_link() {
        let config = SiteConfig::default();
        let html = render_nav(&config, "gardening.html").into_string();
        assert_eq!(html.matches("active").count(), 1);
        assert!(html.contains(r#"<a href="gardening.html" class="nav-item active" aria-current="page">"#));
    }

    #[test]
    fn nav_without_match_marks_nothing() {
        let config = SiteConfig::default();
        let html = render_mobile_nav(&config, "class-3.html").into_string();
        assert!(!html.contains("active"));
        assert!(!html.contains("class="));
    }

    #[test]
    fn footer_contains_identity_and_columns() {
        let mut config = SiteConfig::default();
        config.site.year = "2030".to_string();
        config.social.youtube = "https://youtube.com/@kutty".to_string();
        let html = render_footer(&config).into_string();

        assert!(html.contains("KuttyTeachers"));
        assert!(html.contains("mailto:contact@kuttyteachers.in"));
        assert!(html.contains("© 2030"));
        assert!(html.contains("class-5.html"));
        assert!(html.contains("photography.html"));
        assert!(html.contains(r#"href="https://youtube.com/@kutty""#));
        assert_eq!(html.matches("kt-social-icon").count(), 4);
        assert!(html.contains("<svg"));
    }

    #[test]
    fn footer_escapes_config_text() {
        let mut config = SiteConfig::default();
        config.site.tagline = "<b>bold</b>".to_string();
        let html = render_footer(&config).into_string();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn inject_fills_present_mounts_only() {
        let mut shell = Shell::new(
            r#"<body><nav id="kt-nav"></nav><main></main><div id="kt-footer"></div></body>"#,
        );
        let filled = inject(&mut shell, &SiteConfig::default(), "/index.html");
        assert_eq!(filled, 2);
        let out = shell.into_string();
        assert!(out.contains("nav-item active"));
        assert!(out.contains("kt-shared-footer"));
    }
}
