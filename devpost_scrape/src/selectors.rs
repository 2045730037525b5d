//! Ordered CSS selector fallback chains.
//!
//! Devpost markup drifts over time, so every lookup is expressed as a list of
//! selectors tried in order. The lists are plain data: they deserialize from
//! configuration and the defaults below reflect the layouts observed so far.

use std::collections::BTreeSet;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A list of CSS selectors tried in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SelectorChain {
    sources: Vec<String>,
    compiled: Vec<Selector>,
}

impl SelectorChain {
    /// Compiles every selector, failing on the first invalid one.
    pub fn new<I, S>(sources: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources: Vec<String> = sources.into_iter().map(Into::into).collect();
        if sources.is_empty() {
            return Err(Error::EmptyChain);
        }
        let compiled = sources
            .iter()
            .map(|s| {
                Selector::parse(s).map_err(|e| Error::InvalidSelector {
                    selector: s.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sources, compiled })
    }

    fn builtin(sources: &[&str]) -> Self {
        Self::new(sources.iter().copied()).expect("built-in selectors compile")
    }

    /// The raw selector strings, in priority order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// All selectors joined into one selector group (`a, b, c`).
    pub fn css_group(&self) -> String {
        self.sources.join(", ")
    }

    /// First element matched by the highest-priority selector that matches
    /// anything under `scope`.
    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.compiled
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// Like [`first`](Self::first) but skips elements rejected by `accept`.
    pub fn first_where<'a, F>(&self, scope: ElementRef<'a>, mut accept: F) -> Option<ElementRef<'a>>
    where
        F: FnMut(&ElementRef<'a>) -> bool,
    {
        self.compiled
            .iter()
            .find_map(|selector| scope.select(selector).find(|el| accept(el)))
    }

    /// Every element matched by the first selector that matches anything.
    pub fn all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        for selector in &self.compiled {
            let found: Vec<ElementRef<'a>> = scope.select(selector).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// True if any selector matches anything under `scope`.
    pub fn any_in(&self, scope: ElementRef<'_>) -> bool {
        self.first(scope).is_some()
    }

    /// True if `element` itself matches any selector.
    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.compiled.iter().any(|selector| selector.matches(element))
    }

    /// Nearest ancestor of `element` matching any selector.
    pub fn closest<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| self.matches(ancestor))
    }
}

impl TryFrom<Vec<String>> for SelectorChain {
    type Error = Error;

    fn try_from(sources: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(sources)
    }
}

impl From<SelectorChain> for Vec<String> {
    fn from(chain: SelectorChain) -> Self {
        chain.sources
    }
}

/// Selectors used on the project gallery page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySelectors {
    /// One element per project. Two layouts are known.
    pub entry: SelectorChain,
    pub title: SelectorChain,
    pub tagline: SelectorChain,
    /// Link to the detail page, searched inside the entry, then around it.
    pub link: SelectorChain,
    /// Any match marks the entry as a winner.
    pub winner_badge: SelectorChain,
    pub thumbnail: SelectorChain,
}

impl Default for GallerySelectors {
    fn default() -> Self {
        Self {
            entry: SelectorChain::builtin(&[".gallery-item", ".software-entry"]),
            title: SelectorChain::builtin(&["h5", ".software-entry-name"]),
            tagline: SelectorChain::builtin(&[
                "p.small.tagline",
                "p",
                ".software-entry-description",
            ]),
            link: SelectorChain::builtin(&["a.link-to-software", "a[href*=\"/software/\"]"]),
            winner_badge: SelectorChain::builtin(&[
                ".winner-badge",
                ".winner",
                ".winner-banner",
                "[class*=\"winner\"]",
            ]),
            thumbnail: SelectorChain::builtin(&[
                "img.software_thumbnail_image",
                "figure img",
                "img",
            ]),
        }
    }
}

/// Selectors used on a project detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// Media gallery; the write-up follows it.
    pub gallery_region: SelectorChain,
    /// "Built with" section; the write-up ends before it.
    pub built_with_region: SelectorChain,
    /// Tried in order when the gallery/built-with bracket yields nothing.
    pub description_fallbacks: SelectorChain,
    pub technologies: SelectorChain,
    pub recognized_class: String,
    pub team_member: SelectorChain,
    pub member_link: SelectorChain,
    pub member_role: SelectorChain,
    pub member_avatar: SelectorChain,
    pub gallery_links: SelectorChain,
    /// Carousel duplicates carry this class on their slide.
    pub cloned_slide_class: String,
    pub caption: SelectorChain,
    pub demo_video: SelectorChain,
    pub likes: SelectorChain,
    pub comments: SelectorChain,
    pub award_marker: SelectorChain,
    pub award_section: SelectorChain,
    pub award_heading: SelectorChain,
    /// Results-area links first, any GitHub link last.
    pub github_links: SelectorChain,
    pub software_links_region: SelectorChain,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            gallery_region: SelectorChain::builtin(&["#gallery"]),
            built_with_region: SelectorChain::builtin(&["#built-with"]),
            description_fallbacks: SelectorChain::builtin(&[
                "#app-details .content-section",
                "#app-details-left > div:not(#gallery):not(#built-with)",
                ".software-description",
                "#app-details",
            ]),
            technologies: SelectorChain::builtin(&[
                "#built-with .cp-tag",
                ".cp-tag",
                ".built-with-list li",
            ]),
            recognized_class: "recognized-tag".to_string(),
            team_member: SelectorChain::builtin(&[".software-team-member"]),
            member_link: SelectorChain::builtin(&[".user-profile-link"]),
            member_role: SelectorChain::builtin(&[".bubble"]),
            member_avatar: SelectorChain::builtin(&["img"]),
            gallery_links: SelectorChain::builtin(&[
                "#gallery a[data-lightbox]",
                "#gallery a[href]",
            ]),
            cloned_slide_class: "slick-cloned".to_string(),
            caption: SelectorChain::builtin(&["p i", "figcaption"]),
            demo_video: SelectorChain::builtin(&[
                "iframe.video-embed",
                ".video-embed iframe",
                "#gallery iframe",
            ]),
            likes: SelectorChain::builtin(&[".software-likes .side-count"]),
            comments: SelectorChain::builtin(&[".comment-button .side-count"]),
            award_marker: SelectorChain::builtin(&[".software-list-content .winner"]),
            award_section: SelectorChain::builtin(&["section", ".category-section"]),
            award_heading: SelectorChain::builtin(&["h1", "h2", "h3", ".category-name"]),
            github_links: SelectorChain::builtin(&[
                "#app-links-container a[href*=\"github.com\"]",
                ".app-links a[href*=\"github.com\"]",
                "a[href*=\"github.com\"]",
            ]),
            software_links_region: SelectorChain::builtin(&["#app-links-container", ".app-links"]),
        }
    }
}

/// The complete selector table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub gallery: GallerySelectors,
    pub detail: DetailSelectors,
}

/// Every distinct `.class` and `#id` selector present in a document, sorted.
///
/// Written next to page dumps so broken selectors can be compared against
/// what the page actually offers.
pub fn class_inventory(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut found = BTreeSet::new();
    for node in document.tree.nodes() {
        if let Some(element) = node.value().as_element() {
            for class in element.classes() {
                found.insert(format!(".{}", class));
            }
            if let Some(id) = element.id() {
                found.insert(format!("#{}", id));
            }
        }
    }
    found.into_iter().collect()
}
