//! Small DOM helpers shared by the extractors.

use scraper::ElementRef;
use url::Url;

/// Whitespace-trimmed text content, like `textContent.trim()`.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text, `None` when blank.
pub(crate) fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    Some(text_of(element)).filter(|t| !t.is_empty())
}

/// Resolved URL held in `attr` of `element`.
pub(crate) fn attr_url(base: Option<&Url>, element: ElementRef<'_>, attr: &str) -> Option<String> {
    element.value().attr(attr).and_then(|raw| resolve(base, raw))
}

/// `element` itself if it is an anchor, else its first descendant anchor.
pub(crate) fn first_anchor(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
}

/// True if `element` or one of its descendants carries `class`.
pub(crate) fn has_class_within(element: ElementRef<'_>, class: &str) -> bool {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().classes().any(|c| c == class))
}

/// True if `element` or one of its ancestors carries `class`.
pub(crate) fn has_class_around(element: ElementRef<'_>, class: &str) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| el.value().classes().any(|c| c == class))
}

/// Resolves an attribute value the way a browser's `.href`/`.src` would.
///
/// Blank values, fragments and `javascript:` links resolve to `None`.
pub(crate) fn resolve(base: Option<&Url>, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') || raw.starts_with("javascript:") {
        return None;
    }
    if let Ok(absolute) = Url::parse(raw) {
        return Some(absolute.to_string());
    }
    match base {
        Some(base) => base.join(raw).ok().map(|u| u.to_string()),
        None => Some(raw.to_string()),
    }
}

/// Pulls a video id out of an embed URL.
///
/// A `v` query parameter wins; otherwise the segment after `embed/` or
/// `video/` is used.
pub(crate) fn video_id(src: &str) -> Option<String> {
    let url = Url::parse(src).ok()?;
    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        if !v.is_empty() {
            return Some(v.into_owned());
        }
    }
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    segments
        .windows(2)
        .find(|pair| pair[0] == "embed" || pair[0] == "video")
        .map(|pair| pair[1].to_string())
}
