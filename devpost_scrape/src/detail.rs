//! Project detail page extraction.
//!
//! Every field is extracted independently and degrades to its empty value
//! when the markup is missing, so a partially broken page still yields a
//! usable record.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use url::Url;

use crate::dom::{
    attr_url, first_anchor, has_class_around, has_class_within, non_empty_text, text_of, video_id,
};
use crate::sanitize::{sanitize_inner, sanitize_outer};
use crate::selectors::DetailSelectors;
use crate::types::{
    Award, DemoVideo, Engagement, GalleryImage, ProjectDetails, TeamMember, Technology, VideoKind,
};
use crate::Error;

const UNKNOWN_MEMBER: &str = "Unknown Member";
const DEFAULT_AWARD_CATEGORY: &str = "Overall";

/// Extracts the structured record from a loaded detail page.
///
/// `page_url` resolves relative links; it must be absolute.
pub fn extract_detail(
    html: &str,
    page_url: &str,
    selectors: &DetailSelectors,
) -> Result<ProjectDetails, Error> {
    let base = Url::parse(page_url).map_err(|_| Error::InvalidPageUrl(page_url.to_string()))?;
    let document = Html::parse_document(html);
    let root = document.root_element();

    let details = ProjectDetails {
        description: description(root, selectors),
        technologies: technologies(root, &base, selectors),
        team_members: team_members(root, &base, selectors),
        gallery_images: gallery_images(root, &base, selectors),
        demo_video: demo_video(root, &base, selectors),
        engagement: engagement(root, selectors),
        awards: awards(root, selectors),
        github_url: selectors
            .github_links
            .first(root)
            .and_then(|a| attr_url(Some(&base), a, "href")),
        website_url: website_url(root, &base, selectors),
    };

    tracing::debug!(
        technologies = details.technologies.len(),
        team = details.team_members.len(),
        images = details.gallery_images.len(),
        awards = details.awards.len(),
        "Extracted details from {}",
        page_url
    );
    Ok(details)
}

fn description(root: ElementRef<'_>, selectors: &DetailSelectors) -> Option<String> {
    article_body(root, selectors).or_else(|| {
        selectors
            .description_fallbacks
            .first_where(root, |el| !sanitize_inner(*el).is_empty())
            .map(sanitize_inner)
    })
}

/// The write-up: elements following the media gallery, up to "built with".
fn article_body(root: ElementRef<'_>, selectors: &DetailSelectors) -> Option<String> {
    let gallery = selectors.gallery_region.first(root)?;
    let mut body = String::new();
    for sibling in gallery.next_siblings().filter_map(ElementRef::wrap) {
        if selectors.built_with_region.matches(&sibling) || selectors.built_with_region.any_in(sibling)
        {
            break;
        }
        body.push_str(&sanitize_outer(sibling));
    }
    Some(body).filter(|b| !b.is_empty())
}

fn technologies(
    root: ElementRef<'_>,
    base: &Url,
    selectors: &DetailSelectors,
) -> Vec<Technology> {
    selectors
        .technologies
        .all(root)
        .into_iter()
        .filter_map(|tag| {
            let name = non_empty_text(tag)?;
            Some(Technology {
                name,
                url: first_anchor(tag).and_then(|a| attr_url(Some(base), a, "href")),
                is_recognized: has_class_within(tag, &selectors.recognized_class),
            })
        })
        .collect()
}

fn team_members(
    root: ElementRef<'_>,
    base: &Url,
    selectors: &DetailSelectors,
) -> Vec<TeamMember> {
    selectors
        .team_member
        .all(root)
        .into_iter()
        .map(|member| {
            // The avatar is wrapped in a profile link too; prefer the one with text.
            let link = selectors
                .member_link
                .first_where(member, |a| !text_of(*a).is_empty())
                .or_else(|| selectors.member_link.first(member));

            TeamMember {
                name: link
                    .and_then(non_empty_text)
                    .unwrap_or_else(|| UNKNOWN_MEMBER.to_string()),
                profile_url: link
                    .and_then(|a| attr_url(Some(base), a, "href"))
                    .unwrap_or_default(),
                avatar_url: selectors
                    .member_avatar
                    .first(member)
                    .and_then(|img| attr_url(Some(base), img, "src")),
                role: selectors.member_role.first(member).and_then(non_empty_text),
            }
        })
        .collect()
}

fn gallery_images(
    root: ElementRef<'_>,
    base: &Url,
    selectors: &DetailSelectors,
) -> Vec<GalleryImage> {
    selectors
        .gallery_links
        .all(root)
        .into_iter()
        .filter(|link| !has_class_around(*link, &selectors.cloned_slide_class))
        .filter_map(|link| {
            Some(GalleryImage {
                url: attr_url(Some(base), link, "href")?,
                caption: selectors.caption.first(link).and_then(non_empty_text),
            })
        })
        .collect()
}

fn demo_video(root: ElementRef<'_>, base: &Url, selectors: &DetailSelectors) -> Option<DemoVideo> {
    let frame = selectors.demo_video.first(root)?;
    let url = attr_url(Some(base), frame, "src").or_else(|| attr_url(Some(base), frame, "data-src"))?;
    Some(DemoVideo {
        kind: VideoKind::from_src(&url),
        video_id: video_id(&url),
        url,
    })
}

fn engagement(root: ElementRef<'_>, selectors: &DetailSelectors) -> Engagement {
    Engagement {
        likes: count_in(selectors.likes.first(root)),
        comments: count_in(selectors.comments.first(root)),
    }
}

fn count_in(counter: Option<ElementRef<'_>>) -> u32 {
    counter
        .and_then(|el| parse_count(&text_of(el)))
        .unwrap_or(0)
}

/// Leading integer of a counter label ("1,024 likes" -> 1024).
fn parse_count(text: &str) -> Option<u32> {
    static LEADING_DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_DIGITS.get_or_init(|| Regex::new(r"^\d[\d,]*").expect("valid regex"));
    let digits: String = re.find(text.trim())?.as_str().replace(',', "");
    digits.parse().ok()
}

fn awards(root: ElementRef<'_>, selectors: &DetailSelectors) -> Vec<Award> {
    selectors
        .award_marker
        .all(root)
        .into_iter()
        .map(|marker| {
            let category = selectors
                .award_section
                .closest(marker)
                .and_then(|section| selectors.award_heading.first(section))
                .and_then(non_empty_text)
                .unwrap_or_else(|| DEFAULT_AWARD_CATEGORY.to_string());

            Award {
                category,
                place: text_of(marker),
                description: None,
                prize: sibling_text(marker),
            }
        })
        .collect()
}

/// Text of the node right after `element`, if any.
fn sibling_text(element: ElementRef<'_>) -> Option<String> {
    let sibling = element.next_sibling()?;
    let text = match sibling.value() {
        Node::Text(text) => text.trim().to_string(),
        Node::Element(_) => ElementRef::wrap(sibling).map(text_of)?,
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}

fn website_url(root: ElementRef<'_>, base: &Url, selectors: &DetailSelectors) -> Option<String> {
    let region = selectors.software_links_region.first(root)?;
    region
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .filter_map(|a| attr_url(Some(base), a, "href"))
        .find(|href| !href.contains("github.com"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_variants() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count("  7 \n"), Some(7));
        assert_eq!(parse_count("1,024 likes"), Some(1024));
        assert_eq!(parse_count("many"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-3"), None);
    }

    #[test]
    fn sibling_text_reads_following_text_node() {
        let doc = Html::parse_fragment(r#"<p><span class="winner">Winner</span> Best Hack</p>"#);
        let marker = doc
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "span")
            .unwrap();
        assert_eq!(sibling_text(marker).as_deref(), Some("Best Hack"));
    }

    #[test]
    fn empty_document_yields_empty_record() {
        let details = extract_detail(
            "<html><body></body></html>",
            "https://devpost.com/software/empty",
            &DetailSelectors::default(),
        )
        .unwrap();
        assert_eq!(details, ProjectDetails::default());
    }
}
