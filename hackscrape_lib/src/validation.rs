//! Input validation for scrape requests and read queries.

use url::Url;

use crate::error::HackscrapeError;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_SAMPLE_SIZE: i64 = 100;
pub const DEFAULT_SAMPLE_SIZE: i64 = 10;

/// Validate a hackathon base URL: absolute http(s) with a host.
///
/// Returns the URL without query, fragment or trailing slash so
/// `/project-gallery` can be appended directly.
pub fn validate_hackathon_url(input: &str) -> Result<String, HackscrapeError> {
    let trimmed = input.trim();
    let mut url = Url::parse(trimmed).map_err(|e| {
        HackscrapeError::InvalidInput(format!("invalid hackathon URL '{}': {}", trimmed, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HackscrapeError::InvalidInput(format!(
            "hackathon URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(HackscrapeError::InvalidInput(
            "hackathon URL has no host".to_string(),
        ));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Validate a hackathon display name: strip control chars, trim, non-blank.
pub fn validate_hackathon_name(input: &str) -> Result<String, HackscrapeError> {
    if input.len() > MAX_NAME_LENGTH {
        return Err(HackscrapeError::InvalidInput(format!(
            "hackathon name exceeds maximum length of {} bytes",
            MAX_NAME_LENGTH
        )));
    }
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Err(HackscrapeError::InvalidInput(
            "hackathon name is empty".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Validate the winner limit (must be >= 1 when given).
pub fn validate_limit(limit: Option<i64>) -> Result<Option<usize>, HackscrapeError> {
    match limit {
        None => Ok(None),
        Some(n) if n >= 1 => usize::try_from(n)
            .map(Some)
            .map_err(|_| HackscrapeError::InvalidInput(format!("limit {} is too large", n))),
        Some(_) => Err(HackscrapeError::InvalidInput(
            "limit must be >= 1".to_string(),
        )),
    }
}

/// Validate a random sample size (must be 1..=100).
pub fn validate_sample_size(size: i64) -> Result<usize, HackscrapeError> {
    if !(1..=MAX_SAMPLE_SIZE).contains(&size) {
        return Err(HackscrapeError::InvalidInput(format!(
            "sample size must be between 1 and {}",
            MAX_SAMPLE_SIZE
        )));
    }
    Ok(size as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_trailing_slash_removed() {
        assert_eq!(
            validate_hackathon_url(" https://hackmit.devpost.com/ ").unwrap(),
            "https://hackmit.devpost.com"
        );
        assert_eq!(
            validate_hackathon_url("http://localhost:8080/events/spring").unwrap(),
            "http://localhost:8080/events/spring"
        );
        assert_eq!(
            validate_hackathon_url("https://hackmit.devpost.com/?ref_content=x#prizes").unwrap(),
            "https://hackmit.devpost.com"
        );
        assert_eq!(
            validate_hackathon_url("https://devpost.com/events/spring/#winners").unwrap(),
            "https://devpost.com/events/spring"
        );
    }

    #[test]
    fn url_rejects_relative_and_other_schemes() {
        assert!(validate_hackathon_url("hackmit.devpost.com").is_err());
        assert!(validate_hackathon_url("/project-gallery").is_err());
        assert!(validate_hackathon_url("ftp://hackmit.devpost.com").is_err());
        assert!(validate_hackathon_url("").is_err());
    }

    #[test]
    fn name_trimmed_and_non_blank() {
        assert_eq!(validate_hackathon_name("  HackMIT 2024\n").unwrap(), "HackMIT 2024");
        assert!(validate_hackathon_name("   ").is_err());
        assert!(validate_hackathon_name("\t\n").is_err());
        assert!(validate_hackathon_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn limit_bounds() {
        assert_eq!(validate_limit(None).unwrap(), None);
        assert_eq!(validate_limit(Some(1)).unwrap(), Some(1));
        assert_eq!(validate_limit(Some(30)).unwrap(), Some(30));
        assert!(validate_limit(Some(0)).is_err());
        assert!(validate_limit(Some(-5)).is_err());
    }

    #[test]
    fn sample_size_bounds() {
        assert_eq!(validate_sample_size(DEFAULT_SAMPLE_SIZE).unwrap(), 10);
        assert_eq!(validate_sample_size(1).unwrap(), 1);
        assert_eq!(validate_sample_size(100).unwrap(), 100);
        assert!(validate_sample_size(0).is_err());
        assert!(validate_sample_size(101).is_err());
    }
}
