//! Image-URL extraction from article text artifacts.
//!
//! Upstream article files carry their illustration links on a single
//! `Images: <url> <url> ...` line.

use regex::Regex;

/// Extract http(s) image URLs from the `Images:` line of an article.
///
/// Returns an empty list when the line is missing or carries no usable
/// URLs.
pub fn extract_image_urls(article: &str) -> Vec<String> {
    let re = Regex::new(r"(?i)Images:\s*(.*)").expect("static regex");

    let Some(captures) = re.captures(article) else {
        return Vec::new();
    };

    captures[1]
        .split_whitespace()
        .filter(|candidate| candidate.starts_with("http://") || candidate.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_urls_from_images_line() {
        let article = "Some article body.\n\nImages: https://example.com/a.png http://example.com/b.jpg\n";
        let urls = extract_image_urls(article);
        assert_eq!(
            urls,
            vec![
                "https://example.com/a.png".to_string(),
                "http://example.com/b.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_case_insensitive_marker() {
        let urls = extract_image_urls("images: https://example.com/x.webp");
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn test_non_url_tokens_filtered() {
        let urls = extract_image_urls("Images: not-a-url ftp://nope https://ok.example/c.png");
        assert_eq!(urls, vec!["https://ok.example/c.png".to_string()]);
    }

    #[test]
    fn test_missing_line_yields_empty() {
        assert!(extract_image_urls("Just prose, no image line.").is_empty());
        assert!(extract_image_urls("").is_empty());
    }
}
