//! Email extraction from raw page text
//!
//! Pages on the directory often embed logos as base64 data URIs. Those blobs
//! can run to megabytes and contain fragments that look like address parts,
//! so they are removed before the email pattern runs.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Inline images: `data:image/<subtype>;base64,<payload>`
static INLINE_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)data:image/[a-z0-9.+-]+;base64,[+a-z0-9/=]+")
        .expect("inline image pattern is valid")
});

/// Local part (dotted atoms or a quoted string) `@` domain (IPv4 literal or
/// dotted labels with an alphabetic TLD)
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?im)(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*|".+")"#,
        r"@",
        r"(?:\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]|(?:[a-z0-9-]+\.)+[a-z]{2,})",
    ))
    .expect("email pattern is valid")
});

/// Removes inline base64 images from the text
pub fn strip_inline_images(text: &str) -> std::borrow::Cow<'_, str> {
    INLINE_IMAGE.replace_all(text, "")
}

/// Extracts the distinct email addresses found in `text`
///
/// Addresses are compared as exact strings, so `a@b.com` and `A@B.COM` are
/// both kept. The result keeps first-seen order.
///
/// # Examples
///
/// ```
/// use church_harvest::harvest::extract_emails;
///
/// let emails = extract_emails("Skriv till info@forsamling.se eller info@forsamling.se");
/// assert_eq!(emails, vec!["info@forsamling.se".to_string()]);
/// ```
pub fn extract_emails(text: &str) -> Vec<String> {
    let cleaned = strip_inline_images(text);

    let mut seen = HashSet::new();
    EMAIL
        .find_iter(&cleaned)
        .map(|m| m.as_str())
        .filter(|email| seen.insert(*email))
        .map(str::to_string)
        .collect()
}
