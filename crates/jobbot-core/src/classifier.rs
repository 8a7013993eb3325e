//! Job-post relevance check and contact extraction.

use std::sync::OnceLock;

use regex::Regex;

/// UI/UX terms in English and Persian. Any single hit makes a post relevant.
pub const UI_KEYWORDS: &[&str] = &[
    "UI",
    "UX",
    "interface",
    "figma",
    "sketch",
    "adobe xd",
    "فرانت",
    "طراحی رابط",
    "رابط کاربری",
    "تجربه کاربری",
    "ui designer",
    "ux designer",
    "فیگما",
    "طراح رابط",
    "front-end",
    "frontend",
    "وب دیزاین",
    "web design",
    "mobile design",
    "app design",
    "طراحی اپلیکیشن",
    "wireframe",
    "prototype",
    "mockup",
    "طراحی موکاپ",
];

/// Posts shorter than this (after trimming) are ignored.
pub const MIN_POST_CHARS: usize = 10;

static HANDLE_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn handle_re() -> &'static Regex {
    HANDLE_RE.get_or_init(|| Regex::new(r"@([a-zA-Z0-9_]+)").expect("valid regex"))
}

fn phone_re() -> &'static Regex {
    PHONE_RE.get_or_init(|| Regex::new(r"(\+98|0)?9\d{9}").expect("valid regex"))
}

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").expect("valid regex")
    })
}

/// Case-insensitive keyword substring scan.
pub fn is_relevant(text: &str) -> bool {
    let lower = text.to_lowercase();
    UI_KEYWORDS
        .iter()
        .any(|kw| lower.contains(kw.to_lowercase().as_str()))
}

pub fn is_substantive(text: &str) -> bool {
    text.trim().chars().count() >= MIN_POST_CHARS
}

/// First `@handle` in the text, without the `@`.
pub fn extract_handle(text: &str) -> Option<String> {
    handle_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// First Iranian mobile number (`+98`/`0` prefix optional).
pub fn extract_phone(text: &str) -> Option<String> {
    phone_re().find(text).map(|m| m.as_str().to_string())
}

pub fn extract_email(text: &str) -> Option<String> {
    email_re().find(text).map(|m| m.as_str().to_string())
}

/// Contact details found in one post. Only `handle` drives delivery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub handle: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactInfo {
    pub fn extract(text: &str) -> Self {
        Self {
            handle: extract_handle(text),
            phone: extract_phone(text),
            email: extract_email(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(is_relevant("Looking for a UI/UX designer, contact @jane_doe"));
        assert!(is_relevant("we use FIGMA daily"));
        assert!(is_relevant("Need a Front-End dev"));
        assert!(is_relevant("استخدام طراح رابط کاربری"));
    }

    #[test]
    fn posts_without_keywords_are_not_relevant() {
        assert!(!is_relevant("Hiring a backend Go engineer, DM @boss"));
        assert!(!is_relevant(""));
        assert!(!is_relevant("استخدام حسابدار"));
    }

    #[test]
    fn handle_is_stripped_of_at_sign() {
        assert_eq!(
            extract_handle("contact @jane_doe for details").as_deref(),
            Some("jane_doe")
        );
        assert_eq!(extract_handle("@a1 then @b2").as_deref(), Some("a1"));
        assert_eq!(extract_handle("no handle here"), None);
        assert_eq!(extract_handle("just an @ sign"), None);
    }

    #[test]
    fn extracts_phone_and_email() {
        let text = "call +989121234567 or mail hr@studio.ir, tg @studio_hr";
        let info = ContactInfo::extract(text);
        assert_eq!(info.phone.as_deref(), Some("+989121234567"));
        assert_eq!(info.email.as_deref(), Some("hr@studio.ir"));
        assert_eq!(info.handle.as_deref(), Some("studio"));

        assert_eq!(extract_phone("شماره 09121234567").as_deref(), Some("09121234567"));
        assert_eq!(extract_phone("9121234567").as_deref(), Some("9121234567"));
        assert_eq!(extract_phone("12345"), None);
        assert_eq!(extract_email("nobody at nowhere"), None);
    }

    #[test]
    fn short_posts_are_not_substantive() {
        assert!(!is_substantive("   UI  "));
        assert!(!is_substantive(""));
        assert!(is_substantive("UI designer wanted"));
    }
}
