use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static USERNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Absolute http(s) address with a host.
pub fn is_http_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

pub fn check_url(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{field} should not be empty"));
    } else if !is_http_url(value) {
        errors.push(format!("{field} must be a valid URL address"));
    }
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn check_username(value: &str, errors: &mut Vec<String>) {
    let len = value.chars().count();
    if len < 3 {
        errors.push("username must be longer than or equal to 3 characters".into());
    } else if len > 50 {
        errors.push("username must be shorter than or equal to 50 characters".into());
    }
    if !USERNAME.is_match(value) {
        errors.push("Username must contain only letters, numbers, and underscores".into());
    }
}

pub fn check_password(value: &str, errors: &mut Vec<String>) {
    let len = value.chars().count();
    if len < 8 {
        errors.push("password must be longer than or equal to 8 characters".into());
    } else if len > 100 {
        errors.push("password must be shorter than or equal to 100 characters".into());
    }
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    if !(lower && upper && digit) {
        errors.push(
            "Password must contain at least one lowercase letter, one uppercase letter, and one number"
                .into(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_absolute_http_urls() {
        assert!(is_http_url("https://example.com"));
        assert!(is_http_url("http://localhost:8080/path?q=1"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn empty_url_reports_missing_field() {
        let mut errors = Vec::new();
        check_url("url", "  ", &mut errors);
        assert_eq!(errors, vec!["url should not be empty".to_string()]);
    }

    #[test]
    fn username_rules() {
        let mut errors = Vec::new();
        check_username("ok_name1", &mut errors);
        assert!(errors.is_empty());

        check_username("a-", &mut errors);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn username_must_be_ascii() {
        let mut errors = Vec::new();
        check_username("josé_ñandú", &mut errors);
        assert_eq!(
            errors,
            vec!["Username must contain only letters, numbers, and underscores".to_string()]
        );
    }

    #[test]
    fn password_rules() {
        let mut errors = Vec::new();
        check_password("Secret123", &mut errors);
        assert!(errors.is_empty());

        check_password("alllowercase1", &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn email_shape() {
        assert!(is_email("test@example.com"));
        assert!(!is_email("test@"));
        assert!(!is_email("two words@example.com"));
    }
}
