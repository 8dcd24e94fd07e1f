use crate::error::ShortenerError;
use url::Url;

/// Prefixes `https://` when the input has no `http://` or `https://` prefix
/// and checks that the result is an absolute URL with a host.
///
/// The prefix check is case-sensitive and no further rewriting happens: the
/// returned string is the input (plus any prefix) byte for byte.
pub fn normalize_url(input: &str) -> Result<String, ShortenerError> {
    let candidate = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_owned()
    } else {
        format!("https://{input}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| ShortenerError::InvalidUrl(format!("'{candidate}': {e}")))?;

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ShortenerError::InvalidUrl(format!(
            "'{candidate}' has no host"
        )));
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_https_when_scheme_missing() {
        assert_eq!(normalize_url("example.com/a").unwrap(), "https://example.com/a");
        assert_eq!(normalize_url("openai.com").unwrap(), "https://openai.com");
    }

    #[test]
    fn keeps_http_and_https_inputs_verbatim() {
        assert_eq!(normalize_url("http://example.com").unwrap(), "http://example.com");
        assert_eq!(
            normalize_url("https://Example.com/Path?b=2&a=1").unwrap(),
            "https://Example.com/Path?b=2&a=1"
        );
    }

    #[test]
    fn rejects_missing_host() {
        assert!(matches!(
            normalize_url(""),
            Err(ShortenerError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_url("https://"),
            Err(ShortenerError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_unparseable_input() {
        assert!(normalize_url("not a url").is_err());
        assert!(normalize_url("https://exa mple.com").is_err());
        assert!(normalize_url("http://[::1").is_err());
    }
}
