use http::header::AUTHORIZATION;
use http::HeaderMap;
use thiserror::Error;

/// Scheme prefix for access and refresh tokens (capital B, one space).
pub const BEARER_PREFIX: &str = "Bearer ";

/// Scheme prefix for server-to-server API keys.
pub const API_KEY_PREFIX: &str = "ApiKey ";

/// Why an `Authorization` header could not yield a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Authorization header does not use the expected scheme")]
    MalformedScheme,

    #[error("Authorization header carries an empty credential")]
    EmptyToken,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The remainder after the prefix is returned verbatim: no trimming, and
/// internal whitespace is kept as part of the token.
///
/// # Errors
/// * `Missing` - Header absent or empty
/// * `MalformedScheme` - Header does not start with `"Bearer "` or is not UTF-8
/// * `EmptyToken` - Nothing follows the prefix
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    extract_with_prefix(headers, BEARER_PREFIX)
}

/// Extract the key from an `Authorization: ApiKey <key>` header.
///
/// Same contract as [`extract_bearer`] for the `"ApiKey "` scheme.
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, BearerError> {
    extract_with_prefix(headers, API_KEY_PREFIX)
}

fn extract_with_prefix<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, BearerError> {
    let value = headers.get(AUTHORIZATION).ok_or(BearerError::Missing)?;
    if value.is_empty() {
        return Err(BearerError::Missing);
    }

    let value = std::str::from_utf8(value.as_bytes()).map_err(|_| BearerError::MalformedScheme)?;

    match value.strip_prefix(prefix) {
        None => Err(BearerError::MalformedScheme),
        Some("") => Err(BearerError::EmptyToken),
        Some(token) => Ok(token),
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = headers_with("Bearer jshdbjyrf328y4_3ubf187413ifub3iuf");
        assert_eq!(
            extract_bearer(&headers),
            Ok("jshdbjyrf328y4_3ubf187413ifub3iuf")
        );
    }

    #[test]
    fn test_extract_bearer_simple() {
        assert_eq!(extract_bearer(&headers_with("Bearer abc")), Ok("abc"));
    }

    #[test]
    fn test_internal_space_is_preserved() {
        let headers = headers_with("Bearer jshdbjyrf328y4 3ubf187413ifub3iuf");
        assert_eq!(
            extract_bearer(&headers),
            Ok("jshdbjyrf328y4 3ubf187413ifub3iuf")
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(BearerError::Missing));
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(extract_bearer(&headers_with("")), Err(BearerError::Missing));
    }

    #[test]
    fn test_empty_token() {
        // HeaderValue keeps the trailing space, so the prefix matches exactly.
        assert_eq!(
            extract_bearer(&headers_with("Bearer ")),
            Err(BearerError::EmptyToken)
        );
    }

    #[test]
    fn test_wrong_scheme() {
        assert_eq!(
            extract_bearer(&headers_with("Token xyz")),
            Err(BearerError::MalformedScheme)
        );
        assert_eq!(
            extract_bearer(&headers_with("bearer xyz")),
            Err(BearerError::MalformedScheme)
        );
        assert_eq!(
            extract_bearer(&headers_with("Bearer")),
            Err(BearerError::MalformedScheme)
        );
    }

    #[test]
    fn test_non_utf8_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(extract_bearer(&headers), Err(BearerError::MalformedScheme));
    }

    #[test]
    fn test_extract_api_key() {
        assert_eq!(
            extract_api_key(&headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e")),
            Ok("f271c81ff7084ee5b99a5091b42d486e")
        );
        assert_eq!(
            extract_api_key(&headers_with("Bearer abc")),
            Err(BearerError::MalformedScheme)
        );
        assert_eq!(
            extract_api_key(&headers_with("ApiKey ")),
            Err(BearerError::EmptyToken)
        );
    }
}
