use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Split a comma-separated origin list, ignoring blanks.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    Ok(origins)
}

/// CORS for the given origins with credentials, the usual REST methods,
/// `Content-Type`/`Authorization`/`Accept` headers and a one hour max age.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Build the CORS layer from the required `CORS_ALLOWED_ORIGIN` variable,
/// e.g. `http://localhost:3000,https://shop.example.com`.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let raw = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000",
        )
    })?;

    let origins = parse_allowed_origins(&raw)?;
    tracing::info!(origins = %raw, "CORS configured");

    Ok(create_cors_layer(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins_trims_and_skips_blanks() {
        let origins = parse_allowed_origins(" http://localhost:3000, ,https://shop.example.com ").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
    }

    #[test]
    fn test_parse_allowed_origins_empty() {
        assert!(parse_allowed_origins(" , ").is_err());
    }

    #[test]
    fn test_cors_layer_from_env_missing() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            let err = cors_layer_from_env().unwrap_err();
            assert!(err.to_string().contains("CORS_ALLOWED_ORIGIN"));
        });
    }
}
