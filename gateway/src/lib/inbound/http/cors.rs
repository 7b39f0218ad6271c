use std::time::Duration;

use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use thiserror::Error;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;

use crate::config::CorsConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorsConfigError {
    #[error("Invalid CORS origin `{0}`")]
    InvalidOrigin(String),

    #[error("Invalid CORS method `{0}`")]
    InvalidMethod(String),

    #[error("Invalid CORS header `{0}`")]
    InvalidHeader(String),

    #[error("Wildcard `{0}` cannot be combined with allow_credentials")]
    WildcardWithCredentials(&'static str),
}

/// Build the cross-origin policy applied to every gateway response.
///
/// # Errors
/// * `CorsConfigError` - A value does not parse, or `*` is used together with credentials
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, CorsConfigError> {
    let wildcard = |values: &[String]| values.iter().any(|value| value == "*");

    let allow_origin = if wildcard(&config.allowed_origins) {
        if config.allow_credentials {
            return Err(CorsConfigError::WildcardWithCredentials("allowed_origins"));
        }
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| CorsConfigError::InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let allow_headers = if wildcard(&config.allowed_headers) {
        if config.allow_credentials {
            return Err(CorsConfigError::WildcardWithCredentials("allowed_headers"));
        }
        AllowHeaders::any()
    } else {
        AllowHeaders::list(header_names(&config.allowed_headers)?)
    };

    let allow_methods = if wildcard(&config.allowed_methods) {
        if config.allow_credentials {
            return Err(CorsConfigError::WildcardWithCredentials("allowed_methods"));
        }
        AllowMethods::any()
    } else {
        let methods = config
            .allowed_methods
            .iter()
            .map(|method| {
                Method::from_bytes(method.trim().to_uppercase().as_bytes())
                    .map_err(|_| CorsConfigError::InvalidMethod(method.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowMethods::list(methods)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(allow_methods)
        .allow_headers(allow_headers)
        .expose_headers(header_names(&config.exposed_headers)?)
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age_secs)))
}

fn header_names(names: &[String]) -> Result<Vec<HeaderName>, CorsConfigError> {
    names
        .iter()
        .map(|name| {
            HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|_| CorsConfigError::InvalidHeader(name.clone()))
        })
        .collect()
}
