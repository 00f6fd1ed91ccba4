use super::*;
use actix_cors::Cors;
use actix_web::http::{header, uri::Uri};

/// Comma separated origins from `var`; invalid entries are dropped.
pub fn load_cors_origins(var: &str) -> Vec<String> {
    load_env_var(var, "")
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter(|origin| match origin.parse::<Uri>() {
            Ok(_) => true,
            Err(e) => {
                warn!("Invalid URI in CORS configuration '{}': {}", origin, e);
                false
            }
        })
        .map(str::to_string)
        .collect()
}

/// Permissive when no origin is configured.
pub fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}
