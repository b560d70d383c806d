use crate::models::{Claims, ServiceError};
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod blob_storage;
pub mod content_storage;
pub mod grouping_storage;
pub mod submission_storage;
pub mod team_storage;

pub use auth_middleware::Authentication;
pub use auth_middleware::Authentication as Auth;

// Runtime configuration, resolved once from the environment
pub mod config {
    use super::*;

    pub struct Config {
        pub server_address: String,
        pub storage_root: String,
        // Base under which stored blobs are publicly reachable; submission
        // rows persist full URLs derived from this
        pub public_storage_base_url: String,
        pub jwt_secret: String,
    }

    impl Config {
        fn from_env() -> Config {
            Config {
                server_address: env::var("SERVER_ADDRESS")
                    .unwrap_or_else(|_| "127.0.0.1:9090".to_string()),
                storage_root: env::var("STORAGE_ROOT")
                    .unwrap_or_else(|_| "./storage".to_string()),
                public_storage_base_url: env::var("PUBLIC_STORAGE_BASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:9090/public".to_string()),
                jwt_secret: env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "heimdall_super_secret_key".to_string()),
            }
        }
    }

    lazy_static::lazy_static! {
        pub static ref CONFIG: Config = Config::from_env();
    }
}

// JWT utility functions. Tokens are normally minted by the external auth
// service with the same shared secret; issue_token exists for tests and
// local development.
pub mod jwt {
    use super::*;
    use crate::utils::config::CONFIG;

    // Issue a token for a known principal
    pub fn issue_token(user_id: &str, email: &str) -> Result<String, ServiceError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(7))
            .expect("Valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(CONFIG.jwt_secret.as_ref()),
        )
            .map_err(|_| ServiceError::InternalServerError)
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(CONFIG.jwt_secret.as_ref()),
            &Validation::default(),
        )
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(ServiceError::Unauthorized);
        }

        Ok(auth_header.trim_start_matches("Bearer ").to_string())
    }
}

// Claims are inserted into request extensions by the Authentication
// middleware; handlers read them back through these helpers.
pub fn get_claims_from_request(req: &HttpRequest) -> Result<Claims, ServiceError> {
    req.extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(ServiceError::Unauthorized)
}

pub fn get_email_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    Ok(get_claims_from_request(req)?.email)
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::*;
    use actix_web::dev::{forward_ready, Service, ServiceRequest, Transform};
    use actix_web::{error::ErrorUnauthorized, Error};
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    pub struct Authentication;

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = actix_web::dev::ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware { service })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = actix_web::dev::ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            // Get Authorization header
            let auth_header = req.headers().get(header::AUTHORIZATION);

            if let Some(auth_header) = auth_header {
                if let Ok(auth_str) = auth_header.to_str() {
                    if let Ok(token) = jwt::extract_token_from_header(auth_str) {
                        if let Ok(claims) = jwt::decode_token(&token) {
                            // Add the claims to the request extensions
                            req.extensions_mut().insert(claims);
                            let fut = self.service.call(req);
                            return Box::pin(async move {
                                fut.await
                            });
                        }
                    }
                }
            }

            Box::pin(async move {
                Err(ErrorUnauthorized("Unauthorized"))
            })
        }
    }
}

// File system utilities for the row and blob stores
pub mod fs_utils {
    use super::*;
    use crate::utils::config::CONFIG;
    use std::io;

    pub const ROW_COLLECTIONS: [&str; 13] = [
        "teams",
        "team_groupings",
        "grouping_status",
        "stages",
        "bugs",
        "mission_packs",
        "updates",
        "bug_submissions",
        "enhancements",
        "brainstorm_maps",
        "presentations",
        "projects",
        "blobs",
    ];

    // Directory holding one JSON document per row of a collection
    pub fn collection_dir(collection: &str) -> PathBuf {
        Path::new(&CONFIG.storage_root).join(collection)
    }

    // Ensure every collection directory exists
    pub fn ensure_storage_layout() -> io::Result<()> {
        for collection in ROW_COLLECTIONS {
            let dir = collection_dir(collection);
            if !dir.exists() {
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
