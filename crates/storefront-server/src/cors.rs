//! CORS gate for the storefront API.
//!
//! Unlike a rejecting CORS layer, the gate never refuses a request: a
//! disallowed origin simply gets no `Access-Control-Allow-Origin` header and
//! the browser enforces the rest. Every `OPTIONS` request is answered here
//! with an empty `200` and never reaches a handler.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Authorization";

/// Normalized CORS allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

impl AllowedOrigins {
    /// Parse a comma-separated list such as `"https://a.com, https://b.com/"`.
    pub fn parse(raw: &str) -> Self {
        let origins = raw
            .split(',')
            .map(normalize)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { origins }
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        let origin = normalize(origin);
        if !origin.is_empty() && !self.contains(origin) {
            self.origins.push(origin.to_string());
        }
        self
    }

    /// Exact match after trimming whitespace and trailing slashes.
    pub fn contains(&self, origin: &str) -> bool {
        let origin = normalize(origin);
        self.origins.iter().any(|o| o == origin)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.origins
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

/// Replace any CORS headers on `headers` with the gate's policy for `origin`.
pub fn apply_cors_headers(
    headers: &mut HeaderMap,
    origin: Option<&HeaderValue>,
    allowed: &AllowedOrigins,
) {
    // Drop anything an inner handler set, so the response never carries two values
    headers.remove(header::ACCESS_CONTROL_ALLOW_ORIGIN);

    if let Some(origin) = origin {
        match origin.to_str() {
            Ok(o) if allowed.contains(o) => {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                headers.append(header::VARY, HeaderValue::from_static("Origin"));
            }
            _ => tracing::debug!(origin = ?origin, "origin not in CORS allow-list"),
        }
    }

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

/// Middleware factory. Wrap an `App` or `Scope` with it.
#[derive(Clone)]
pub struct CorsGate {
    origins: Arc<AllowedOrigins>,
}

impl CorsGate {
    pub fn new(origins: AllowedOrigins) -> Self {
        Self {
            origins: Arc::new(origins),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CorsGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsGateMiddleware {
            service: Rc::new(service),
            origins: Arc::clone(&self.origins),
        }))
    }
}

pub struct CorsGateMiddleware<S> {
    service: Rc<S>,
    origins: Arc<AllowedOrigins>,
}

impl<S, B> Service<ServiceRequest> for CorsGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let origin = req.headers().get(header::ORIGIN).cloned();

        if req.method() == Method::OPTIONS {
            tracing::debug!(path = %req.path(), "answering CORS preflight");
            let mut res = HttpResponse::Ok().finish();
            apply_cors_headers(res.headers_mut(), origin.as_ref(), &self.origins);
            let res = req.into_response(res).map_into_right_body();
            return Box::pin(ready(Ok(res)));
        }

        let origins = Arc::clone(&self.origins);
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            apply_cors_headers(res.headers_mut(), origin.as_ref(), &origins);
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace_and_trailing_slashes() {
        let origins = AllowedOrigins::parse(" https://shop.example/ ,http://localhost:3000//,, ");
        assert_eq!(
            origins.as_slice(),
            &["https://shop.example".to_string(), "http://localhost:3000".to_string()]
        );
    }

    #[test]
    fn contains_requires_exact_match() {
        let origins = AllowedOrigins::parse("https://shop.example");
        assert!(origins.contains("https://shop.example"));
        assert!(origins.contains("https://shop.example/"));
        assert!(!origins.contains("https://shop.example.evil.com"));
        assert!(!origins.contains("http://shop.example"));
        assert!(!origins.contains(""));
    }

    #[test]
    fn with_origin_does_not_duplicate() {
        let origins = AllowedOrigins::parse("https://a.example")
            .with_origin("https://a.example/")
            .with_origin("https://b.example");
        assert_eq!(origins.as_slice().len(), 2);
    }

    #[test]
    fn apply_replaces_preexisting_allow_origin() {
        let allowed = AllowedOrigins::parse("https://shop.example");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        let origin = HeaderValue::from_static("https://shop.example");
        apply_cors_headers(&mut headers, Some(&origin), &allowed);

        let values: Vec<_> = headers
            .get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .collect();
        assert_eq!(values, vec![&origin]);
    }

    #[test]
    fn apply_clears_allow_origin_for_unknown_origin() {
        let allowed = AllowedOrigins::parse("https://shop.example");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("https://evil.example"),
        );
        let origin = HeaderValue::from_static("https://evil.example");
        apply_cors_headers(&mut headers, Some(&origin), &allowed);

        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }
}
