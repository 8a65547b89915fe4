//! Rate limiting middleware for the public write endpoints.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use quill_core::ports::RateLimiter;

use super::error::AppError;

/// Where the per-client limiter key is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientKey {
    /// IP of the TCP peer. Cannot be spoofed by the client.
    #[default]
    PeerAddr,
    /// `Forwarded` / `X-Forwarded-For`, falling back to the peer. Only sound
    /// behind a proxy that overwrites these headers.
    Forwarded,
}

impl ClientKey {
    fn of(self, req: &ServiceRequest) -> String {
        let key = match self {
            ClientKey::PeerAddr => req.peer_addr().map(|addr| addr.ip().to_string()),
            ClientKey::Forwarded => req.connection_info().realip_remote_addr().map(str::to_owned),
        };
        key.unwrap_or_else(|| "unknown".to_string())
    }
}

/// Rate limiting middleware factory. Passes everything through without a limiter.
pub struct RateLimitMiddleware {
    limiter: Option<Arc<dyn RateLimiter>>,
    client_key: ClientKey,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Option<Arc<dyn RateLimiter>>, client_key: ClientKey) -> Self {
        Self {
            limiter,
            client_key,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
            client_key: self.client_key,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Option<Arc<dyn RateLimiter>>,
    client_key: ClientKey,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(limiter) = &self.limiter {
            let key = self.client_key.of(&req);

            let result = limiter.check(&key);
            if !result.allowed {
                let retry_after = result.reset_after.as_secs().max(1);
                tracing::warn!(client = %key, path = req.path(), "Rate limit exceeded");

                let response = AppError::TooManyRequests { retry_after }.error_response();

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
