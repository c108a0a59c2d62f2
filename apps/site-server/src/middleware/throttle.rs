//! Request throttle middleware.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use coulisses_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use coulisses_infra::RequestThrottle;

use crate::client::client_address;

/// Throttle middleware factory. Passes every request through when no throttle is set.
pub struct ThrottleMiddleware {
    throttle: Option<Arc<RequestThrottle>>,
    trust_forwarded: bool,
}

impl ThrottleMiddleware {
    pub fn new(throttle: Option<Arc<RequestThrottle>>, trust_forwarded: bool) -> Self {
        Self {
            throttle,
            trust_forwarded,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ThrottleMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ThrottleMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ThrottleMiddlewareService {
            service,
            throttle: self.throttle.clone(),
            trust_forwarded: self.trust_forwarded,
        }))
    }
}

pub struct ThrottleMiddlewareService<S> {
    service: S,
    throttle: Option<Arc<RequestThrottle>>,
    trust_forwarded: bool,
}

impl<S, B> Service<ServiceRequest> for ThrottleMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let throttled = self.throttle.as_ref().and_then(|throttle| {
            let key = client_address(&req.connection_info(), self.trust_forwarded);
            throttle.check(&key).map(|wait| (key, wait))
        });

        match throttled {
            Some((key, wait)) => {
                // Throttled - return 429 immediately
                tracing::warn!(client = %key, wait_ms = wait.as_millis() as u64, "Request throttled");

                let wait_secs = retry_after_secs(wait);
                let error = ErrorResponse::too_many_requests(format!(
                    "Trop de requêtes. Veuillez réessayer dans {} seconde{}.",
                    wait_secs,
                    if wait_secs > 1 { "s" } else { "" }
                ));

                let response = HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", wait_secs.to_string()))
                    .json(error);

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                Box::pin(async move { Ok(srv_response.map_into_right_body()) })
            }
            None => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
        }
    }
}

/// Whole seconds to wait, rounded up and never zero.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}
