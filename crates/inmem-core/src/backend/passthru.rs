//! Forwarding of unmocked requests to a real backend.

use crate::types::request::Request;
use crate::types::response::Response;
use std::future::Future;
use std::pin::Pin;

/// Future returned by [`PassThruBackend::forward`].
pub type PassThruFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Transport that sends a request to the real backend.
///
/// The in-memory backend only decides when to pass a request through;
/// failures of the forward are reported through the returned response.
/// Any `Fn(Request) -> impl Future<Output = Response>` closure is a forwarder.
pub trait PassThruBackend: Send + Sync {
    fn forward(&self, request: Request) -> PassThruFuture;
}

impl<F, Fut> PassThruBackend for F
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn forward(&self, request: Request) -> PassThruFuture {
        Box::pin(self(request))
    }
}
