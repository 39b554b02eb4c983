use super::Service;
use crate::utils::{
    future::BoxFuture,
    thread_safety::{SendSafety, SyncSafety},
};

/// Object-safe view of a clonable service, boxing its future on every call.
trait ErasedService<Request, Response, Error>: SendSafety + SyncSafety {
    fn call_boxed(&mut self, request: Request) -> BoxFuture<'static, Result<Response, Error>>;

    fn clone_boxed(&self) -> Box<dyn ErasedService<Request, Response, Error>>;
}

impl<S, Request, Response, Error> ErasedService<Request, Response, Error> for S
where
    S: Service<Request, Response = Response, Error = Error> + Clone + SendSafety + SyncSafety + 'static,
    S::Future: SendSafety + 'static,
{
    #[inline]
    fn call_boxed(&mut self, request: Request) -> BoxFuture<'static, Result<Response, Error>> {
        Box::pin(self.call(request))
    }

    #[inline]
    fn clone_boxed(&self) -> Box<dyn ErasedService<Request, Response, Error>> {
        Box::new(self.clone())
    }
}

/// Type-erased, clonable service.
///
/// Providers (`ResolveRequest -> RcAnyThreadSafety`) and creators (`Vec<RcAnyThreadSafety> -> RcAnyThreadSafety`)
/// are stored in bindings and in the provider cache behind this type.
pub(crate) struct BoxCloneService<Request, Response, Error>(Box<dyn ErasedService<Request, Response, Error>>);

impl<Request, Response, Error> BoxCloneService<Request, Response, Error> {
    pub(crate) fn new<S>(inner: S) -> Self
    where
        S: Service<Request, Response = Response, Error = Error> + Clone + SendSafety + SyncSafety + 'static,
        S::Future: SendSafety + 'static,
    {
        Self(Box::new(inner))
    }
}

impl<Request, Response, Error> Clone for BoxCloneService<Request, Response, Error> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl<Request, Response, Error> Service<Request> for BoxCloneService<Request, Response, Error> {
    type Response = Response;
    type Error = Error;
    type Future = BoxFuture<'static, Result<Response, Error>>;

    #[inline]
    fn call(&mut self, request: Request) -> Self::Future {
        self.0.call_boxed(request)
    }
}
