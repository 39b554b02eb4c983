use core::future::Future;

/// Asynchronous function from a request to a result, called through `&mut self` so stateful decorators can wrap it.
pub(crate) trait Service<Request> {
    type Response;
    type Error;
    type Future: Future<Output = Result<Self::Response, Self::Error>>;

    fn call(&mut self, request: Request) -> Self::Future;
}
