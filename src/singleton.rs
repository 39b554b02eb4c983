use futures_util::{
    future::{ready, WeakShared},
    FutureExt as _,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    binding::BoxedCloneProvider,
    container::ResolveRequest,
    errors::ResolveErrorKind,
    service::{BoxCloneService, Service},
    utils::{
        future::BoxFuture,
        thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety},
    },
};

type Outcome = Result<RcAnyThreadSafety, ResolveErrorKind>;

enum State {
    Unstarted,
    /// Only callers awaiting the construction keep it alive, the state itself doesn't.
    /// If every caller gives up before it settles, the construction is dropped and the next call starts over.
    Pending(WeakShared<BoxFuture<'static, Outcome>>),
    Settled(Outcome),
}

/// Provider decorator with at-most-once semantics.
///
/// The first call starts the inner provider, concurrent callers await the same in-flight construction
/// and later callers get the settled outcome. Failures are settled too and never retried.
/// Clones share the state.
#[derive(Clone)]
pub(crate) struct Singleton<S> {
    inner: S,
    state: RcThreadSafety<Mutex<State>>,
}

impl<S> Singleton<S> {
    #[inline]
    #[must_use]
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            state: RcThreadSafety::new(Mutex::new(State::Unstarted)),
        }
    }
}

impl<S> Service<ResolveRequest> for Singleton<S>
where
    S: Service<ResolveRequest, Response = RcAnyThreadSafety, Error = ResolveErrorKind>,
    S::Future: SendSafety + 'static,
{
    type Response = RcAnyThreadSafety;
    type Error = ResolveErrorKind;
    type Future = BoxFuture<'static, Outcome>;

    fn call(&mut self, request: ResolveRequest) -> Self::Future {
        // Transition to `Pending` happens under the lock, without suspension, so only one caller starts the provider
        let mut state = self.state.lock();
        let in_flight = match &*state {
            State::Settled(outcome) => {
                debug!("Singleton settled");
                return Box::pin(ready(outcome.clone()));
            }
            State::Pending(pending) => pending.upgrade(),
            State::Unstarted => None,
        };

        let shared = match in_flight {
            Some(shared) => {
                debug!("Singleton pending, awaiting in-flight construction");
                shared
            }
            None => {
                if matches!(*state, State::Pending(_)) {
                    debug!("Singleton construction abandoned by every caller, starting again");
                } else {
                    debug!("Singleton unstarted, starting construction");
                }

                let shared = (Box::pin(self.inner.call(request)) as BoxFuture<'static, Outcome>).shared();
                if let Some(pending) = shared.downgrade() {
                    *state = State::Pending(pending);
                }
                shared
            }
        };
        drop(state);

        let state = self.state.clone();
        Box::pin(async move {
            let outcome = shared.await;

            let mut state = state.lock();
            if matches!(*state, State::Pending(_)) {
                *state = State::Settled(outcome.clone());
            }
            drop(state);

            outcome
        })
    }
}

/// Default decorator of every binding.
#[must_use]
pub(crate) fn singleton(provider: BoxedCloneProvider) -> BoxedCloneProvider {
    BoxCloneService::new(Singleton::new(provider))
}
