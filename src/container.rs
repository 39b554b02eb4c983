use core::any::TypeId;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, debug_span, error, Instrument as _};

use crate::{
    any::TypeInfo,
    binding::BoxedCloneProvider,
    errors::{BindingErrorKind, ResolveErrorKind},
    registry::{Bind, Registry},
    service::Service as _,
    trace::ResolutionTrace,
    utils::{
        future::BoxFuture,
        thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
    },
};

#[cfg(feature = "thread_safe")]
type BoxedModule = Box<dyn FnOnce(&mut Bind) -> Result<(), BindingErrorKind> + Send>;

#[cfg(not(feature = "thread_safe"))]
type BoxedModule = Box<dyn FnOnce(&mut Bind) -> Result<(), BindingErrorKind>>;

/// Request of a compiled provider: the container to resolve dependencies from and the current resolution chain.
#[derive(Clone)]
pub(crate) struct ResolveRequest {
    pub(crate) container: Container,
    pub(crate) trace: ResolutionTrace,
}

struct ContainerInner {
    registry: Registry,
    providers: Mutex<BTreeMap<TypeId, BoxedCloneProvider>>,
}

/// Resolves singletons from the bindings declared by modules.
///
/// Clones share the bindings and every constructed value.
#[derive(Clone)]
pub struct Container {
    inner: RcThreadSafety<ContainerInner>,
}

impl Container {
    /// Creates container from a single module
    ///
    /// # Errors
    /// Returns the error raised by the module
    #[inline]
    pub fn new<M>(module: M) -> Result<Self, BindingErrorKind>
    where
        M: FnOnce(&mut Bind) -> Result<(), BindingErrorKind> + SendSafety + 'static,
    {
        Self::builder().module(module).build()
    }

    #[inline]
    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder { modules: Vec::new() }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Gets a singleton from the container, constructing it and its dependencies on first request.
    ///
    /// Concurrent and later calls for the same type share one construction and its outcome, error included.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoBinding`] if the type or one of its dependencies isn't bound
    /// - Returns [`ResolveErrorKind::CyclicDependency`] if the type depends on itself
    /// - Returns [`ResolveErrorKind::Provider`] if a creator or a dependency failed
    pub async fn get<Dep: SendSafety + SyncSafety + 'static>(&self) -> Result<RcThreadSafety<Dep>, ResolveErrorKind> {
        let type_info = TypeInfo::of::<Dep>();

        let dependency = self.resolve(type_info, ResolutionTrace::new()).await?;
        match dependency.downcast::<Dep>() {
            Ok(dependency) => Ok(dependency),
            Err(incorrect_type) => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: type_info,
                    actual: (*incorrect_type).type_id(),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Gets a singleton by its type info, without downcasting it.
    ///
    /// # Errors
    /// Same as [`Container::get`]
    #[inline]
    pub async fn get_erased(&self, type_info: TypeInfo) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        self.resolve(type_info, ResolutionTrace::new()).await
    }
}

impl Container {
    /// Resolves `type_info` as part of the chain `trace`.
    /// Providers call it back for their dependencies, so the returned future owns everything it needs.
    pub(crate) fn resolve(&self, type_info: TypeInfo, trace: ResolutionTrace) -> BoxFuture<'static, Result<RcAnyThreadSafety, ResolveErrorKind>> {
        let span = debug_span!("resolve", dependency = type_info.name);
        let container = self.clone();

        Box::pin(
            async move {
                let Some(binding) = container.inner.registry.get(&type_info.id) else {
                    let err = ResolveErrorKind::NoBinding { type_info };
                    debug!("{}", err);
                    return Err(err);
                };

                if trace.contains(&type_info) {
                    let err = ResolveErrorKind::CyclicDependency {
                        trace: trace.with(type_info),
                    };
                    error!("{}", err);
                    return Err(err);
                }

                let mut provider = {
                    let mut providers = container.inner.providers.lock();
                    providers
                        .entry(type_info.id)
                        .or_insert_with(|| {
                            debug!("Provider compiled");
                            binding.compile()
                        })
                        .clone()
                };

                let trace = trace.with(type_info);
                provider.call(ResolveRequest { container, trace }).await
            }
            .instrument(span),
        )
    }
}

/// Collects modules and runs them, in order, when the container is built.
pub struct ContainerBuilder {
    modules: Vec<BoxedModule>,
}

impl ContainerBuilder {
    #[inline]
    #[must_use]
    pub fn module<M>(mut self, module: M) -> Self
    where
        M: FnOnce(&mut Bind) -> Result<(), BindingErrorKind> + SendSafety + 'static,
    {
        self.modules.push(Box::new(module));
        self
    }

    /// Runs every module once against a fresh [`Bind`], then freezes the bindings.
    ///
    /// # Errors
    /// Returns the first error raised by a module, no container is built then
    pub fn build(self) -> Result<Container, BindingErrorKind> {
        let mut bind = Bind::new();
        for (index, module) in self.modules.into_iter().enumerate() {
            if let Err(err) = module(&mut bind) {
                error!(module = index, "{}", err);
                return Err(err);
            }
        }

        let registry = bind.freeze();
        debug!(bindings = registry.len(), "Container built");

        Ok(Container {
            inner: RcThreadSafety::new(ContainerInner {
                registry,
                providers: Mutex::new(BTreeMap::new()),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Container;
    use crate::{
        any::TypeInfo,
        errors::{BindingErrorKind, ConstructErrorKind, ProviderErrorKind, ResolveErrorKind},
        utils::thread_safety::RcThreadSafety,
        Bind, Inject,
    };

    use core::{
        sync::atomic::{AtomicU8, Ordering},
        time::Duration,
    };
    use tracing::debug;
    use tracing_test::traced_test;

    struct A(RcThreadSafety<B>, RcThreadSafety<C>);
    struct B(i32);
    struct C(RcThreadSafety<CA>);
    struct CA(RcThreadSafety<CAA>);
    struct CAA(RcThreadSafety<CAAA>);
    struct CAAA;

    struct Cyclic(#[allow(dead_code)] RcThreadSafety<Cyclic2>);
    struct Cyclic2(#[allow(dead_code)] RcThreadSafety<Cyclic>);

    #[tokio::test]
    #[traced_test]
    async fn test_transitive_resolve() {
        let call_count = RcThreadSafety::new(AtomicU8::new(0));

        let container = Container::new({
            let call_count = call_count.clone();
            move |bind: &mut Bind| {
                bind.singleton(|Inject(b): Inject<B>, Inject(c): Inject<C>| Ok::<_, ConstructErrorKind>(A(b, c)))
                    .singleton_async(move || {
                        let call_count = call_count.clone();
                        async move {
                            call_count.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(5)).await;

                            debug!("Call creator B");
                            Ok::<_, ConstructErrorKind>(B(2))
                        }
                    })
                    .singleton(|Inject(ca): Inject<CA>| Ok::<_, ConstructErrorKind>(C(ca)))
                    .singleton(|Inject(caa): Inject<CAA>| Ok::<_, ConstructErrorKind>(CA(caa)))
                    .singleton(|Inject(caaa): Inject<CAAA>| Ok::<_, ConstructErrorKind>(CAA(caaa)))
                    .singleton(|| Ok::<_, ConstructErrorKind>(CAAA));
                Ok(())
            }
        })
        .unwrap();

        let a = container.get::<A>().await.unwrap();
        let b = container.get::<B>().await.unwrap();
        let caaa = container.get::<CAAA>().await.unwrap();

        assert_eq!(a.0 .0, 2);
        assert!(RcThreadSafety::ptr_eq(&a.0, &b));
        assert!(RcThreadSafety::ptr_eq(&a.1 .0 .0 .0, &caaa));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_concurrent_first_access() {
        let call_count = RcThreadSafety::new(AtomicU8::new(0));

        let container = Container::new({
            let call_count = call_count.clone();
            move |bind: &mut Bind| {
                bind.singleton_async(move || {
                    let call_count = call_count.clone();
                    async move {
                        call_count.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        Ok::<_, ConstructErrorKind>(B(1))
                    }
                });
                Ok(())
            }
        })
        .unwrap();

        let (b_1, b_2, b_3) = tokio::join!(container.get::<B>(), container.get::<B>(), container.get_erased(TypeInfo::of::<B>()));

        let (b_1, b_2) = (b_1.unwrap(), b_2.unwrap());
        assert!(RcThreadSafety::ptr_eq(&b_1, &b_2));
        assert!(b_3.unwrap().downcast::<B>().is_ok());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_cancelled_get_releases_container() {
        let marker = RcThreadSafety::new(());

        let container = Container::new({
            let marker = marker.clone();
            move |bind: &mut Bind| {
                bind.singleton_async(move || {
                    let marker = marker.clone();
                    async move {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        drop(marker);
                        Ok::<_, ConstructErrorKind>(CAAA)
                    }
                });
                Ok(())
            }
        })
        .unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(10), container.get::<CAAA>()).await;
        assert!(timed_out.is_err());

        drop(container);
        assert_eq!(RcThreadSafety::strong_count(&marker), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_no_binding() {
        let container = Container::new(|bind: &mut Bind| {
            bind.singleton(|Inject(ca): Inject<CA>| Ok::<_, ConstructErrorKind>(C(ca)));
            Ok(())
        })
        .unwrap();

        let err = container.get::<B>().await.err().unwrap();
        assert!(matches!(err, ResolveErrorKind::NoBinding { type_info } if type_info == TypeInfo::of::<B>()));

        let err = container.get::<C>().await.err().unwrap();
        assert!(matches!(
            err,
            ResolveErrorKind::Provider { type_info, kind: ProviderErrorKind::Deps(ref err) }
                if type_info == TypeInfo::of::<C>() && matches!(**err, ResolveErrorKind::NoBinding { .. })
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_cyclic_dependency() {
        let container = Container::new(|bind: &mut Bind| {
            bind.singleton(|Inject(cyclic): Inject<Cyclic2>| Ok::<_, ConstructErrorKind>(Cyclic(cyclic)))
                .singleton(|Inject(cyclic): Inject<Cyclic>| Ok::<_, ConstructErrorKind>(Cyclic2(cyclic)));
            Ok(())
        })
        .unwrap();

        let err = container.get::<Cyclic>().await.err().unwrap();

        let ResolveErrorKind::Provider {
            type_info,
            kind: ProviderErrorKind::Deps(cause),
        } = err
        else {
            panic!("provider error expected");
        };
        assert_eq!(type_info, TypeInfo::of::<Cyclic>());

        let ResolveErrorKind::Provider {
            type_info,
            kind: ProviderErrorKind::Deps(cause),
        } = &*cause
        else {
            panic!("provider error expected");
        };
        assert_eq!(*type_info, TypeInfo::of::<Cyclic2>());
        assert!(matches!(**cause, ResolveErrorKind::CyclicDependency { .. }));
        assert_eq!(cause.to_string(), "Cyclic dependency detected: Cyclic -> Cyclic2 -> Cyclic");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_self_dependency() {
        let container = Container::new(|bind: &mut Bind| {
            bind.singleton(|Inject(b): Inject<B>| Ok::<_, ConstructErrorKind>(B(b.0 + 1)));
            Ok(())
        })
        .unwrap();

        let err = container.get::<B>().await.err().unwrap();
        assert!(matches!(
            err,
            ResolveErrorKind::Provider { kind: ProviderErrorKind::Deps(ref cause), .. }
                if matches!(**cause, ResolveErrorKind::CyclicDependency { ref trace } if trace.len() == 2)
        ));

        // Failure is settled, the creator isn't retried
        let err_2 = container.get::<B>().await.err().unwrap();
        assert_eq!(err.to_string(), err_2.to_string());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_builder_runs_modules_in_order() {
        let container = Container::builder()
            .module(|bind: &mut Bind| {
                bind.singleton(|| Ok::<_, ConstructErrorKind>(B(1)));
                Ok(())
            })
            .module(|bind: &mut Bind| {
                bind.singleton(|| Ok::<_, ConstructErrorKind>(B(2)))
                    .singleton(|| Ok::<_, ConstructErrorKind>(CAAA));
                Ok(())
            })
            .build()
            .unwrap();

        assert_eq!(container.registry().len(), 2);
        assert_eq!(container.get::<B>().await.unwrap().0, 2);
    }

    #[test]
    #[traced_test]
    fn test_builder_module_error() {
        let run_count = RcThreadSafety::new(AtomicU8::new(0));

        let result = Container::builder()
            .module(|_bind: &mut Bind| Err(anyhow::anyhow!("module failed").into()))
            .module({
                let run_count = run_count.clone();
                move |_bind: &mut Bind| {
                    run_count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .build();

        assert!(matches!(result, Err(BindingErrorKind::Custom(err)) if err.to_string() == "module failed"));
        assert_eq!(run_count.load(Ordering::SeqCst), 0);
    }
}
