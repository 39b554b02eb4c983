use core::{any::TypeId, future::Future};
use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    any::TypeInfo,
    binding::Binding,
    creator::{boxed_creator, boxed_erased_creator, boxed_injectable_creator, boxed_sync_creator, BoxedCloneCreator, Creator, Injectable, SyncCreator},
    dependency_resolver::DependencyResolver,
    errors::{BindingErrorKind, ConstructErrorKind},
    signature::Signature,
    singleton::singleton,
    utils::thread_safety::{RcAnyThreadSafety, SendSafety, SyncSafety},
};

/// Write-only registry builder passed to modules.
///
/// Binding a type that is already bound replaces the previous binding.
/// Dependencies aren't checked here: a missing one is only reported when a provider needing it is called.
pub struct Bind {
    bindings: BTreeMap<TypeId, Binding>,
}

impl Bind {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { bindings: BTreeMap::new() }
    }

    /// Binds a synchronous creator as a singleton of the type it returns.
    #[inline]
    pub fn singleton<C, Deps>(&mut self, creator: C) -> &mut Self
    where
        C: SyncCreator<Deps>,
        Deps: DependencyResolver,
    {
        self.add_binding(TypeInfo::of::<C::Provides>(), Deps::dependencies(), boxed_sync_creator(creator));
        self
    }

    /// Binds an asynchronous creator as a singleton of the type its future resolves to.
    #[inline]
    pub fn singleton_async<C, Deps>(&mut self, creator: C) -> &mut Self
    where
        C: Creator<Deps>,
        Deps: DependencyResolver,
    {
        self.add_binding(TypeInfo::of::<C::Provides>(), Deps::dependencies(), boxed_creator(creator));
        self
    }

    /// Binds `T` as a singleton built by [`Injectable::inject`].
    #[inline]
    pub fn singleton_injectable<T: Injectable>(&mut self) -> &mut Self {
        self.add_binding(
            TypeInfo::of::<T>(),
            T::Dependencies::dependencies(),
            boxed_injectable_creator::<T>(),
        );
        self
    }

    /// Binds a type-erased creator as a singleton of `signature.provides`.
    ///
    /// The creator receives one value per declared parameter, in declaration order,
    /// and must return a value of the provided type.
    ///
    /// # Errors
    /// - Returns [`BindingErrorKind::NoProvidedType`] if the provided type isn't declared
    /// - Returns [`BindingErrorKind::UntypedParameter`] if a parameter type isn't declared
    pub fn singleton_erased<F, Fut>(&mut self, signature: &Signature, creator: F) -> Result<&mut Self, BindingErrorKind>
    where
        F: Fn(Vec<RcAnyThreadSafety>) -> Fut + Clone + SendSafety + SyncSafety + 'static,
        Fut: Future<Output = Result<RcAnyThreadSafety, ConstructErrorKind>> + SendSafety + 'static,
    {
        let (provides, dependencies) = signature.validate()?;
        self.add_binding(provides, dependencies, boxed_erased_creator(creator));
        Ok(self)
    }
}

impl Bind {
    fn add_binding(&mut self, type_info: TypeInfo, dependencies: Vec<TypeInfo>, creator: BoxedCloneCreator) {
        let binding = Binding::new(type_info, dependencies, creator, singleton);

        if self.bindings.insert(type_info.id, binding).is_some() {
            debug!(dependency = type_info.name, "Rebound, previous binding replaced");
        } else {
            debug!(dependency = type_info.name, "Bound");
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn freeze(self) -> Registry {
        Registry { bindings: self.bindings }
    }
}

/// Read-only mapping from type to binding, frozen after all modules ran.
#[derive(Clone)]
pub struct Registry {
    bindings: BTreeMap<TypeId, Binding>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn get(&self, type_id: &TypeId) -> Option<&Binding> {
        self.bindings.get(type_id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.bindings.contains_key(type_id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }
}
