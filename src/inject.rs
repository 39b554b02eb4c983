use crate::{
    any::TypeInfo,
    dependency_resolver::DependencyResolver,
    errors::ResolveErrorKind,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Shared singleton dependency, injected into a creator parameter.
///
/// The wrapped pointer is the same for every creator receiving `Dep` from one container.
pub struct Inject<Dep>(pub RcThreadSafety<Dep>);

impl<Dep: SendSafety + SyncSafety + 'static> DependencyResolver for Inject<Dep> {
    #[inline]
    fn dependencies() -> Vec<TypeInfo> {
        vec![TypeInfo::of::<Dep>()]
    }

    fn from_resolved(resolved: &mut impl Iterator<Item = RcAnyThreadSafety>) -> Result<Self, ResolveErrorKind> {
        let type_info = TypeInfo::of::<Dep>();
        let Some(dependency) = resolved.next() else {
            return Err(ResolveErrorKind::NotPassed { type_info });
        };

        match dependency.downcast::<Dep>() {
            Ok(dependency) => Ok(Self(dependency)),
            Err(incorrect_type) => Err(ResolveErrorKind::IncorrectType {
                expected: type_info,
                actual: (*incorrect_type).type_id(),
            }),
        }
    }
}

impl<Dep> Clone for Inject<Dep> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
