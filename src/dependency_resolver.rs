use crate::{any::TypeInfo, errors::ResolveErrorKind, utils::thread_safety::RcAnyThreadSafety};

/// Parameter (or tuple of parameters) a creator can receive from the container.
///
/// [`DependencyResolver::dependencies`] lists the requested types in parameter order,
/// [`DependencyResolver::from_resolved`] consumes the resolved values in the same order.
pub trait DependencyResolver: Sized + 'static {
    fn dependencies() -> Vec<TypeInfo>;

    /// # Errors
    /// - [`ResolveErrorKind::NotPassed`] if `resolved` runs out of values.
    /// - [`ResolveErrorKind::IncorrectType`] if a value is not of the requested type.
    fn from_resolved(resolved: &mut impl Iterator<Item = RcAnyThreadSafety>) -> Result<Self, ResolveErrorKind>;
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            #[inline]
            fn dependencies() -> Vec<TypeInfo> {
                let mut dependencies = Vec::new();
                $( dependencies.extend($ty::dependencies()); )*
                dependencies
            }

            #[inline]
            #[allow(unused_variables)]
            fn from_resolved(resolved: &mut impl Iterator<Item = RcAnyThreadSafety>) -> Result<Self, ResolveErrorKind> {
                Ok(($($ty::from_resolved(resolved)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);
