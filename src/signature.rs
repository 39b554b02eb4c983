use crate::{any::TypeInfo, errors::BindingErrorKind};

/// Declared types of a type-erased creator: what it provides and what each positional parameter expects.
///
/// Used with [`crate::Bind::singleton_erased`] when the types are only known at runtime.
/// A missing declaration is reported as a [`BindingErrorKind`] when the creator is bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub provides: Option<TypeInfo>,
    pub parameters: Vec<Option<TypeInfo>>,
}

impl Signature {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            provides: None,
            parameters: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn provides<T: ?Sized + 'static>(mut self) -> Self {
        self.provides = Some(TypeInfo::of::<T>());
        self
    }

    #[inline]
    #[must_use]
    pub fn parameter<T: ?Sized + 'static>(mut self) -> Self {
        self.parameters.push(Some(TypeInfo::of::<T>()));
        self
    }

    /// Checks that every type is declared.
    ///
    /// # Errors
    /// - Returns [`BindingErrorKind::NoProvidedType`] if the provided type isn't declared
    /// - Returns [`BindingErrorKind::UntypedParameter`] with the first parameter whose type isn't declared
    pub fn validate(&self) -> Result<(TypeInfo, Vec<TypeInfo>), BindingErrorKind> {
        let provides = self.provides.ok_or(BindingErrorKind::NoProvidedType)?;
        let parameters = self
            .parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| parameter.ok_or(BindingErrorKind::UntypedParameter { provides, index }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((provides, parameters))
    }
}
