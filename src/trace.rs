use core::fmt::{self, Display, Formatter};

use crate::any::TypeInfo;

/// Chain of types being resolved within one top-level request, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionTrace(Vec<TypeInfo>);

impl ResolutionTrace {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.0.contains(type_info)
    }

    /// Returns the trace extended with `type_info`, leaving `self` untouched for sibling resolutions.
    #[must_use]
    pub fn with(&self, type_info: TypeInfo) -> Self {
        let mut types = Vec::with_capacity(self.0.len() + 1);
        types.extend_from_slice(&self.0);
        types.push(type_info);
        Self(types)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[TypeInfo] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ResolutionTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut types = self.0.iter();
        if let Some(first) = types.next() {
            f.write_str(first.short_name())?;
        }
        for type_info in types {
            write!(f, " -> {}", type_info.short_name())?;
        }
        Ok(())
    }
}
