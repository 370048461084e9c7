use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

pub use estudio_di_derive::Build;

pub trait Provider: Sized {
    fn cache(&mut self) -> &mut TypeMap;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}

/// Per-provider cache of built service instances, keyed by their type.
#[derive(Debug, Default)]
pub struct TypeMap {
    slots: HashMap<TypeId, Box<dyn Any>>,
}

impl TypeMap {
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref())
    }

    pub fn insert<T: 'static>(&mut self, value: T) {
        self.slots.insert(TypeId::of::<T>(), Box::new(value));
    }
}

#[macro_export]
macro_rules! provider {
    ($(#[doc=$doc:literal])* $vis:vis $ident:ident {
        $( $service:ident: $service_ty:ty, )*
        $( .. $config:ident: $config_ty:ty { $($shared_ty:ty,)* $(,)? } )*
    }) => {
        $(#[doc=$doc])*
        $vis struct $ident {
            _cache: $crate::TypeMap,
            $( $service: $service_ty, )*
            $( $config: $config_ty, )*
        }

        impl $crate::Provider for $ident {
            fn cache(&mut self) -> &mut $crate::TypeMap {
                &mut self._cache
            }
        }

        $(
            impl $crate::Build<$ident> for $service_ty {
                fn build(provider: &mut $ident) -> Self {
                    ::core::clone::Clone::clone(&provider.$service)
                }
            }
        )*

        $($(
            impl $crate::Build<$ident> for $shared_ty {
                fn build(provider: &mut $ident) -> Self {
                    $crate::Provide::provide(&mut provider.$config)
                }
            }
        )*)*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typemap_keeps_one_instance_per_type() {
        // Arrange
        let mut sut = TypeMap::default();

        // Act
        sut.insert(17u32);
        sut.insert("first".to_owned());
        sut.insert("second".to_owned());

        // Assert
        assert_eq!(sut.get::<u32>(), Some(&17));
        assert_eq!(sut.get::<String>().map(String::as_str), Some("second"));
        assert_eq!(sut.get::<u64>(), None);
    }
}
