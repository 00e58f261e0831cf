//! Creator adapters.
//!
//! A creator produces exactly one concrete component type from a
//! construction argument. Two strategies share the [`Creator`] interface:
//! [`TypeCreator`] delegates to the produced type's own [`Creatable`] hook,
//! [`FnCreator`] wraps an external construction function.
//!
//! Registration is an explicit step (`register`) rather than a side effect
//! of construction, so startup order is whatever the caller's startup
//! sequence says it is.

use std::any::type_name;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::registry::Registry;

/// Uniform creation interface stored by a [`Registry`].
///
/// `O` is the object family handed back to callers (typically a boxed
/// trait object), `A` the construction argument bundle.
pub trait Creator<O, A: ?Sized>: Send + Sync {
    /// Builds one instance, or `None` if this creator cannot handle `arg`.
    fn create_instance(&self, arg: &A) -> Option<O>;

    /// Name of the concrete type this creator produces.
    fn produced_type(&self) -> &'static str;
}

/// Construction hook implemented by a concrete component type.
///
/// Returning `None` lets multi-valued keys fall through to the next
/// candidate.
pub trait Creatable<O, A: ?Sized> {
    fn create(arg: &A) -> Option<O>;
}

/// Creator bound to one concrete type `T` through its [`Creatable`] hook.
pub struct TypeCreator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypeCreator<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Registers a new creator for `T` under `key`.
    ///
    /// Returns `false` when the key is already bound and `multi` is false;
    /// the creator is then dropped without being reachable.
    pub fn register<K, O, A>(registry: &Registry<K, O, A>, key: K, multi: bool) -> bool
    where
        T: Creatable<O, A> + 'static,
        K: Ord + Clone + Display + Send + Sync + 'static,
        O: 'static,
        A: ?Sized + 'static,
    {
        registry.register(key, Arc::new(Self::new()), multi)
    }
}

impl<T> Default for TypeCreator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O, A> Creator<O, A> for TypeCreator<T>
where
    T: Creatable<O, A> + 'static,
    A: ?Sized,
{
    fn create_instance(&self, arg: &A) -> Option<O> {
        T::create(arg)
    }

    fn produced_type(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Creator bound to an external construction function.
///
/// `T` only names the produced type for diagnostics; the function is
/// free to build the object however it likes.
pub struct FnCreator<T, F> {
    constructor: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> FnCreator<T, F> {
    pub fn new(constructor: F) -> Self {
        Self {
            constructor,
            _marker: PhantomData,
        }
    }

    /// Registers `constructor` under `key`. See [`TypeCreator::register`].
    pub fn register<K, O, A>(
        registry: &Registry<K, O, A>,
        key: K,
        constructor: F,
        multi: bool,
    ) -> bool
    where
        T: 'static,
        F: Fn(&A) -> Option<O> + Send + Sync + 'static,
        K: Ord + Clone + Display + Send + Sync + 'static,
        O: 'static,
        A: ?Sized + 'static,
    {
        registry.register(key, Arc::new(Self::new(constructor)), multi)
    }
}

impl<T, F, O, A> Creator<O, A> for FnCreator<T, F>
where
    T: 'static,
    F: Fn(&A) -> Option<O> + Send + Sync,
    A: ?Sized,
{
    fn create_instance(&self, arg: &A) -> Option<O> {
        (self.constructor)(arg)
    }

    fn produced_type(&self) -> &'static str {
        type_name::<T>()
    }
}
