//! Pointer and bound aliases switched by the `thread_safe` feature.
//!
//! With the feature, singletons are shared through [`Arc`](std::sync::Arc) and creators, their futures
//! and the container itself must be `Send + Sync`. Without it, [`Rc`](std::rc::Rc) is used and no bound is required.

use core::any::Any;

#[cfg(feature = "thread_safe")]
pub type RcThreadSafety<T> = std::sync::Arc<T>;
#[cfg(not(feature = "thread_safe"))]
pub type RcThreadSafety<T> = std::rc::Rc<T>;

/// Singleton with its type erased, as stored by providers.
#[cfg(feature = "thread_safe")]
pub type RcAnyThreadSafety = RcThreadSafety<dyn Any + Send + Sync>;
#[cfg(not(feature = "thread_safe"))]
pub type RcAnyThreadSafety = RcThreadSafety<dyn Any>;

#[cfg(feature = "thread_safe")]
pub trait SendSafety: Send {}
#[cfg(feature = "thread_safe")]
impl<T: Send> SendSafety for T {}

#[cfg(feature = "thread_safe")]
pub trait SyncSafety: Sync {}
#[cfg(feature = "thread_safe")]
impl<T: Sync> SyncSafety for T {}

#[cfg(not(feature = "thread_safe"))]
pub trait SendSafety {}
#[cfg(not(feature = "thread_safe"))]
impl<T> SendSafety for T {}

#[cfg(not(feature = "thread_safe"))]
pub trait SyncSafety {}
#[cfg(not(feature = "thread_safe"))]
impl<T> SyncSafety for T {}
