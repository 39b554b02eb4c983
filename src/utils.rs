pub(crate) mod future;
pub mod thread_safety;
