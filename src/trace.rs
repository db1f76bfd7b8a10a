//! Logging shims.
//!
//! With the `tracing` feature enabled the mutation paths emit events
//! through the `tracing` crate; without it (the default) the macros
//! expand to nothing and the hot paths carry zero logging cost.

#![allow(unused_macros, unused_imports)]

#[cfg(feature = "tracing")]
macro_rules! trace_op {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_op {
    ($($arg:tt)*) => {};
}

pub(crate) use trace_op;
