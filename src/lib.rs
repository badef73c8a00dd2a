//! Modal dark-overlay panel for Win32 windows.
//!
//! An [`Overlay`] attaches to exactly one host window. [`Overlay::show`]
//! creates a borderless, alpha-blended, solid-black surface exactly covering
//! the host's client area and blocks interaction with the host until
//! [`Overlay::hide`] destroys the surface again.
//!
//! The widget is Windows-only; on other targets only the portable pieces
//! (error type, attachment bookkeeping) compile.

pub mod error;

#[cfg(any(windows, test))]
mod registry;

#[cfg(windows)]
mod overlay;
#[cfg(windows)]
mod surface;

pub use error::{Error, Result};

#[cfg(windows)]
pub use overlay::{Overlay, DEFAULT_OPACITY};
