// Central error type. Every fallible operation in winshade returns
// `error::Result<T>`; failures are signaled synchronously to the caller and
// nothing is retried or recovered internally.

/// Every error winshade can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host window handle was null.
    #[error("host window is null")]
    NullHost,

    /// The host window has already been destroyed.
    #[error("host window has been destroyed")]
    HostDestroyed,

    /// The host window already has an overlay attached.
    #[error("host window already has an overlay attached")]
    AlreadyAttached,

    /// The call was made from a thread that does not own the host window.
    /// Win32 windows are bound to the thread that created them.
    #[error("overlay used from a thread that does not own the host window")]
    WrongThread,

    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },
}

#[cfg(windows)]
impl Error {
    // HRESULT.0 is i32; reinterpret the bits as u32 for display.
    pub(crate) fn win32(function: &'static str, e: windows::core::Error) -> Self {
        Self::Win32 {
            function,
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
