// Process-global record of host windows that currently have an overlay
// attached. Enforces the one-overlay-per-host rule; the entry is released
// when the owning `Overlay` is dropped so the host can accept a new one.
//
// Keys are raw window handles stored as isize, which keeps this module
// portable and testable off-Windows.

use std::sync::Mutex;

static ATTACHED: Mutex<Vec<isize>> = Mutex::new(Vec::new());

/// Record `host` as having an overlay. Returns false if it already has one.
pub(crate) fn claim(host: isize) -> bool {
    let mut attached = ATTACHED.lock().unwrap();
    if attached.contains(&host) {
        return false;
    }
    attached.push(host);
    true
}

/// Forget `host`. Idempotent; releasing an unclaimed host is a no-op.
pub(crate) fn release(host: isize) {
    ATTACHED.lock().unwrap().retain(|h| *h != host);
}
