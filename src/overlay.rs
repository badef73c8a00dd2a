// The Overlay widget. One instance binds to one host window: `show()` puts a
// solid-black, alpha-blended surface over the host's client area and blocks
// input to the host; `hide()` takes it down again.
//
// A host accepts at most one overlay at a time. The attachment is recorded
// in the process-global registry and released on drop, so a host can take a
// new overlay once the previous one is gone.
//
// All operations are bound to the thread that created the host window, like
// the window itself. `Overlay` holds an HWND and is therefore not `Send`.

use windows::Win32::Foundation::HWND;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{GetWindowThreadProcessId, IsWindow};

use crate::error::{Error, Result};
use crate::registry;
use crate::surface;

/// Default surface alpha (0 = fully transparent, 255 = opaque black).
pub const DEFAULT_OPACITY: u8 = 100;

/// A modal dark panel bound to one host window.
///
/// The overlay does not own the host and does not keep it alive; it only
/// dims it while visible.
pub struct Overlay {
    host: HWND,
    opacity: u8,
    surface: Option<HWND>,
}

impl Overlay {
    /// Attach a new overlay to `host`.
    ///
    /// Fails with [`Error::NullHost`] for a null handle,
    /// [`Error::HostDestroyed`] for a window that no longer exists,
    /// [`Error::WrongThread`] when called off the host's thread, and
    /// [`Error::AlreadyAttached`] when the host already has an overlay.
    pub fn attach(host: HWND) -> Result<Self> {
        if host.is_invalid() {
            return Err(Error::NullHost);
        }
        ensure_live(host)?;
        ensure_owning_thread(host)?;

        if !registry::claim(host.0 as isize) {
            return Err(Error::AlreadyAttached);
        }
        log::debug!("overlay attached to host {host:?}");

        Ok(Self {
            host,
            opacity: DEFAULT_OPACITY,
            surface: None,
        })
    }

    /// Dim the host: create the surface over its client area at the current
    /// opacity and block input to it until [`hide`](Self::hide).
    ///
    /// If a surface is already up it is recreated, picking up the current
    /// opacity and host geometry.
    pub fn show(&mut self) -> Result<()> {
        self.hide()?;

        let surface = surface::create(self.host, self.opacity)?;
        log::debug!(
            "overlay shown on host {:?} (alpha {})",
            self.host,
            self.opacity
        );
        self.surface = Some(surface);
        Ok(())
    }

    /// Take the surface down and give the host its input back.
    ///
    /// A no-op when nothing is visible, including when the surface was
    /// already destroyed from outside. Fails with [`Error::HostDestroyed`]
    /// if the host itself is gone.
    pub fn hide(&mut self) -> Result<()> {
        ensure_live(self.host)?;
        ensure_owning_thread(self.host)?;

        let Some(surface) = self.surface.take() else {
            return Ok(());
        };
        if unsafe { IsWindow(Some(surface)).as_bool() } {
            surface::destroy(self.host, surface);
            log::debug!("overlay hidden on host {:?}", self.host);
        }
        Ok(())
    }

    /// The alpha applied to the next [`show`](Self::show).
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Set the alpha for the next [`show`](Self::show). A surface that is
    /// already visible keeps the alpha it was shown with.
    pub fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    /// True while a live surface is up.
    pub fn is_visible(&self) -> bool {
        matches!(self.surface, Some(s) if unsafe { IsWindow(Some(s)).as_bool() })
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        // Best-effort teardown. The attachment is released even when the
        // host is already gone, so a new overlay can claim the same handle.
        if let Some(surface) = self.surface.take() {
            if unsafe { IsWindow(Some(surface)).as_bool() } {
                surface::destroy(self.host, surface);
            }
        }
        registry::release(self.host.0 as isize);
    }
}

fn ensure_live(host: HWND) -> Result<()> {
    if unsafe { IsWindow(Some(host)).as_bool() } {
        Ok(())
    } else {
        Err(Error::HostDestroyed)
    }
}

fn ensure_owning_thread(host: HWND) -> Result<()> {
    let owner = unsafe { GetWindowThreadProcessId(host, None) };
    if owner == unsafe { GetCurrentThreadId() } {
        Ok(())
    } else {
        Err(Error::WrongThread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use windows::core::{w, PCWSTR};
    use windows::Win32::Foundation::RECT;
    use windows::Win32::UI::Input::KeyboardAndMouse::IsWindowEnabled;
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DestroyWindow, GetLayeredWindowAttributes, GetWindowRect,
        WINDOW_EX_STYLE, WS_POPUP,
    };

    // A borderless popup at a fixed position, so its client area in screen
    // coordinates is exactly the creation rectangle. The built-in STATIC
    // class avoids registering a test window class.
    fn make_host(x: i32, y: i32, w: i32, h: i32) -> HWND {
        unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                w!("STATIC"),
                PCWSTR::null(),
                WS_POPUP,
                x,
                y,
                w,
                h,
                None,
                None,
                None,
                None,
            )
            .expect("create host window")
        }
    }

    fn surface_alpha(surface: HWND) -> u8 {
        let mut alpha: u8 = 0;
        unsafe {
            GetLayeredWindowAttributes(surface, None, Some(&mut alpha), None)
                .expect("query layered attributes");
        }
        alpha
    }

    #[test]
    fn attach_rejects_null_host() {
        assert!(matches!(
            Overlay::attach(HWND::default()),
            Err(Error::NullHost)
        ));
    }

    #[test]
    fn attach_rejects_destroyed_host() {
        let host = make_host(0, 0, 100, 100);
        unsafe { DestroyWindow(host).expect("destroy host") };
        assert!(matches!(Overlay::attach(host), Err(Error::HostDestroyed)));
    }

    #[test]
    fn second_attach_conflicts_until_first_is_dropped() {
        let host = make_host(0, 0, 100, 100);

        let first = Overlay::attach(host).expect("first attach");
        assert!(matches!(
            Overlay::attach(host),
            Err(Error::AlreadyAttached)
        ));

        drop(first);
        let second = Overlay::attach(host).expect("attach after release");
        drop(second);

        unsafe { DestroyWindow(host).expect("destroy host") };
    }

    #[test]
    fn hide_without_show_is_a_noop() {
        let host = make_host(0, 0, 100, 100);
        let mut overlay = Overlay::attach(host).expect("attach");

        assert!(overlay.hide().is_ok());
        assert!(overlay.hide().is_ok());
        assert!(!overlay.is_visible());

        drop(overlay);
        unsafe { DestroyWindow(host).expect("destroy host") };
    }

    #[test]
    fn default_opacity_is_mid_range() {
        let host = make_host(0, 0, 100, 100);
        let overlay = Overlay::attach(host).expect("attach");
        assert_eq!(overlay.opacity(), DEFAULT_OPACITY);
        drop(overlay);
        unsafe { DestroyWindow(host).expect("destroy host") };
    }

    #[test]
    fn surface_covers_host_client_area() {
        let host = make_host(120, 80, 400, 300);
        let mut overlay = Overlay::attach(host).expect("attach");
        overlay.show().expect("show");

        let surface = overlay.surface.expect("surface present while shown");
        let mut rc = RECT::default();
        unsafe { GetWindowRect(surface, &mut rc).expect("surface rect") };
        assert_eq!((rc.left, rc.top, rc.right, rc.bottom), (120, 80, 520, 380));

        overlay.hide().expect("hide");
        drop(overlay);
        unsafe { DestroyWindow(host).expect("destroy host") };
    }

    #[test]
    fn opacity_change_applies_on_next_show_only() {
        let host = make_host(0, 0, 200, 150);
        let mut overlay = Overlay::attach(host).expect("attach");

        overlay.set_opacity(180);
        overlay.show().expect("show");
        let surface = overlay.surface.expect("surface present");
        assert_eq!(surface_alpha(surface), 180);

        // Mutating while visible does not restyle the live surface.
        overlay.set_opacity(30);
        assert_eq!(surface_alpha(surface), 180);
        assert_eq!(overlay.opacity(), 30);

        // The next show picks it up.
        overlay.show().expect("re-show");
        let surface = overlay.surface.expect("surface present");
        assert_eq!(surface_alpha(surface), 30);

        overlay.hide().expect("hide");
        drop(overlay);
        unsafe { DestroyWindow(host).expect("destroy host") };
    }

    #[test]
    fn show_disables_host_and_hide_restores_it() {
        let host = make_host(0, 0, 200, 150);
        let mut overlay = Overlay::attach(host).expect("attach");

        overlay.show().expect("show");
        assert!(overlay.is_visible());
        unsafe { assert!(!IsWindowEnabled(host).as_bool()) };

        let surface = overlay.surface.expect("surface present");
        overlay.hide().expect("hide");
        assert!(!overlay.is_visible());
        unsafe {
            assert!(IsWindowEnabled(host).as_bool());
            assert!(!IsWindow(Some(surface)).as_bool());
        }

        drop(overlay);
        unsafe { DestroyWindow(host).expect("destroy host") };
    }

    #[test]
    fn reshow_replaces_the_surface() {
        let host = make_host(0, 0, 200, 150);
        let mut overlay = Overlay::attach(host).expect("attach");

        overlay.show().expect("first show");
        let first = overlay.surface.expect("surface present");

        overlay.show().expect("second show");
        assert!(overlay.is_visible());
        unsafe { assert!(!IsWindow(Some(first)).as_bool()) };

        overlay.hide().expect("hide");
        drop(overlay);
        unsafe { DestroyWindow(host).expect("destroy host") };
    }
}
