// Win32 plumbing for the overlay surface: a borderless, layered popup owned
// by the host window, painted solid black and sized to the host's client
// area in screen coordinates.
//
// Modality follows the modal-dialog protocol: the host is disabled while the
// surface lives and re-enabled before the surface is destroyed, so
// activation returns to the host instead of another application.
//
// The window procedure swallows key-release messages while the surface is
// up, and ignores WM_CLOSE; the surface is torn down only through
// `Overlay::hide`.

use std::sync::Mutex;

use windows::core::PCWSTR;
use windows::Win32::Foundation::{
    COLORREF, GetLastError, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM,
};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, EndPaint, FillRect, GetStockObject, MapWindowPoints, BLACK_BRUSH, HBRUSH,
    PAINTSTRUCT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{EnableWindow, SetFocus};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClientRect, RegisterClassW,
    SetLayeredWindowAttributes, ShowWindow, CS_HREDRAW, CS_VREDRAW, LWA_ALPHA, SW_SHOW,
    WM_CLOSE, WM_KEYUP, WM_PAINT, WM_SYSKEYUP, WNDCLASSW, WS_EX_LAYERED, WS_EX_TOOLWINDOW,
    WS_POPUP,
};

use crate::error::{Error, Result};

const CLASS_NAME: &str = "WinshadeSurface\0";

static CLASS_REGISTERED: Mutex<bool> = Mutex::new(false);

unsafe extern "system" fn surface_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            let mut client = RECT::default();
            let _ = GetClientRect(hwnd, &mut client);
            FillRect(hdc, &client, HBRUSH(GetStockObject(BLACK_BRUSH).0));
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }
        // Key releases are suppressed while the panel is up.
        WM_KEYUP | WM_SYSKEYUP => LRESULT(0),
        // The surface has no close affordance; teardown goes through hide().
        WM_CLOSE => LRESULT(0),
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

fn register_class() -> Result<()> {
    let mut registered = CLASS_REGISTERED.lock().unwrap();
    if *registered {
        return Ok(());
    }

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();
        let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(surface_proc),
            hInstance: hinstance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hbrBackground: HBRUSH(GetStockObject(BLACK_BRUSH).0),
            ..Default::default()
        };

        if RegisterClassW(&wc) == 0 {
            return Err(last_error("RegisterClassW"));
        }
    }

    *registered = true;
    Ok(())
}

/// Host client area mapped to screen coordinates.
fn host_bounds(host: HWND) -> Result<RECT> {
    let mut client = RECT::default();
    unsafe { GetClientRect(host, &mut client) }
        .map_err(|e| Error::win32("GetClientRect", e))?;

    let mut corners = [
        POINT {
            x: client.left,
            y: client.top,
        },
        POINT {
            x: client.right,
            y: client.bottom,
        },
    ];
    unsafe {
        let _ = MapWindowPoints(Some(host), None, &mut corners);
    }

    Ok(RECT {
        left: corners[0].x,
        top: corners[0].y,
        right: corners[1].x,
        bottom: corners[1].y,
    })
}

/// Create the surface over `host` at the given alpha and put it up modally.
pub(crate) fn create(host: HWND, opacity: u8) -> Result<HWND> {
    register_class()?;

    let bounds = host_bounds(host)?;
    let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();

        // Created hidden; shown only once the alpha is in place.
        let surface = CreateWindowExW(
            WS_EX_LAYERED | WS_EX_TOOLWINDOW,
            PCWSTR(class_name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP,
            bounds.left,
            bounds.top,
            bounds.right - bounds.left,
            bounds.bottom - bounds.top,
            Some(host),
            None,
            Some(hinstance.into()),
            None,
        )
        .map_err(|e| Error::win32("CreateWindowExW", e))?;

        if let Err(e) = SetLayeredWindowAttributes(surface, COLORREF(0), opacity, LWA_ALPHA) {
            let _ = DestroyWindow(surface);
            return Err(Error::win32("SetLayeredWindowAttributes", e));
        }

        // Disable the host first, as a modal dialog would, then show.
        let _ = EnableWindow(host, false);
        let _ = ShowWindow(surface, SW_SHOW);
        let _ = SetFocus(Some(surface));

        Ok(surface)
    }
}

/// Tear the surface down and give the host its input back. Best-effort;
/// also used from `Drop`.
pub(crate) fn destroy(host: HWND, surface: HWND) {
    unsafe {
        // Re-enable before destroying so activation lands on the host.
        let _ = EnableWindow(host, true);
        let _ = DestroyWindow(surface);
    }
}

/// Capture the current thread's last Win32 error code.
///
/// Must be called immediately after the failing Win32 function;
/// `GetLastError` reads thread-local state that any later API call can
/// overwrite.
fn last_error(function: &'static str) -> Error {
    let code = unsafe { GetLastError() };
    Error::Win32 {
        function,
        code: code.0,
    }
}
