// Demo host application for winshade: a plain window you can dim.
//
//   Ctrl+Alt+D   toggle the dark panel (works while the host is blocked)
//
// Opacity is loaded from, and saved to, a small JSON config under the user
// config directory, the way a real host application would remember it.

#[cfg(windows)]
fn main() {
    demo::run();
}

#[cfg(not(windows))]
fn main() {
    eprintln!("shade_demo runs on Windows only");
}

#[cfg(windows)]
mod demo {
    use serde::{Deserialize, Serialize};
    use std::fs;
    use std::path::PathBuf;

    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, WPARAM};
    use windows::Win32::Graphics::Gdi::CreateSolidBrush;
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT,
        VK_D,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, PostQuitMessage,
        RegisterClassW, TranslateMessage, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, MSG,
        WINDOW_EX_STYLE, WM_DESTROY, WM_HOTKEY, WNDCLASSW, WS_CAPTION, WS_MINIMIZEBOX,
        WS_OVERLAPPED, WS_SYSMENU, WS_VISIBLE,
    };

    use winshade::Overlay;

    const CLASS_NAME: &str = "WinshadeDemoHost\0";
    const HOTKEY_TOGGLE: i32 = 1;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct DemoConfig {
        opacity: u8,
    }

    impl Default for DemoConfig {
        fn default() -> Self {
            Self {
                opacity: winshade::DEFAULT_OPACITY,
            }
        }
    }

    fn config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("winshade").join("demo.json")
    }

    fn load_config() -> DemoConfig {
        let path = config_path();
        if path.exists() {
            let data = fs::read_to_string(&path).unwrap_or_default();
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            DemoConfig::default()
        }
    }

    fn save_config(config: &DemoConfig) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let data = serde_json::to_string_pretty(config).unwrap_or_default();
        let _ = fs::write(&path, data);
    }

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    fn create_host() -> HWND {
        let class_name = wide(CLASS_NAME);
        let title = wide("winshade demo (Ctrl+Alt+D dims this window)");

        unsafe {
            let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap_or_default();

            let wc = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(wnd_proc),
                hInstance: hinstance.into(),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                hbrBackground: CreateSolidBrush(COLORREF(0x00F5F5F5)),
                ..Default::default()
            };
            RegisterClassW(&wc);

            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX | WS_VISIBLE,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                800,
                600,
                None,
                None,
                Some(hinstance.into()),
                None,
            )
            .expect("create demo window")
        }
    }

    fn toggle(overlay: &mut Overlay) {
        let result = if overlay.is_visible() {
            overlay.hide()
        } else {
            overlay.show()
        };
        if let Err(e) = result {
            log::error!("overlay toggle failed: {e}");
        }
    }

    pub fn run() {
        env_logger::init();

        let cfg = load_config();
        let host = create_host();

        let mut overlay = Overlay::attach(host).expect("attach overlay");
        overlay.set_opacity(cfg.opacity);

        // Thread-level hotkey so the toggle keeps working while the host
        // window is disabled behind the panel.
        let mods = HOT_KEY_MODIFIERS(MOD_CONTROL.0 | MOD_ALT.0 | MOD_NOREPEAT.0);
        unsafe {
            if RegisterHotKey(None, HOTKEY_TOGGLE, mods, VK_D.0 as u32).is_err() {
                log::warn!("Ctrl+Alt+D hotkey unavailable");
            }
        }

        unsafe {
            let mut msg = MSG::default();
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                if msg.message == WM_HOTKEY && msg.wParam.0 == HOTKEY_TOGGLE as usize {
                    toggle(&mut overlay);
                    continue;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        unsafe {
            let _ = UnregisterHotKey(None, HOTKEY_TOGGLE);
        }
        save_config(&DemoConfig {
            opacity: overlay.opacity(),
        });
    }
}
