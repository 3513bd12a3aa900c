//! GUI extension forwarding (`spec.md` §4.F, "GUI extension"): the Bridge always answers
//! `get_extension("gui")` with a native GUI implementation backed by a webview helper, which is
//! an external collaborator (`spec.md` §1) injected through this trait rather than hard-linked,
//! so `wclap-bridge` stays free of any particular windowing-toolkit dependency.

/// A host-provided window handle, passed through unchanged from the real host's `clap_window`.
#[derive(Debug, Clone, Copy)]
pub enum WindowHandle {
    X11(u64),
    Win32(*mut std::ffi::c_void),
    Cocoa(*mut std::ffi::c_void),
}

/// The webview backend the Bridge forwards GUI extension calls to. If the sandboxed plugin also
/// implements the `gui` extension, the Bridge forwards the same sizing/scale/title/show/hide
/// calls to it in addition to the webview, keeping both views consistent (`spec.md` §4.F).
pub trait WebviewHost: Send + Sync {
    fn create(&self, plugin_id: &str) -> Result<(), String>;
    fn destroy(&self, plugin_id: &str);
    fn set_size(&self, plugin_id: &str, width: u32, height: u32) -> Result<(), String>;
    fn set_scale(&self, plugin_id: &str, scale: f64);
    fn set_title(&self, plugin_id: &str, title: &str);
    fn show(&self, plugin_id: &str) -> Result<(), String>;
    fn hide(&self, plugin_id: &str) -> Result<(), String>;
    fn attach(&self, plugin_id: &str, parent: WindowHandle) -> Result<(), String>;
}

/// A [`WebviewHost`] that does nothing, used when no real webview collaborator is wired up (e.g.
/// in tests, or hosts that never query the `gui` extension).
#[derive(Default)]
pub struct NullWebviewHost;

impl WebviewHost for NullWebviewHost {
    fn create(&self, _plugin_id: &str) -> Result<(), String> {
        Err("no webview host configured".to_string())
    }
    fn destroy(&self, _plugin_id: &str) {}
    fn set_size(&self, _plugin_id: &str, _width: u32, _height: u32) -> Result<(), String> {
        Err("no webview host configured".to_string())
    }
    fn set_scale(&self, _plugin_id: &str, _scale: f64) {}
    fn set_title(&self, _plugin_id: &str, _title: &str) {}
    fn show(&self, _plugin_id: &str) -> Result<(), String> {
        Err("no webview host configured".to_string())
    }
    fn hide(&self, _plugin_id: &str) -> Result<(), String> {
        Err("no webview host configured".to_string())
    }
    fn attach(&self, _plugin_id: &str, _parent: WindowHandle) -> Result<(), String> {
        Err("no webview host configured".to_string())
    }
}
