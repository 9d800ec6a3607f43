//! Console logging that works on both build targets. The wasm side goes
//! through the browser console so messages show up in devtools.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
pub fn log_info(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_info(message: &str) {
    eprintln!("[playshelf] {message}");
}

#[cfg(target_arch = "wasm32")]
pub fn log_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_warn(message: &str) {
    eprintln!("[playshelf][warn] {message}");
}

#[cfg(target_arch = "wasm32")]
pub fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_error(message: &str) {
    eprintln!("[playshelf][error] {message}");
}
