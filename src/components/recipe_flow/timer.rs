//! Scoped `window.setTimeout` handle.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A pending timeout. Dropping it clears the timeout, so a replaced or
/// stopped run can never fire again.
///
/// The callback closure is owned by the caller and must outlive the guard.
#[derive(Debug)]
pub struct Timeout {
	handle: i32,
}

impl Timeout {
	/// Schedules `callback` after `delay_ms`. Returns `None` outside a browser
	/// window or if the browser refuses the timer.
	pub fn set(callback: &Closure<dyn FnMut()>, delay_ms: u32) -> Option<Self> {
		let window = web_sys::window()?;
		let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
		let handle = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				callback.as_ref().unchecked_ref(),
				delay,
			)
			.ok()?;
		Some(Self { handle })
	}
}

impl Drop for Timeout {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			window.clear_timeout_with_handle(self.handle);
		}
	}
}
