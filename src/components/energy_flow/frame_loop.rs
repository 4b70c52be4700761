//! `requestAnimationFrame` scheduling with explicit start and stop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::error::EnergyFlowError;

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Owns at most one frame schedule. Starting again replaces the previous
/// schedule; stopping cancels the pending frame and releases the callback.
pub struct FrameLoop {
	window: Window,
	callback: FrameClosure,
	pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			callback: Rc::new(RefCell::new(None)),
			pending: Rc::new(Cell::new(None)),
		}
	}

	/// Calls `on_frame` with the rAF timestamp on every frame until stopped.
	/// If a later frame cannot be booked the loop ends and `on_stall` hears
	/// why; the owner must not drop the loop from inside `on_stall`.
	pub fn start<F, S>(&mut self, mut on_frame: F, mut on_stall: S) -> Result<(), EnergyFlowError>
	where
		F: FnMut(f64) + 'static,
		S: FnMut(EnergyFlowError) + 'static,
	{
		self.stop();

		let (window, pending) = (self.window.clone(), self.pending.clone());
		let this = Rc::downgrade(&self.callback);
		*self.callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
			pending.set(None);
			on_frame(timestamp);

			// Stopped from inside `on_frame`, or the loop is gone.
			let Some(callback) = this.upgrade() else {
				return;
			};
			let Some(outcome) = callback.borrow().as_ref().map(|cb| {
				window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.map_err(EnergyFlowError::from)
			}) else {
				return;
			};
			if let Some(err) = record_schedule(outcome, &pending) {
				error!("animation loop stalled: {}", err);
				on_stall(err);
			}
		}));

		let callback = self.callback.borrow();
		if let Some(cb) = callback.as_ref() {
			let id = self
				.window
				.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.pending.set(Some(id));
		}
		Ok(())
	}

	pub fn stop(&mut self) {
		if let Some(id) = self.pending.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}

/// Remembers a booked frame, or hands back why booking failed.
fn record_schedule(
	outcome: Result<i32, EnergyFlowError>,
	pending: &Cell<Option<i32>>,
) -> Option<EnergyFlowError> {
	match outcome {
		Ok(id) => {
			pending.set(Some(id));
			None
		}
		Err(err) => {
			pending.set(None);
			Some(err)
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}
