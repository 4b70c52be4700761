use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::frame_loop::FrameLoop;
use super::icons::IconCache;
use super::render;
use super::snapshot::EnergySnapshot;
use super::state::{EnergyFlowState, LoopPhase};
use super::types::FlowData;
use crate::config::FlowConfig;
use crate::error::EnergyFlowError;

struct Inner {
	window: Window,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	state: RefCell<EnergyFlowState>,
	icons: RefCell<IconCache>,
	frames: RefCell<FrameLoop>,
	destroyed: Cell<bool>,
}

impl Inner {
	fn container_width(&self) -> f64 {
		self.canvas
			.parent_element()
			.map(|parent| parent.client_width() as f64)
			.unwrap_or(0.0)
	}

	fn apply_size(&self, (width, height): (f64, f64)) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
	}

	fn start_loop(self: &Rc<Self>) -> Result<(), EnergyFlowError> {
		self.state.borrow_mut().start();
		let (this, stalled): (Weak<Inner>, Weak<Inner>) = (Rc::downgrade(self), Rc::downgrade(self));
		let started = self.frames.borrow_mut().start(
			move |timestamp| {
				if let Some(inner) = this.upgrade() {
					inner.frame(timestamp);
				}
			},
			move |_| {
				// The next set_data restarts the loop.
				if let Some(inner) = stalled.upgrade() {
					if let Ok(mut state) = inner.state.try_borrow_mut() {
						state.stop();
					}
				}
			},
		);
		if started.is_err() {
			self.state.borrow_mut().stop();
		}
		started
	}

	fn stop_loop(&self) {
		self.frames.borrow_mut().stop();
		self.state.borrow_mut().stop();
	}

	fn frame(&self, timestamp: f64) {
		let Ok(mut state) = self.state.try_borrow_mut() else {
			return;
		};
		state.advance(timestamp);
		render::render(&state, &self.ctx, &self.icons.borrow());
	}

	fn resize(self: &Rc<Self>) -> Result<(), EnergyFlowError> {
		if self.destroyed.get() {
			return Ok(());
		}
		let was_running = self.state.borrow().phase() == LoopPhase::Running;
		self.stop_loop();
		let size = self.state.borrow_mut().resize(self.container_width());
		self.apply_size(size);
		if was_running {
			self.start_loop()?;
		}
		Ok(())
	}
}

/// Drives one canvas: owns the engine state, the frame loop and the window
/// resize listener. Dropping it is the same as [`destroy`](Self::destroy).
pub struct EnergyFlowController {
	inner: Rc<Inner>,
	resize_listener: Option<Closure<dyn FnMut()>>,
}

impl EnergyFlowController {
	/// Binds to `canvas`, sizes it to its container and starts listening for
	/// window resizes. Nothing is drawn until the first [`set_data`](Self::set_data).
	pub fn new(canvas: HtmlCanvasElement, config: FlowConfig) -> Result<Self, EnergyFlowError> {
		let window = web_sys::window().ok_or(EnergyFlowError::NoWindow)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(EnergyFlowError::ContextUnavailable)?
			.dyn_into()
			.map_err(|_| EnergyFlowError::ContextUnavailable)?;

		let inner = Rc::new(Inner {
			frames: RefCell::new(FrameLoop::new(window.clone())),
			state: RefCell::new(EnergyFlowState::new(config, 0.0)),
			icons: RefCell::new(IconCache::new()),
			destroyed: Cell::new(false),
			window,
			canvas,
			ctx,
		});
		let size = inner.state.borrow_mut().resize(inner.container_width());
		inner.apply_size(size);

		let this = Rc::downgrade(&inner);
		let listener = Closure::<dyn FnMut()>::new(move || {
			let Some(inner) = this.upgrade() else {
				return;
			};
			if let Err(err) = inner.resize() {
				error!("resize failed: {}", err);
			}
		});
		inner
			.window
			.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;

		info!("energy flow canvas ready at {}x{}", size.0, size.1);
		Ok(Self {
			inner,
			resize_listener: Some(listener),
		})
	}

	/// Replaces all nodes and links and starts animating if not already.
	pub fn set_data(&self, data: FlowData) -> Result<(), EnergyFlowError> {
		if self.inner.destroyed.get() {
			warn!("set_data after destroy ignored");
			return Ok(());
		}
		{
			let mut state = self.inner.state.borrow_mut();
			state.set_data(data);
			self.inner.icons.borrow_mut().sync(&state.nodes);
		}
		if self.inner.state.borrow().phase() == LoopPhase::Stopped {
			self.inner.start_loop()?;
		}
		Ok(())
	}

	/// Converts a monitoring snapshot with this canvas's config and applies it.
	pub fn set_snapshot(&self, snapshot: &EnergySnapshot) -> Result<(), EnergyFlowError> {
		let data = snapshot.into_flow_data(&self.inner.state.borrow().config);
		self.set_data(data)
	}

	pub fn set_particle_speed_factor(&self, factor: f64) -> bool {
		self.inner
			.state
			.borrow_mut()
			.set_particle_speed_factor(factor)
	}

	/// Re-measures the container. The loop is paused while layout is
	/// recomputed and resumes only if it was running.
	pub fn resize(&self) -> Result<(), EnergyFlowError> {
		self.inner.resize()
	}

	/// Stops the loop, drops all nodes, links, particles and icons, and
	/// detaches from the window. Safe to call repeatedly.
	pub fn destroy(&mut self) {
		if self.inner.destroyed.replace(true) {
			return;
		}
		self.inner.stop_loop();
		self.inner.state.borrow_mut().clear();
		self.inner.icons.borrow_mut().clear();
		if let Some(listener) = self.resize_listener.take() {
			let _ = self
				.inner
				.window
				.remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
		}
		debug!("energy flow canvas destroyed");
	}
}

impl Drop for EnergyFlowController {
	fn drop(&mut self) {
		self.destroy();
	}
}
