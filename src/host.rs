//! JavaScript-facing handle for hosts that are not Leptos apps.

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::components::energy_flow::{
	EnergyFlowController, EnergySnapshot, FlowData, FlowLink, FlowNode,
};
use crate::config::FlowConfig;
use crate::error::EnergyFlowError;

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, EnergyFlowError> {
	serde_wasm_bindgen::from_value(value).map_err(|err| EnergyFlowError::InvalidData(err.to_string()))
}

fn is_absent(value: &JsValue) -> bool {
	value.is_undefined() || value.is_null()
}

/// An energy-flow canvas bound to a host-provided `<canvas>` element.
#[wasm_bindgen]
pub struct EnergyFlowHandle {
	controller: EnergyFlowController,
}

#[wasm_bindgen]
impl EnergyFlowHandle {
	/// `config` may be omitted or partial.
	#[wasm_bindgen(constructor)]
	pub fn new(canvas: HtmlCanvasElement, config: JsValue) -> Result<EnergyFlowHandle, JsValue> {
		let config: FlowConfig = if is_absent(&config) {
			FlowConfig::default()
		} else {
			from_js(config)?
		};
		let controller = EnergyFlowController::new(canvas, config)?;
		Ok(Self { controller })
	}

	/// Replaces all nodes, and the links too when given. Without links they
	/// are derived from each node's flow state.
	#[wasm_bindgen(js_name = setData)]
	pub fn set_data(&self, nodes: JsValue, links: JsValue) -> Result<(), JsValue> {
		let nodes: Vec<FlowNode> = from_js(nodes)?;
		let links: Option<Vec<FlowLink>> = if is_absent(&links) {
			None
		} else {
			Some(from_js(links)?)
		};
		self.controller.set_data(FlowData { nodes, links })?;
		Ok(())
	}

	/// Applies a monitoring snapshot (per-role power and work mode).
	#[wasm_bindgen(js_name = setSnapshot)]
	pub fn set_snapshot(&self, snapshot: JsValue) -> Result<(), JsValue> {
		let snapshot: EnergySnapshot = from_js(snapshot)?;
		self.controller.set_snapshot(&snapshot)?;
		Ok(())
	}

	/// Returns `false` when the factor was rejected.
	#[wasm_bindgen(js_name = setParticleSpeedFactor)]
	pub fn set_particle_speed_factor(&self, factor: f64) -> bool {
		self.controller.set_particle_speed_factor(factor)
	}

	pub fn resize(&self) -> Result<(), JsValue> {
		self.controller.resize()?;
		Ok(())
	}

	pub fn destroy(&mut self) {
		self.controller.destroy();
	}
}
