//! Fatal engine errors surfaced to the host.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures that stop the energy-flow canvas from rendering at all.
///
/// Missing nodes, malformed magnitudes and layout races are not errors; the
/// engine recovers from those locally and only logs them.
#[derive(Debug, Clone, Error)]
pub enum EnergyFlowError {
	/// No browser window (not running in a browser context).
	#[error("browser window is not available")]
	NoWindow,

	/// The canvas refused to hand out a 2d rendering context.
	#[error("canvas 2d rendering context is unavailable")]
	ContextUnavailable,

	/// A browser API call failed.
	#[error("browser call failed: {0}")]
	Browser(String),

	/// Host supplied data that could not be deserialized.
	#[error("invalid host data: {0}")]
	InvalidData(String),
}

impl From<JsValue> for EnergyFlowError {
	fn from(value: JsValue) -> Self {
		Self::Browser(format!("{value:?}"))
	}
}

impl From<EnergyFlowError> for JsValue {
	fn from(err: EnergyFlowError) -> Self {
		JsValue::from_str(&err.to_string())
	}
}
