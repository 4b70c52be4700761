use serde::{Deserialize, Deserializer, Serialize};

use super::snapshot::PowerValue;

/// Stable identity of a node in the fixed energy topology.
///
/// Display text lives in [`FlowNode::label`]; every layout and routing rule
/// keys off the role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
	Grid,
	Solar,
	Battery,
	HomeLoad,
	Charger,
	SmartLoad,
}

impl NodeRole {
	pub const ALL: [NodeRole; 6] = [
		NodeRole::Grid,
		NodeRole::Solar,
		NodeRole::Battery,
		NodeRole::HomeLoad,
		NodeRole::Charger,
		NodeRole::SmartLoad,
	];

	pub fn default_label(self) -> &'static str {
		match self {
			NodeRole::Grid => "Grid",
			NodeRole::Solar => "Solar",
			NodeRole::Battery => "Battery",
			NodeRole::HomeLoad => "Home",
			NodeRole::Charger => "Charger",
			NodeRole::SmartLoad => "Smart Load",
		}
	}

	pub fn default_color(self) -> &'static str {
		match self {
			NodeRole::Grid => "#20b2aa",
			NodeRole::Solar => "#ffa500",
			NodeRole::Battery => "#32cd32",
			NodeRole::HomeLoad => "#1e90ff",
			NodeRole::Charger => "#9370db",
			NodeRole::SmartLoad => "#ff6b6b",
		}
	}
}

/// Whether a node is currently a net source, a net sink, or doing nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
	Sourcing,
	Sinking,
	#[default]
	Idle,
}

impl FlowState {
	/// Positive work modes source, negative ones sink, zero idles.
	pub fn from_work_mode(mode: i64) -> Self {
		match mode.signum() {
			1 => FlowState::Sourcing,
			-1 => FlowState::Sinking,
			_ => FlowState::Idle,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
	pub role: NodeRole,
	pub label: String,
	#[serde(default)]
	pub display_lines: Vec<String>,
	pub color: String,
	/// Icon image URL (data URLs included).
	#[serde(default)]
	pub icon: Option<String>,
	#[serde(default)]
	pub flow_state: FlowState,
	/// Instantaneous power in watts, sign stripped.
	#[serde(default, deserialize_with = "lenient_watts")]
	pub power: f64,
}

/// A directed flow between two nodes. Identity is the ordered pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowLink {
	pub source: NodeRole,
	pub target: NodeRole,
	#[serde(default, deserialize_with = "lenient_watts")]
	pub magnitude: f64,
	pub color: String,
}

impl FlowLink {
	pub fn key(&self) -> LinkKey {
		LinkKey::new(self.source, self.target)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
	pub source: NodeRole,
	pub target: NodeRole,
}

impl LinkKey {
	pub const fn new(source: NodeRole, target: NodeRole) -> Self {
		Self { source, target }
	}
}

/// One full replacement of the node set, optionally with explicit links.
/// Without links, they are derived from the nodes' flow states.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowData {
	pub nodes: Vec<FlowNode>,
	#[serde(default)]
	pub links: Option<Vec<FlowLink>>,
}

/// Accepts a number, a numeric string with a unit suffix, or null. Anything
/// unusable becomes NaN and is zeroed (and logged) when the data is applied.
fn lenient_watts<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<PowerValue>::deserialize(deserializer)?;
	Ok(value.map_or(0.0, |v| v.watts().unwrap_or(f64::NAN)))
}
