//! Adapter from the monitoring snapshot (per-role power with unit suffix and a
//! signed work mode) to [`FlowData`].

use log::warn;
use serde::{Deserialize, Serialize};

use super::types::{FlowData, FlowNode, FlowState, NodeRole};
use crate::config::FlowConfig;

/// A power reading as the monitoring side reports it: either a bare number
/// or a string such as `"1.2kW"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PowerValue {
	Number(f64),
	Text(String),
}

impl Default for PowerValue {
	fn default() -> Self {
		PowerValue::Number(0.0)
	}
}

impl PowerValue {
	/// Watts, or `None` when the text is not a number with a known unit.
	pub fn watts(&self) -> Option<f64> {
		match self {
			PowerValue::Number(n) => Some(*n),
			PowerValue::Text(s) => parse_power(s),
		}
	}
}

/// Strips the unit suffix off a power string and scales it to watts.
pub fn parse_power(raw: &str) -> Option<f64> {
	let raw = raw.trim();
	let split = raw
		.find(|c: char| c.is_ascii_alphabetic())
		.unwrap_or(raw.len());
	let (number, unit) = raw.split_at(split);
	let scale = match unit.trim() {
		"" | "W" | "w" => 1.0,
		"kW" | "KW" | "kw" => 1_000.0,
		"MW" => 1_000_000.0,
		_ => return None,
	};
	number.trim().parse::<f64>().ok().map(|n| n * scale)
}

pub fn format_power(watts: f64) -> String {
	if watts.abs() >= 1_000.0 {
		format!("{:.2} kW", watts / 1_000.0)
	} else {
		format!("{:.0} W", watts)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleReading {
	pub power: PowerValue,
	pub work_mode: i64,
}

/// Latest readings for every role the monitoring side knows about. Missing
/// roles are simply absent from the resulting node set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnergySnapshot {
	pub grid: Option<RoleReading>,
	pub solar: Option<RoleReading>,
	pub battery: Option<RoleReading>,
	pub home_load: Option<RoleReading>,
	pub charger: Option<RoleReading>,
	pub smart_load: Option<RoleReading>,
}

impl EnergySnapshot {
	pub fn reading(&self, role: NodeRole) -> Option<&RoleReading> {
		match role {
			NodeRole::Grid => self.grid.as_ref(),
			NodeRole::Solar => self.solar.as_ref(),
			NodeRole::Battery => self.battery.as_ref(),
			NodeRole::HomeLoad => self.home_load.as_ref(),
			NodeRole::Charger => self.charger.as_ref(),
			NodeRole::SmartLoad => self.smart_load.as_ref(),
		}
	}

	/// Builds the node set; links are left for the engine to derive.
	pub fn into_flow_data(&self, config: &FlowConfig) -> FlowData {
		let nodes = NodeRole::ALL
			.iter()
			.filter_map(|&role| self.reading(role).map(|reading| (role, reading)))
			.map(|(role, reading)| {
				let power = match reading.power.watts() {
					Some(w) if w.is_finite() => w.abs(),
					_ => {
						warn!("unreadable power {:?} for {:?}, using 0", reading.power, role);
						0.0
					}
				};
				FlowNode {
					role,
					label: config.label_for(role),
					display_lines: vec![format_power(power)],
					color: role.default_color().to_string(),
					icon: config.icons.get(&role).cloned(),
					flow_state: FlowState::from_work_mode(reading.work_mode),
					power,
				}
			})
			.collect();
		FlowData { nodes, links: None }
	}
}
