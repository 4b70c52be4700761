//! Tunables for the energy-flow canvas.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::components::energy_flow::NodeRole;

/// Engine configuration. Every field has a default so hosts may pass a
/// partial object (or nothing).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
	/// Smallest node radius in pixels.
	pub node_radius_min: f64,
	/// Largest node radius in pixels.
	pub node_radius_max: f64,
	/// Upper bound of the radius before width scaling is applied.
	pub node_radius_base_max: f64,
	/// Canvas width at which node radii are unscaled.
	pub reference_width: f64,
	/// Narrowest canvas the engine lays out.
	pub min_canvas_width: f64,
	/// Width used when the container cannot be measured.
	pub fallback_canvas_width: f64,

	/// Hard cap on particles per link.
	pub max_particles: usize,
	/// Power that earns one particle over `particle_distance_unit` pixels.
	pub particle_power_unit: f64,
	/// Path length that earns one particle at `particle_power_unit` watts.
	pub particle_distance_unit: f64,
	/// Particle radius in pixels.
	pub particle_size: f64,
	/// Progress per millisecond at zero magnitude and unit speed factor.
	pub base_speed: f64,
	/// Magnitude that doubles the base speed.
	pub speed_reference_power: f64,
	/// Largest multiple of the base speed a strong flow can reach.
	pub max_speed_multiplier: f64,

	/// Stroke width for links with no flow.
	pub line_width_min: f64,
	/// Stroke width cap.
	pub line_width_max: f64,
	/// Node centers closer than this on either axis are treated as co-axial.
	pub coaxial_threshold: f64,
	/// Upper bound on dogleg corner radii.
	pub max_corner_radius: f64,
	/// How far generic curves bow away from the straight line, as a share of the distance.
	pub fallback_bow: f64,

	/// Frame delta used when the measured one is unusable.
	pub fallback_frame_ms: f64,
	/// Frame deltas above this (tab sleeping, debugger) are unusable.
	pub max_frame_ms: f64,

	/// Heading shown above the canvas by the Leptos component.
	pub title: Option<String>,
	/// Interval between data refreshes on the demo page.
	pub refresh_interval_secs: u64,
	/// Display labels per role; roles missing here use their default label.
	pub labels: HashMap<NodeRole, String>,
	/// Icon URLs per role for nodes built from a snapshot.
	pub icons: HashMap<NodeRole, String>,
}

impl Default for FlowConfig {
	fn default() -> Self {
		Self {
			node_radius_min: 18.0,
			node_radius_max: 35.0,
			node_radius_base_max: 25.0,
			reference_width: 600.0,
			min_canvas_width: 150.0,
			fallback_canvas_width: 600.0,
			max_particles: 15,
			particle_power_unit: 400.0,
			particle_distance_unit: 200.0,
			particle_size: 3.0,
			base_speed: 0.00008,
			speed_reference_power: 1000.0,
			max_speed_multiplier: 3.0,
			line_width_min: 1.5,
			line_width_max: 3.0,
			coaxial_threshold: 10.0,
			max_corner_radius: 12.0,
			fallback_bow: 0.15,
			fallback_frame_ms: 16.0,
			max_frame_ms: 1000.0,
			title: None,
			refresh_interval_secs: 30,
			labels: HashMap::new(),
			icons: HashMap::new(),
		}
	}
}

impl FlowConfig {
	/// Label shown for `role`, falling back to the built-in English name.
	pub fn label_for(&self, role: NodeRole) -> String {
		self.labels
			.get(&role)
			.cloned()
			.unwrap_or_else(|| role.default_label().to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_config_keeps_defaults() {
		let config: FlowConfig =
			serde_json::from_str(r#"{ "max_particles": 8, "labels": { "grid": "电网" } }"#)
				.unwrap();
		assert_eq!(config.max_particles, 8);
		assert_eq!(config.node_radius_min, 18.0);
		assert_eq!(config.label_for(NodeRole::Grid), "电网");
		assert_eq!(config.label_for(NodeRole::Solar), "Solar");
		assert_eq!(config.title, None);
	}
}
