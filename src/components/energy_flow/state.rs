use std::collections::HashMap;

use log::{debug, warn};

use super::particles::{FlowTarget, MIN_FLOW, Particle, ParticleSettings, ParticleSystem};
use super::paths::{FlowPath, NodeLayout, PathResolver};
use super::topology::{derive_links, flow_allowed};
use super::types::{FlowData, FlowLink, FlowNode, LinkKey, NodeRole};
use crate::config::FlowConfig;

/// Whether the render loop is scheduling frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopPhase {
	#[default]
	Stopped,
	Running,
}

/// Canvas size for a container `container_width` pixels wide: never
/// narrower than the configured minimum, always 3:2.
pub fn canvas_size(container_width: f64, config: &FlowConfig) -> (f64, f64) {
	let width = if container_width.is_finite() && container_width > 0.0 {
		container_width.floor()
	} else {
		config.fallback_canvas_width
	}
	.max(config.min_canvas_width);
	(width, (width * 2.0 / 3.0).floor())
}

/// Node radius for a canvas, growing with the square root of its width.
pub fn node_radius(width: f64, height: f64, config: &FlowConfig) -> f64 {
	let base = (width.min(height) / 15.0).clamp(
		config.node_radius_min,
		config.node_radius_base_max.max(config.node_radius_min),
	);
	(base * (width / config.reference_width).sqrt()).clamp(
		config.node_radius_min,
		config.node_radius_max.max(config.node_radius_min),
	)
}

/// All mutable state of one energy-flow canvas.
pub struct EnergyFlowState {
	pub config: FlowConfig,
	pub nodes: Vec<FlowNode>,
	pub links: Vec<FlowLink>,
	pub layout: NodeLayout,
	pub particles: ParticleSystem,
	pub width: f64,
	pub height: f64,
	resolver: PathResolver,
	paths: HashMap<LinkKey, FlowPath>,
	phase: LoopPhase,
	last_timestamp: Option<f64>,
}

impl EnergyFlowState {
	pub fn new(config: FlowConfig, container_width: f64) -> Self {
		let (width, height) = canvas_size(container_width, &config);
		let radius = node_radius(width, height, &config);
		Self {
			particles: ParticleSystem::new(ParticleSettings::from(&config)),
			resolver: PathResolver::new(&config),
			layout: NodeLayout::new(radius),
			nodes: Vec::new(),
			links: Vec::new(),
			paths: HashMap::new(),
			width,
			height,
			phase: LoopPhase::Stopped,
			last_timestamp: None,
			config,
		}
	}

	/// Replaces every node and link. Links are derived from the nodes' flow
	/// states when `data.links` is `None`.
	pub fn set_data(&mut self, data: FlowData) {
		let FlowData { nodes, links } = data;

		let mut kept: Vec<FlowNode> = Vec::with_capacity(nodes.len());
		for mut node in nodes {
			if kept.iter().any(|n| n.role == node.role) {
				warn!("duplicate node {:?} ignored", node.role);
				continue;
			}
			node.power = sanitize_watts(node.power, "node power", node.role);
			kept.push(node);
		}

		let links = match links {
			Some(links) => {
				let mut unique: Vec<FlowLink> = Vec::with_capacity(links.len());
				for mut link in links {
					if unique.iter().any(|l| l.key() == link.key()) {
						warn!("duplicate link {:?} -> {:?} ignored", link.source, link.target);
						continue;
					}
					link.magnitude = sanitize_watts(link.magnitude, "link magnitude", link.source);
					unique.push(link);
				}
				unique
			}
			None => derive_links(&kept),
		};

		self.nodes = kept;
		self.links = links;
		self.relayout();
		let rebuilt = self.particles.sync(&self.flow_targets());
		debug!(
			"data replaced: {} nodes, {} links, {} rebuilt",
			self.nodes.len(),
			self.links.len(),
			rebuilt
		);
	}

	/// Scales every particle's speed. Returns `false` (and changes nothing)
	/// for factors that are not finite and positive.
	pub fn set_particle_speed_factor(&mut self, factor: f64) -> bool {
		let targets = self.flow_targets();
		let applied = self.particles.set_speed_factor(factor, &targets);
		if applied {
			debug!("particle speed factor set to {}", factor);
		} else {
			warn!("ignoring particle speed factor {}", factor);
		}
		applied
	}

	/// Fits the canvas to a container and re-derives layout and paths.
	/// Particles keep their progress.
	pub fn resize(&mut self, container_width: f64) -> (f64, f64) {
		let (width, height) = canvas_size(container_width, &self.config);
		self.width = width;
		self.height = height;
		self.relayout();
		debug!("resized to {}x{}, node radius {}", width, height, self.layout.radius);
		(width, height)
	}

	pub fn node_radius(&self) -> f64 {
		self.layout.radius
	}

	/// Milliseconds since the previous frame, substituting the fallback
	/// when there is no previous frame or the gap is unusable.
	pub fn frame_delta(&self, timestamp: f64) -> f64 {
		let fallback = self.config.fallback_frame_ms;
		let Some(last) = self.last_timestamp else {
			return fallback;
		};
		let delta = timestamp - last;
		if delta.is_finite() && delta > 0.0 && delta <= self.config.max_frame_ms {
			delta
		} else {
			fallback
		}
	}

	/// Moves particles for the frame at `timestamp` and returns the delta used.
	pub fn advance(&mut self, timestamp: f64) -> f64 {
		let delta = self.frame_delta(timestamp);
		if timestamp.is_finite() {
			self.last_timestamp = Some(timestamp);
		}
		self.particles.advance(delta);
		delta
	}

	pub fn phase(&self) -> LoopPhase {
		self.phase
	}

	pub fn start(&mut self) {
		self.phase = LoopPhase::Running;
		self.last_timestamp = None;
	}

	pub fn stop(&mut self) {
		self.phase = LoopPhase::Stopped;
	}

	/// Stops and forgets all data. Size and configuration are kept.
	pub fn clear(&mut self) {
		self.stop();
		self.nodes.clear();
		self.links.clear();
		self.paths.clear();
		self.particles.clear();
		self.layout = NodeLayout::new(self.layout.radius);
		self.last_timestamp = None;
	}

	pub fn node(&self, role: NodeRole) -> Option<&FlowNode> {
		self.nodes.iter().find(|n| n.role == role)
	}

	pub fn link(&self, key: LinkKey) -> Option<&FlowLink> {
		self.links.iter().find(|l| l.key() == key)
	}

	pub fn path(&self, key: LinkKey) -> Option<&FlowPath> {
		self.paths.get(&key)
	}

	/// Stroke width grows with magnitude between the configured bounds.
	pub fn line_width(&self, link: &FlowLink) -> f64 {
		let magnitude = if link.magnitude.is_finite() {
			link.magnitude.max(0.0)
		} else {
			0.0
		};
		let width = self.layout.radius / 10.0 * (magnitude / 500.0).min(4.0);
		width
			.min(self.config.line_width_max)
			.max(self.config.line_width_min)
	}

	/// A link carries particles when it has flow, both nodes exist, and their
	/// flow states allow the direction.
	pub fn link_visible(&self, link: &FlowLink) -> bool {
		if !(link.magnitude > MIN_FLOW) {
			return false;
		}
		match (self.node(link.source), self.node(link.target)) {
			(Some(source), Some(target)) => {
				flow_allowed(source.role, source.flow_state, target.flow_state)
			}
			_ => false,
		}
	}

	pub fn particle_drawable(&self, particle: &Particle) -> bool {
		self.link(particle.link)
			.is_some_and(|link| self.link_visible(link))
	}

	fn relayout(&mut self) {
		let radius = node_radius(self.width, self.height, &self.config);
		self.layout = NodeLayout::from_ratios(
			self.nodes.iter().map(|n| n.role),
			self.width,
			self.height,
			radius,
		);
		self.paths = self
			.links
			.iter()
			.filter_map(|link| {
				let key = link.key();
				Some((key, self.resolver.resolve(key, &self.layout)?))
			})
			.collect();
	}

	fn flow_targets(&self) -> Vec<FlowTarget> {
		self.links
			.iter()
			.filter(|link| self.link_visible(link))
			.filter_map(|link| {
				let key = link.key();
				Some(FlowTarget {
					key,
					magnitude: link.magnitude,
					distance: self.layout.distance(key)?,
				})
			})
			.collect()
	}
}

fn sanitize_watts(value: f64, what: &str, role: NodeRole) -> f64 {
	if !value.is_finite() {
		warn!("{} for {:?} is not a finite number, using 0", what, role);
		0.0
	} else if value < 0.0 {
		warn!("{} for {:?} is negative ({}), using 0", what, role, value);
		0.0
	} else {
		value
	}
}
