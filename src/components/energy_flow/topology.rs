//! The fixed six-node energy topology: where nodes sit, how each ordered pair
//! is routed, and which flow-state combinations carry particles.
//!
//! Routing is data. Adding a pair means adding a row to [`ROUTES`], not a
//! branch in the path resolver.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::types::NodeRole::{Battery, Charger, Grid, HomeLoad, SmartLoad, Solar};
use super::types::{FlowLink, FlowNode, FlowState, LinkKey, NodeRole};

/// The node particles may leave toward a sourcing node.
pub const HUB: NodeRole = NodeRole::HomeLoad;

/// Position of each role as a share of canvas width and height.
pub fn layout_ratio(role: NodeRole) -> (f64, f64) {
	match role {
		NodeRole::Solar => (0.30, 0.18),
		NodeRole::Battery => (0.70, 0.18),
		NodeRole::Grid => (0.15, 0.55),
		NodeRole::HomeLoad => (0.85, 0.55),
		NodeRole::Charger => (0.62, 0.86),
		NodeRole::SmartLoad => (0.85, 0.86),
	}
}

/// Where a dogleg's pivot comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PivotRule {
	/// Offset from the layout center by `sqrt(node_radius)` along each sign.
	Reference { dx: f64, dy: f64 },
	/// Reflection of another pair's pivot across the hub symmetry axis.
	MirrorOf(LinkKey),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathRecipe {
	Straight,
	/// Cubic with control points level with each endpoint (horizontal S-bend).
	CubicHorizontal,
	/// Cubic with control points plumb with each endpoint (vertical S-bend).
	CubicVertical,
	/// Vertical, horizontal, vertical legs with rounded corners.
	Dogleg {
		start_angle: f64,
		end_angle: f64,
		pivot: PivotRule,
	},
}

#[derive(Clone, Copy, Debug)]
pub struct RouteRule {
	pub key: LinkKey,
	pub recipe: PathRecipe,
}

const fn rule(source: NodeRole, target: NodeRole, recipe: PathRecipe) -> RouteRule {
	RouteRule {
		key: LinkKey::new(source, target),
		recipe,
	}
}

const SOLAR_TO_GRID: LinkKey = LinkKey::new(Solar, Grid);
const SOLAR_TO_HOME: LinkKey = LinkKey::new(Solar, HomeLoad);

/// Lower-left of the source node.
const LOWER_LEFT: f64 = 3.0 * FRAC_PI_4;
/// Lower-right of the source node.
const LOWER_RIGHT: f64 = FRAC_PI_4;
/// Top of the target node.
const TOP: f64 = -FRAC_PI_2;

pub const ROUTES: &[RouteRule] = &[
	rule(Solar, Battery, PathRecipe::Straight),
	rule(Battery, Solar, PathRecipe::Straight),
	rule(HomeLoad, Charger, PathRecipe::Straight),
	rule(Charger, HomeLoad, PathRecipe::Straight),
	rule(HomeLoad, SmartLoad, PathRecipe::Straight),
	rule(SmartLoad, HomeLoad, PathRecipe::Straight),
	rule(Grid, HomeLoad, PathRecipe::CubicHorizontal),
	rule(HomeLoad, Grid, PathRecipe::CubicHorizontal),
	rule(Grid, Solar, PathRecipe::CubicVertical),
	rule(Grid, Battery, PathRecipe::CubicVertical),
	rule(HomeLoad, Solar, PathRecipe::CubicVertical),
	rule(HomeLoad, Battery, PathRecipe::CubicVertical),
	rule(
		Solar,
		Grid,
		PathRecipe::Dogleg {
			start_angle: LOWER_LEFT,
			end_angle: TOP,
			pivot: PivotRule::Reference { dx: -1.0, dy: -1.0 },
		},
	),
	rule(
		Solar,
		HomeLoad,
		PathRecipe::Dogleg {
			start_angle: LOWER_RIGHT,
			end_angle: TOP,
			pivot: PivotRule::Reference { dx: 1.0, dy: -1.0 },
		},
	),
	rule(
		Battery,
		Grid,
		PathRecipe::Dogleg {
			start_angle: LOWER_LEFT,
			end_angle: TOP,
			pivot: PivotRule::MirrorOf(SOLAR_TO_GRID),
		},
	),
	rule(
		Battery,
		HomeLoad,
		PathRecipe::Dogleg {
			start_angle: LOWER_RIGHT,
			end_angle: TOP,
			pivot: PivotRule::MirrorOf(SOLAR_TO_HOME),
		},
	),
];

pub fn route_for(key: LinkKey) -> Option<&'static RouteRule> {
	ROUTES.iter().find(|r| r.key == key)
}

/// Whether a flow from `source` to `target` carries particles.
///
/// Energy moves from a sourcing node into a sinking one; the home hub also
/// feeds nodes that report themselves as sourcing (an active charger or
/// switched-on plug).
pub fn flow_allowed(source: NodeRole, source_state: FlowState, target_state: FlowState) -> bool {
	(source_state == FlowState::Sourcing && target_state == FlowState::Sinking)
		|| (source == HUB && target_state == FlowState::Sourcing)
}

/// Pairs that can carry energy in this topology; links are derived from
/// these when the host does not supply its own.
pub const FLOW_CANDIDATES: &[LinkKey] = &[
	LinkKey::new(Solar, HomeLoad),
	LinkKey::new(Solar, Battery),
	LinkKey::new(Solar, Grid),
	LinkKey::new(Battery, HomeLoad),
	LinkKey::new(Battery, Grid),
	LinkKey::new(Grid, HomeLoad),
	LinkKey::new(Grid, Battery),
	LinkKey::new(HomeLoad, Charger),
	LinkKey::new(HomeLoad, SmartLoad),
];

/// Links implied by the nodes' flow states.
///
/// Magnitude is the power both ends can account for on a source-to-sink
/// flow, and the target's draw when the hub feeds it.
pub fn derive_links(nodes: &[FlowNode]) -> Vec<FlowLink> {
	let find = |role: NodeRole| nodes.iter().find(|n| n.role == role);
	FLOW_CANDIDATES
		.iter()
		.filter_map(|key| Some((find(key.source)?, find(key.target)?)))
		.filter(|(source, target)| flow_allowed(source.role, source.flow_state, target.flow_state))
		.map(|(source, target)| {
			let magnitude = if source.flow_state == FlowState::Sourcing
				&& target.flow_state == FlowState::Sinking
			{
				source.power.abs().min(target.power.abs())
			} else {
				target.power.abs()
			};
			FlowLink {
				source: source.role,
				target: target.role,
				magnitude,
				color: source.color.clone(),
			}
		})
		.collect()
}

/// Canvas angle pointing from a node toward the right (`0`) or left (`PI`).
pub fn horizontal_exit(from_x: f64, to_x: f64) -> f64 {
	if to_x >= from_x { 0.0 } else { PI }
}

/// Canvas angle pointing from a node downward or upward.
pub fn vertical_exit(from_y: f64, to_y: f64) -> f64 {
	if to_y >= from_y { FRAC_PI_2 } else { -FRAC_PI_2 }
}
