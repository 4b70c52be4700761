//! Animated markers travelling along link paths.
//!
//! Particles refer to their link by [`LinkKey`] and never own it. Counts and
//! speeds are derived from the link's magnitude and length; a link's
//! particles are only rebuilt when its target count changes, so a data
//! refresh with similar readings keeps the animation continuous.

use log::debug;

use super::types::LinkKey;
use crate::config::FlowConfig;

/// Magnitudes at or below this many watts count as no flow.
pub const MIN_FLOW: f64 = 0.5;

/// A flowing link always shows at least this many particles.
const MIN_PARTICLES: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub link: LinkKey,
	/// Position along the path, always in `[0, 1)`.
	pub progress: f64,
	/// Progress per millisecond.
	pub speed: f64,
	pub size: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSettings {
	pub max_particles: usize,
	pub power_unit: f64,
	pub distance_unit: f64,
	pub size: f64,
	pub base_speed: f64,
	pub speed_reference_power: f64,
	pub max_speed_multiplier: f64,
}

impl From<&FlowConfig> for ParticleSettings {
	fn from(config: &FlowConfig) -> Self {
		Self {
			max_particles: config.max_particles,
			power_unit: config.particle_power_unit,
			distance_unit: config.particle_distance_unit,
			size: config.particle_size,
			base_speed: config.base_speed,
			speed_reference_power: config.speed_reference_power,
			max_speed_multiplier: config.max_speed_multiplier,
		}
	}
}

impl Default for ParticleSettings {
	fn default() -> Self {
		Self::from(&FlowConfig::default())
	}
}

/// Particles for a link of `magnitude` watts whose nodes are `distance`
/// pixels apart. Zero without flow, otherwise grows linearly with both
/// inputs between a small floor and `max_particles`.
pub fn derive_particle_count(magnitude: f64, distance: f64, settings: &ParticleSettings) -> usize {
	if !(magnitude > MIN_FLOW) {
		return 0;
	}
	let distance = if distance.is_finite() {
		distance.max(0.0)
	} else {
		0.0
	};
	let raw = (magnitude / settings.power_unit) * (distance / settings.distance_unit);
	let count = if raw.is_nan() { 0 } else { raw.ceil() as usize };
	count.max(MIN_PARTICLES).min(settings.max_particles)
}

/// Progress per millisecond. Rises with magnitude up to
/// `max_speed_multiplier` times the base speed, then scales by the user's
/// speed factor.
pub fn derive_speed(magnitude: f64, speed_factor: f64, settings: &ParticleSettings) -> f64 {
	let magnitude = if magnitude.is_finite() {
		magnitude.max(0.0)
	} else {
		0.0
	};
	let boost = (magnitude / settings.speed_reference_power)
		.min(settings.max_speed_multiplier - 1.0)
		.max(0.0);
	settings.base_speed * (1.0 + boost) * speed_factor
}

/// Brings any progress value back into `[0, 1)`, in either direction.
pub fn wrap_progress(progress: f64) -> f64 {
	if !progress.is_finite() {
		return 0.0;
	}
	let wrapped = progress.rem_euclid(1.0);
	if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// What the particle system needs to know about one visible link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowTarget {
	pub key: LinkKey,
	pub magnitude: f64,
	pub distance: f64,
}

#[derive(Clone, Debug)]
pub struct ParticleSystem {
	particles: Vec<Particle>,
	speed_factor: f64,
	settings: ParticleSettings,
}

impl ParticleSystem {
	pub fn new(settings: ParticleSettings) -> Self {
		Self {
			particles: Vec::new(),
			speed_factor: 1.0,
			settings,
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn speed_factor(&self) -> f64 {
		self.speed_factor
	}

	pub fn count_for(&self, key: LinkKey) -> usize {
		self.particles.iter().filter(|p| p.link == key).count()
	}

	/// Matches the particle set to `targets`, the currently visible links.
	///
	/// Particles of links not in `targets` are dropped. A link keeps its
	/// particles (and their progress) while its target count is unchanged and
	/// only has its speed refreshed. Returns how many links were rebuilt.
	pub fn sync(&mut self, targets: &[FlowTarget]) -> usize {
		self.particles
			.retain(|p| targets.iter().any(|t| t.key == p.link));

		let mut rebuilt = 0;
		for target in targets {
			let want = derive_particle_count(target.magnitude, target.distance, &self.settings);
			let speed = derive_speed(target.magnitude, self.speed_factor, &self.settings);
			if want == self.count_for(target.key) {
				for p in self.particles.iter_mut().filter(|p| p.link == target.key) {
					p.speed = speed;
				}
				continue;
			}
			self.particles.retain(|p| p.link != target.key);
			self.spawn(target.key, want, speed);
			rebuilt += 1;
		}
		if rebuilt > 0 {
			debug!(
				"rebuilt particles for {} link(s), {} total",
				rebuilt,
				self.particles.len()
			);
		}
		rebuilt
	}

	/// Throws every particle away and creates fresh ones for `targets`.
	pub fn regenerate(&mut self, targets: &[FlowTarget]) {
		self.particles.clear();
		for target in targets {
			let count = derive_particle_count(target.magnitude, target.distance, &self.settings);
			let speed = derive_speed(target.magnitude, self.speed_factor, &self.settings);
			self.spawn(target.key, count, speed);
		}
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}

	/// Changes the global speed factor and regenerates. Factors that are not
	/// finite and positive are ignored and `false` is returned.
	pub fn set_speed_factor(&mut self, factor: f64, targets: &[FlowTarget]) -> bool {
		if !(factor.is_finite() && factor > 0.0) {
			return false;
		}
		self.speed_factor = factor;
		self.regenerate(targets);
		true
	}

	/// Moves every particle forward by `elapsed_ms` and wraps it around.
	pub fn advance(&mut self, elapsed_ms: f64) {
		for p in &mut self.particles {
			p.progress = wrap_progress(p.progress + p.speed * elapsed_ms);
		}
	}

	/// Evenly spaced along the path so a fresh link looks settled at once.
	fn spawn(&mut self, key: LinkKey, count: usize, speed: f64) {
		self.particles.extend((0..count).map(|i| Particle {
			link: key,
			progress: i as f64 / count as f64,
			speed,
			size: self.settings.size,
		}));
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::energy_flow::geometry::Point;
	use crate::components::energy_flow::paths::NodeLayout;
	use crate::components::energy_flow::types::NodeRole;

	fn settings() -> ParticleSettings {
		ParticleSettings::default()
	}

	fn target(source: NodeRole, target: NodeRole, magnitude: f64, distance: f64) -> FlowTarget {
		FlowTarget {
			key: LinkKey::new(source, target),
			magnitude,
			distance,
		}
	}

	#[test]
	fn no_flow_means_no_particles() {
		let s = settings();
		assert_eq!(derive_particle_count(0.0, 300.0, &s), 0);
		assert_eq!(derive_particle_count(MIN_FLOW, 300.0, &s), 0);
		assert_eq!(derive_particle_count(f64::NAN, 300.0, &s), 0);
		assert_eq!(derive_particle_count(-50.0, 300.0, &s), 0);
	}

	#[test]
	fn counts_grow_with_power_and_length_up_to_the_cap() {
		let s = settings();
		assert_eq!(derive_particle_count(10.0, 300.0, &s), 2);
		assert_eq!(derive_particle_count(2000.0, 200.0, &s), 5);
		assert_eq!(derive_particle_count(2000.0, 400.0, &s), 10);
		assert_eq!(derive_particle_count(1e9, 400.0, &s), 15);
		assert_eq!(derive_particle_count(f64::INFINITY, 400.0, &s), 15);
		assert_eq!(derive_particle_count(2000.0, f64::NAN, &s), 2);
	}

	#[test]
	fn a_cap_below_the_floor_wins() {
		let s = ParticleSettings {
			max_particles: 1,
			..settings()
		};
		assert_eq!(derive_particle_count(5000.0, 500.0, &s), 1);
	}

	#[test]
	fn stronger_flows_move_faster_until_the_cap() {
		let s = settings();
		let slow = derive_speed(100.0, 1.0, &s);
		let fast = derive_speed(1500.0, 1.0, &s);
		assert!(fast > slow);
		assert_eq!(derive_speed(0.0, 1.0, &s), s.base_speed);
		assert_eq!(derive_speed(1e9, 1.0, &s), s.base_speed * s.max_speed_multiplier);
		assert_eq!(derive_speed(500.0, 2.0, &s), 2.0 * derive_speed(500.0, 1.0, &s));
	}

	#[test]
	fn grid_to_home_scenario_has_particles() {
		let layout = NodeLayout::new(25.0)
			.with(NodeRole::Grid, Point::new(0.0, 300.0))
			.with(NodeRole::Solar, Point::new(0.0, 100.0))
			.with(NodeRole::HomeLoad, Point::new(400.0, 200.0));
		let key = LinkKey::new(NodeRole::Grid, NodeRole::HomeLoad);
		let distance = layout.distance(key).unwrap();
		assert!(derive_particle_count(500.0, distance, &settings()) > 0);
	}

	#[test]
	fn progress_wraps_both_ways() {
		assert_eq!(wrap_progress(1.25), 0.25);
		assert_eq!(wrap_progress(-0.25), 0.75);
		assert_eq!(wrap_progress(1.0), 0.0);
		assert_eq!(wrap_progress(f64::NAN), 0.0);
		let tiny = wrap_progress(-1e-20);
		assert!((0.0..1.0).contains(&tiny));
	}

	#[test]
	fn sync_keeps_progress_when_the_count_is_unchanged() {
		let mut system = ParticleSystem::new(settings());
		let first = [target(NodeRole::Solar, NodeRole::HomeLoad, 2000.0, 400.0)];
		assert_eq!(system.sync(&first), 1);
		system.advance(1000.0);
		let before: Vec<f64> = system.particles().iter().map(|p| p.progress).collect();

		// Slightly different reading, same particle count.
		let second = [target(NodeRole::Solar, NodeRole::HomeLoad, 1950.0, 400.0)];
		assert_eq!(system.sync(&second), 0);
		let after: Vec<f64> = system.particles().iter().map(|p| p.progress).collect();
		assert_eq!(before, after);
		assert_eq!(
			system.particles()[0].speed,
			derive_speed(1950.0, 1.0, &settings())
		);
	}

	#[test]
	fn sync_rebuilds_links_whose_count_changes_and_drops_stale_ones() {
		let mut system = ParticleSystem::new(settings());
		system.sync(&[
			target(NodeRole::Solar, NodeRole::HomeLoad, 2000.0, 400.0),
			target(NodeRole::Grid, NodeRole::Battery, 800.0, 200.0),
		]);
		assert_eq!(system.count_for(LinkKey::new(NodeRole::Grid, NodeRole::Battery)), 2);

		let rebuilt = system.sync(&[target(NodeRole::Solar, NodeRole::HomeLoad, 4000.0, 400.0)]);
		assert_eq!(rebuilt, 1);
		assert_eq!(system.count_for(LinkKey::new(NodeRole::Solar, NodeRole::HomeLoad)), 15);
		assert_eq!(system.count_for(LinkKey::new(NodeRole::Grid, NodeRole::Battery)), 0);
		assert_eq!(system.particles().len(), 15);
	}

	#[test]
	fn speed_factor_regenerates_and_rejects_nonsense() {
		let mut system = ParticleSystem::new(settings());
		let targets = [target(NodeRole::Solar, NodeRole::Battery, 1000.0, 300.0)];
		system.sync(&targets);
		system.advance(5000.0);

		assert!(system.set_speed_factor(2.0, &targets));
		assert_eq!(system.speed_factor(), 2.0);
		assert_eq!(system.particles()[0].progress, 0.0);
		assert_eq!(system.particles()[0].speed, derive_speed(1000.0, 2.0, &settings()));

		assert!(!system.set_speed_factor(0.0, &targets));
		assert!(!system.set_speed_factor(f64::NAN, &targets));
		assert!(!system.set_speed_factor(-1.0, &targets));
		assert_eq!(system.speed_factor(), 2.0);
	}

	#[test]
	fn spawned_particles_are_evenly_spaced() {
		let mut system = ParticleSystem::new(settings());
		system.sync(&[target(NodeRole::Grid, NodeRole::HomeLoad, 2000.0, 400.0)]);
		let progress: Vec<f64> = system.particles().iter().map(|p| p.progress).collect();
		assert_eq!(progress.len(), 10);
		for (i, p) in progress.iter().enumerate() {
			assert!((p - i as f64 / 10.0).abs() < 1e-12);
		}
	}

	proptest! {
		#[test]
		fn progress_stays_in_unit_interval(
			start in 0.0f64..1.0,
			speed in 0.0f64..0.01,
			elapsed in 0.0f64..1e6,
		) {
			let mut system = ParticleSystem::new(settings());
			system.particles.push(Particle {
				link: LinkKey::new(NodeRole::Solar, NodeRole::Grid),
				progress: start,
				speed,
				size: 3.0,
			});
			system.advance(elapsed);
			let p = system.particles()[0].progress;
			prop_assert!((0.0..1.0).contains(&p), "progress {} escaped", p);
		}

		#[test]
		fn count_is_zero_without_flow_for_any_distance(distance in 0.0f64..1e6) {
			prop_assert_eq!(derive_particle_count(0.0, distance, &settings()), 0);
		}

		#[test]
		fn count_never_drops_as_magnitude_rises(
			a in 0.0f64..20_000.0,
			b in 0.0f64..20_000.0,
			distance in 0.0f64..2_000.0,
		) {
			let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
			let s = settings();
			prop_assert!(derive_particle_count(lo, distance, &s) <= derive_particle_count(hi, distance, &s));
		}
	}
}
