use std::time::Duration;

use leptos::prelude::*;
use log::error;

use crate::components::energy_flow::{EnergyFlowCanvas, EnergySnapshot, PowerValue, RoleReading};
use crate::config::FlowConfig;

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn reading(seed: usize, min_kw: f64, max_kw: f64, work_mode: i64) -> Option<RoleReading> {
	let kw = min_kw + rand_simple(seed) * (max_kw - min_kw);
	Some(RoleReading {
		power: PowerValue::Text(format!("{:.2}kW", kw)),
		work_mode,
	})
}

/// A plausible household snapshot that drifts from one tick to the next.
/// On even ticks the battery charges from solar; on odd ticks it discharges
/// and the grid tops the house up.
fn sample_snapshot(tick: usize) -> EnergySnapshot {
	let seed = tick * 7;
	let charging = tick % 2 == 0;
	EnergySnapshot {
		solar: reading(seed, 2.0, 4.0, 1),
		battery: reading(seed + 1, 0.5, 1.5, if charging { -1 } else { 1 }),
		grid: reading(seed + 2, 0.0, 1.0, if charging { 0 } else { 1 }),
		home_load: reading(seed + 3, 1.0, 3.0, -1),
		charger: reading(seed + 4, 0.5, 7.0, 1),
		smart_load: reading(seed + 5, 0.1, 0.4, if charging { 1 } else { 0 }),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = FlowConfig::default();
	let refresh = Duration::from_secs(config.refresh_interval_secs);

	let tick = RwSignal::new(0usize);
	let speed = RwSignal::new(1.0);
	let snapshot_config = config.clone();
	let data = Signal::derive(move || sample_snapshot(tick.get()).into_flow_data(&snapshot_config));

	match set_interval_with_handle(move || tick.update(|t| *t += 1), refresh) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(err) => error!("cannot schedule snapshot refresh: {:?}", err),
	}

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="energy-flow-page">
				<EnergyFlowCanvas data=data speed_factor=speed config=config title="Energy Flow" />
				<label class="speed-control">
					"Particle speed "
					<input
						type="range"
						min="0.25"
						max="4"
						step="0.25"
						prop:value=move || speed.get().to_string()
						on:input=move |ev| {
							if let Ok(factor) = event_target_value(&ev).parse::<f64>() {
								speed.set(factor);
							}
						}
					/>
					{move || format!(" {:.2}x", speed.get())}
				</label>
			</div>
		</ErrorBoundary>
	}
}
