use leptos::prelude::*;
use log::error;
use web_sys::HtmlCanvasElement;

use super::controller::EnergyFlowController;
use super::types::FlowData;
use crate::config::FlowConfig;

/// The explicit title wins over the configured one.
fn heading(title: Option<String>, config: &FlowConfig) -> Option<String> {
	title.or_else(|| config.title.clone())
}

#[component]
pub fn EnergyFlowCanvas(
	#[prop(into)] data: Signal<FlowData>,
	#[prop(into, default = Signal::stored(1.0))] speed_factor: Signal<f64>,
	#[prop(optional)] config: FlowConfig,
	#[prop(optional, into)] title: Option<String>,
) -> impl IntoView {
	let title_text = heading(title, &config);
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let controller = StoredValue::new_local(None::<EnergyFlowController>);
	let failure = RwSignal::new(None::<String>);

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let config = config.clone();

		let outcome = controller
			.try_update_value(|slot| {
				if slot.is_none() {
					*slot = Some(EnergyFlowController::new(canvas, config)?);
				}
				match slot {
					Some(c) => c.set_data(data),
					None => Ok(()),
				}
			})
			.unwrap_or(Ok(()));

		if let Err(err) = outcome {
			error!("energy flow canvas failed: {}", err);
			failure.set(Some(err.to_string()));
		}
	});

	Effect::new(move |_| {
		let factor = speed_factor.get();
		controller.with_value(|slot| {
			if let Some(c) = slot {
				c.set_particle_speed_factor(factor);
			}
		});
	});

	on_cleanup(move || {
		controller.try_update_value(|slot| {
			if let Some(mut c) = slot.take() {
				c.destroy();
			}
		});
	});

	view! {
		<div class="energy-flow">
			{title_text
				.map(|text| {
					view! {
						<div class="energy-flow-title" style="text-align: center; margin-bottom: 16px;">
							{text}
						</div>
					}
				})}
			<canvas
				node_ref=canvas_ref
				class="energy-flow-canvas"
				style:display=move || if failure.get().is_some() { "none" } else { "block" }
			/>
			{move || {
				failure.get().map(|msg| view! { <p class="energy-flow-error">{msg}</p> })
			}}
		</div>
	}
}
