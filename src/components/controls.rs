//! The control panel above the network.

use leptos::prelude::*;
use web_sys::Event;

use crate::attribute::{LinkAttribute, SubPopulation, ZoneAttribute};
use crate::config::ViewConfig;
use crate::model::Schedule;
use crate::view_state::{ViewState, multiplier_from_percent, size_readout};

/// Selectors and sliders driving the view state.
#[component]
pub fn ControlPanel(
	/// Selection the controls edit.
	view: RwSignal<ViewState>,
	/// Tunables.
	config: ViewConfig,
	/// Results schedule; absent when the run has no results.
	schedule: Option<Schedule>,
	/// Number of recorded periods.
	period_count: usize,
	/// Whether the renderer honours the H/S toggle.
	sub_population: bool,
) -> impl IntoView {
	let has_results = schedule.is_some();
	let size_percent = RwSignal::new(config.default_size_percent);

	let on_zone = move |ev: Event| {
		let zone = ZoneAttribute::from_selector(&event_target_value(&ev));
		view.update(|view| view.zone = zone);
	};
	let on_link = move |ev: Event| {
		let link = LinkAttribute::from_selector(&event_target_value(&ev));
		view.update(|view| {
			view.select_link(link, has_results);
		});
	};
	let on_size = move |ev: Event| {
		if let Ok(percent) = event_target_value(&ev).parse::<u32>() {
			size_percent.set(percent);
			view.update(|view| view.size_multiplier = multiplier_from_percent(percent));
		}
	};
	let on_period = move |ev: Event| {
		if let Ok(period) = event_target_value(&ev).parse::<usize>() {
			view.update(|view| view.select_period(period, period_count));
		}
	};
	let on_population = move |ev: Event| {
		let population = SubPopulation::from_selector(&event_target_value(&ev));
		view.update(|view| view.population = population);
	};

	let time_visible = move || view.with(|view| view.time_controls_visible(has_results));
	let period_label = move || {
		schedule
			.as_ref()
			.map(|schedule| schedule.label(view.with(|view| view.period)))
			.unwrap_or_default()
	};

	view! {
		<div id="controls" class="controls">
			<label for="zoneSelector">"Zones"</label>
			<select id="zoneSelector" on:change=on_zone prop:value=move || view.get().zone.selector()>
				{ZoneAttribute::ALL
					.into_iter()
					.map(|zone| view! { <option value=zone.selector()>{zone.label()}</option> })
					.collect_view()}
			</select>

			<label for="linkSelector">"Links"</label>
			<select id="linkSelector" on:change=on_link prop:value=move || view.get().link.selector()>
				{LinkAttribute::available(has_results)
					.into_iter()
					.map(|link| view! { <option value=link.selector()>{link.label()}</option> })
					.collect_view()}
			</select>

			<label for="sizeSlider">"Size"</label>
			<input
				id="sizeSlider"
				type="range"
				min="1"
				max=config.max_size_percent
				prop:value=move || size_percent.get().to_string()
				on:input=on_size
			/>
			<span id="sizeValue">{move || size_readout(size_percent.get())}</span>

			<div id="sliderDiv" style:display=move || if time_visible() { "block" } else { "none" }>
				<input
					id="timeSlider"
					type="range"
					min="0"
					max=period_count.saturating_sub(1)
					prop:value=move || view.get().period.to_string()
					on:input=on_period
				/>
				<span id="slideValue">{period_label}</span>
			</div>

			<Show when=move || sub_population && time_visible()>
				<div id="hssDiv">
					<select
						id="HSSelector"
						on:change=on_population
						prop:value=move || view.get().population.selector()
					>
						{SubPopulation::ALL
							.into_iter()
							.map(|population| {
								view! { <option value=population.selector()>{population.to_string()}</option> }
							})
							.collect_view()}
					</select>
				</div>
			</Show>
		</div>
	}
}
