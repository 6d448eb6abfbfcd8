//! SVG rendering of a legend layout.

use leptos::prelude::*;

use crate::config::ViewConfig;
use crate::legend::{LegendBoard, LegendDimension, LegendLayout};

const TICK_SIZE: f64 = 6.0;

/// One legend: its label, color bars and value axis.
#[component]
pub fn Legend(
	/// Which legend this is.
	dimension: LegendDimension,
	/// Legends of the last draw.
	legends: RwSignal<LegendBoard>,
	/// Label text.
	#[prop(into)]
	title: Signal<String>,
	/// Container height.
	#[prop(into)]
	height: Signal<f64>,
	/// Legend geometry.
	config: ViewConfig,
) -> impl IntoView {
	let width = config.legend_width;
	let layout = move || -> Option<LegendLayout> {
		legends.with(|board| {
			board
				.get(dimension)
				.map(|legend| legend.layout(height.get(), &config))
		})
	};

	view! {
		<div id=dimension.container_id() class="legend-container">
			<p
				id=dimension.label_id()
				class="legend-label"
				style:display=move || legends.with(|board| board.label_display(dimension))
			>
				{move || title.get()}
			</p>
			<svg id=dimension.svg_id() width=width height=move || height.get()>
				<g id=dimension.group_id()>
					{move || layout().map(|layout| draw(layout))}
				</g>
			</svg>
		</div>
	}
}

fn draw(layout: LegendLayout) -> impl IntoView {
	let LegendLayout {
		margin,
		bar_width,
		length,
		bars,
		ticks,
	} = layout;
	let bars = bars
		.into_iter()
		.map(|bar| {
			view! {
				<rect x=0 y=bar.y width=bar_width height=bar.height fill=bar.color />
			}
		})
		.collect_view();
	let ticks = ticks
		.into_iter()
		.map(|tick| {
			view! {
				<g class="tick" transform=format!("translate(0,{})", tick.y)>
					<line x2=TICK_SIZE stroke="currentColor" />
					<text x={TICK_SIZE + 3.0} dy="0.32em" font-size="10">{tick.label}</text>
				</g>
			}
		})
		.collect_view();

	view! {
		{bars}
		<g class="axis" transform=format!("translate({bar_width},{margin})")>
			<line y2=length stroke="currentColor" />
			{ticks}
		</g>
	}
}
