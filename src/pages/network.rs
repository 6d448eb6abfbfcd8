use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlScriptElement};

use crate::components::controls::ControlPanel;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::legend::Legend;
use crate::components::svg_network::SvgNetwork;
use crate::config::ViewConfig;
use crate::error::LoadError;
use crate::legend::{LegendBoard, LegendDimension};
use crate::model::{GraphDataset, ResultsDataset};
use crate::renderer::RendererKind;
use crate::view_state::{ViewState, legend_container_height};

const NETWORK_ID: &str = "network-data";
const RESULTS_ID: &str = "results-data";
const PARAMETERS_ID: &str = "parameters-data";
const CONFIG_ID: &str = "view-config";
const LARGE_NETWORK_ATTR: &str = "data-large-network";

/// Everything the page embeds for one network.
#[derive(Clone, Debug)]
pub struct Payloads {
	/// The network.
	pub graph: Arc<GraphDataset>,
	/// Simulation results, when present and readable.
	pub results: Option<Arc<ResultsDataset>>,
	/// View settings, defaults when absent.
	pub config: ViewConfig,
	/// Renderer requested by the host page, if any.
	pub large_network: Option<bool>,
}

fn script_text(document: &Document, id: &'static str) -> Result<String, LoadError> {
	document
		.get_element_by_id(id)
		.and_then(|element| element.dyn_into::<HtmlScriptElement>().ok())
		.and_then(|script| script.text().ok())
		.ok_or(LoadError::MissingElement(id))
}

/// Read the JSON payloads from their script elements. Only the network is
/// required; broken results or view settings are logged and skipped.
pub fn load_payloads() -> Result<Payloads, LoadError> {
	let document = web_sys::window()
		.and_then(|window| window.document())
		.ok_or(LoadError::MissingElement("document"))?;

	let graph = GraphDataset::from_json(&script_text(&document, NETWORK_ID)?)?;
	let large_network = document
		.get_element_by_id(NETWORK_ID)
		.and_then(|element| element.get_attribute(LARGE_NETWORK_ATTR))
		.and_then(|flag| match flag.trim() {
			"true" => Some(true),
			"false" => Some(false),
			_ => None,
		});

	let config = match script_text(&document, CONFIG_ID) {
		Ok(text) => ViewConfig::from_json(&text).unwrap_or_else(|err| {
			warn!("ignoring view settings: {err}");
			ViewConfig::default()
		}),
		Err(_) => ViewConfig::default(),
	};

	let results = match script_text(&document, RESULTS_ID) {
		Ok(results) => script_text(&document, PARAMETERS_ID)
			.and_then(|parameters| ResultsDataset::from_json(&results, &parameters))
			.map_err(|err| warn!("showing the network without results: {err}"))
			.ok(),
		Err(_) => {
			info!("no simulation results on this page");
			None
		}
	};

	Ok(Payloads {
		graph: Arc::new(graph),
		results: results.map(Arc::new),
		config,
		large_network,
	})
}

fn element_height(document: &Document, id: &str) -> f64 {
	document
		.get_element_by_id(id)
		.and_then(|element| element.dyn_into::<HtmlElement>().ok())
		.map_or(0.0, |element| element.offset_height() as f64)
}

/// Height available to each legend for the current window.
fn measure_legend_height(fixed_margin: f64) -> f64 {
	let Some(window) = web_sys::window() else {
		return 0.0;
	};
	let viewport = window
		.inner_height()
		.ok()
		.and_then(|height| height.as_f64())
		.unwrap_or(0.0);
	let Some(document) = window.document() else {
		return 0.0;
	};
	legend_container_height(
		viewport,
		element_height(&document, "controls"),
		element_height(&document, LegendDimension::Zones.label_id()),
		fixed_margin,
	)
}

/// The page: loads the payloads, or explains why it could not.
#[component]
pub fn NetworkPage() -> impl IntoView {
	match load_payloads() {
		Ok(payloads) => view! { <NetworkView payloads=payloads /> }.into_any(),
		Err(err) => {
			error!("cannot show the network: {err}");
			view! {
				<p class="load-error">{format!("Unable to show the network: {err}")}</p>
			}
			.into_any()
		}
	}
}

/// Controls, the network drawing and its two legends.
#[component]
pub fn NetworkView(payloads: Payloads) -> impl IntoView {
	let Payloads {
		graph,
		results,
		config,
		large_network,
	} = payloads;
	let kind = RendererKind::select(large_network, graph.edges.len(), &config);
	let view = RwSignal::new(ViewState::with_size_percent(config.default_size_percent));
	let legends = RwSignal::new(LegendBoard::default());
	let legend_height = RwSignal::new(0.0);

	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let fixed_margin = config.legend_fixed_margin;
	Effect::new(move |_| {
		legend_height.set(measure_legend_height(fixed_margin));
		let Some(window) = web_sys::window() else {
			return;
		};
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			legend_height.set(measure_legend_height(fixed_margin));
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let schedule = results.as_ref().map(|results| results.schedule);
	let period_count = results.as_ref().map_or(0, |results| results.period_count());
	let network = match kind {
		RendererKind::Small => view! {
			<SvgNetwork
				graph=graph
				results=results
				config=config.clone()
				view=view
				legends=legends
			/>
		}
		.into_any(),
		RendererKind::Large => view! {
			<ForceGraphCanvas
				graph=graph
				results=results
				config=config.clone()
				view=view
				legends=legends
			/>
		}
		.into_any(),
	};

	view! {
		<main class="network-page">
			<ControlPanel
				view=view
				config=config.clone()
				schedule=schedule
				period_count=period_count
				sub_population={kind == RendererKind::Small}
			/>
			<div class="network-body" style="display: flex; height: 85vh;">
				<div class="network-area" style="flex: 1; min-width: 0;">
					{network}
				</div>
				<aside class="legends">
					<Legend
						dimension=LegendDimension::Zones
						legends=legends
						title=Signal::derive(move || view.get().zone.label().to_string())
						height=legend_height
						config=config.clone()
					/>
					<Legend
						dimension=LegendDimension::Links
						legends=legends
						title=Signal::derive(move || view.get().link.label().to_string())
						height=legend_height
						config=config
					/>
				</aside>
			</div>
		</main>
	}
}
