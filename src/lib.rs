//! Browser view of a transportation network and its per-period simulation
//! results, written as a Leptos client-side app.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod attribute;
pub mod components;
pub mod config;
pub mod encoding;
pub mod error;
pub mod legend;
pub mod model;
mod pages;
pub mod renderer;
pub mod view_state;

use crate::pages::network::NetworkPage;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The app: document metadata plus the network page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<NetworkPage />
	}
}
