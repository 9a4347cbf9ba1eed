//! Pace chart front end using Yew.
//! Owns the storage handle and both engines, and switches between pages.

use log::info;
use pacechart::storage;
use yew::prelude::*;

mod components;
mod hooks;

use components::{CalculatorPage, ChartPage, HomePage};
use hooks::{use_calculator, use_pace_chart};

// ──────────────────────────────────────────────────────────────────────────────
// Navigation

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Calculator,
    Chart,
}

/// Root component. Engines live here so that switching pages keeps their state.
#[function_component]
pub fn App() -> Html {
    let store = use_memo((), |_| storage::browser_store());
    let calculator = use_calculator(&store);
    let chart = use_pace_chart(&store);
    let page = use_state(|| Page::Home);

    let go_to = |target: Page| {
        let page = page.clone();
        Callback::from(move |_: ()| {
            info!("Opening {:?}", target);
            page.set(target);
        })
    };

    match *page {
        Page::Home => html! {
            <HomePage
                on_open_chart={go_to(Page::Chart)}
                on_open_calculator={go_to(Page::Calculator)}
            />
        },
        Page::Calculator => html! {
            <CalculatorPage {calculator} on_back={go_to(Page::Home)} />
        },
        Page::Chart => html! {
            <ChartPage {chart} on_back={go_to(Page::Home)} />
        },
    }
}

/// Entry point: installs the panic hook and console logger, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    pacechart::logging::init(log::LevelFilter::Info);
    yew::Renderer::<App>::new().render();
}
