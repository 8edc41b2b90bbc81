// The client-side Dioxus application logic.

use dioxus::prelude::*;

mod app_state;
mod app_state_mut;
mod components;
pub mod messages;
mod screens;

use app_state::AppState;
use app_state_mut::AppStateMut;
use chain::UNICHAIN_SEPOLIA;
use components::pico::Container;
use screens::check_in::CheckInScreen;

#[allow(non_snake_case)]
pub fn App() -> Element {
    let page_css = r#"
    .app-main-container {
        max-width: 600px;
        margin: 0 auto;
        padding: 20px;
    }

    .network-error {
        color: var(--pico-del-color, #d93526);
    }
"#;

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css",
        }
        style {
            "{page_css}"
        }
        LoadedApp {
            app_state: AppState::new(UNICHAIN_SEPOLIA),
        }
    }
}

/// Holds the state wiring so `App` stays a pure shell around it.
#[component]
fn LoadedApp(app_state: AppState) -> Element {
    // Provide the stable, non-reactive AppState.
    use_context_provider(|| app_state.clone());

    // Create signals for mutable state at the top level of the component.
    let session = use_signal(|| None);
    let client = use_signal(|| None);
    let last_check_in = use_signal(|| None);
    let is_checking_in = use_signal(|| false);
    let network_error = use_signal(|| None);

    // Provide the mutable state by passing the already created signals.
    use_context_provider(|| AppStateMut {
        session,
        client,
        last_check_in,
        is_checking_in,
        network_error,
    });

    rsx! {
        div {
            class: "app-main-container",
            Container {
                h1 { "Daily Check-In" }
                CheckInScreen {}
            }
        }
    }
}
