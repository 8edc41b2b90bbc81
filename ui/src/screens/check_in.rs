//! The check-in page: connect, verify the network, read and record
//! check-ins.

use chain::compat;
use chain::connect;
use chain::CheckInClient;
use chain::InjectedWallet;
use chrono::DateTime;
use chrono::Local;
use chrono::Utc;
use dioxus::prelude::*;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::app_state::AppState;
use crate::app_state_mut::AppStateMut;
use crate::components::pico::Button;
use crate::components::pico::Card;
use crate::messages;
use crate::messages::Surface;

#[component]
pub fn CheckInScreen() -> Element {
    let app_state = use_context::<AppState>();
    let mut state = use_context::<AppStateMut>();

    // Refetches whenever the session's account changes. The client is
    // peeked, not read: it changes in lockstep with the session and must
    // not retrigger the fetch on its own.
    let last_fetch = use_resource(move || {
        let session = (state.session)();
        let client = state.client.peek().clone();
        async move {
            let (Some(session), Some(client)) = (session, client) else {
                return Ok(None);
            };
            client.last_check_in(session.account).await
        }
    });

    use_effect(move || match &*last_fetch.read() {
        Some(Ok(when)) => state.last_check_in.set(*when),
        Some(Err(error)) => {
            warn!("last check-in fetch failed: {error}");
            state.network_error.set(Some(messages::fetch_failure(error)));
        }
        None => {}
    });

    let on_connect = move |_: MouseEvent| {
        let profile = app_state.profile;
        spawn(async move {
            let wallet = match InjectedWallet::detect() {
                Ok(wallet) => wallet,
                Err(error) => {
                    warn!("wallet detection failed: {error}");
                    surface_failure(&mut state, messages::connect_failure(&error));
                    return;
                }
            };
            match connect(&wallet, &profile).await {
                Ok(session) => {
                    let client = match CheckInClient::new(wallet, &profile) {
                        Ok(client) => client,
                        Err(error) => {
                            warn!("contract client setup failed: {error}");
                            compat::alert(messages::CONNECT_FAILED);
                            return;
                        }
                    };
                    info!("connected: {}", session.account_display());
                    state.network_error.set(None);
                    // One fetch per distinct account: reconnecting with the
                    // same account keeps the session (and client) as-is.
                    if state.session.peek().as_ref() != Some(&session) {
                        state.client.set(Some(client));
                        state.session.set(Some(session));
                    }
                }
                Err(error) => {
                    warn!("wallet connection failed: {error}");
                    surface_failure(&mut state, messages::connect_failure(&error));
                }
            }
        });
    };

    let on_check_in = move |_: MouseEvent| {
        // The button is disabled while busy; this guard also refuses
        // clicks that race the disable.
        if (state.is_checking_in)() {
            return;
        }
        let Some(session) = state.session.peek().clone() else {
            return;
        };
        let Some(client) = state.client.peek().clone() else {
            return;
        };
        spawn(async move {
            state.is_checking_in.set(true);
            match client.check_in(session.account).await {
                Ok(_) => match client.last_check_in(session.account).await {
                    Ok(when) => state.last_check_in.set(when),
                    Err(error) => {
                        warn!("refresh after check-in failed: {error}");
                        state.network_error.set(Some(messages::fetch_failure(&error)));
                    }
                },
                Err(error) => {
                    warn!("check-in failed: {error}");
                    compat::alert(messages::CHECK_IN_FAILED);
                }
            }
            state.is_checking_in.set(false);
        });
    };

    let network_error = state.network_error.read().clone();
    let session = state.session.read().clone();
    let busy = (state.is_checking_in)();
    let last_check_in = format_last_check_in(*state.last_check_in.read());

    rsx! {
        div {
            match (network_error, session) {
                (Some(message), _) => rsx! {
                    p {
                        class: "network-error",
                        "{message}"
                    }
                },
                (None, Some(session)) => rsx! {
                    Card {
                        p { "Connected account: {session.account_display()}" }
                        p { "Last Check-In: {last_check_in}" }
                        Button {
                            disabled: busy,
                            on_click: on_check_in,
                            if busy { "Checking In..." } else { "Check In" }
                        }
                    }
                },
                (None, None) => rsx! {
                    Button {
                        on_click: on_connect,
                        "Connect Wallet"
                    }
                },
            }
        }
    }
}

fn surface_failure(state: &mut AppStateMut, failure: Surface) {
    match failure {
        Surface::Inline(message) => state.network_error.set(Some(message)),
        Surface::Alert(message) => compat::alert(&message),
    }
}

/// Local-time rendering of the last check-in, or the "none yet" notice.
fn format_last_check_in(when: Option<DateTime<Utc>>) -> String {
    match when {
        Some(when) => when
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => messages::NO_CHECK_IN_YET.to_owned(),
    }
}
