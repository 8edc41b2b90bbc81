//! Defines the mutable, reactive state for the application's UI.

use chain::CheckInClient;
use chain::InjectedWallet;
use chain::Session;
use chrono::DateTime;
use chrono::Utc;
use dioxus::prelude::*;

/// A reactive state provided as a Dioxus context for mutable UI data.
///
/// This struct holds `Signal`s for any UI-related state that needs to change
/// and trigger automatic re-renders in the view. It is separate from the
/// core, immutable `AppState`.
#[derive(Clone, Copy)]
pub struct AppStateMut {
    /// The established wallet session, if any. Holding a session is what
    /// "connected" means.
    pub session: Signal<Option<Session>>,
    /// Contract client bound to the connected wallet; lives as long as the
    /// session does.
    pub client: Signal<Option<CheckInClient<InjectedWallet>>>,
    /// When the connected account last checked in. `None` before the first
    /// fetch and for accounts that never checked in.
    pub last_check_in: Signal<Option<DateTime<Utc>>>,
    /// True while a submission is waiting to be mined.
    pub is_checking_in: Signal<bool>,
    /// Inline error line, e.g. the wrong-network notice.
    pub network_error: Signal<Option<String>>,
}
