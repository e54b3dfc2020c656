//! Alert panels for displaying error messages to users.

use maud::{Markup, html};

/// The heading of every error alert.
pub const ERROR_ALERT_TITLE: &str = "An Error Occurred";

/// Renders an error panel with `message` under the standard heading.
///
/// The panel carries `role="alert"` so assistive technology announces it when
/// it is swapped into the page.
pub fn error_alert(message: &str) -> Markup {
    html! {
        div
            role="alert"
            class="flex items-start gap-3 p-4 rounded-xl border border-red-200
                bg-red-50 text-red-800 dark:bg-gray-800 dark:text-red-400
                dark:border-red-800"
        {
            span class="text-xl" aria-hidden="true" { "⚠" }

            div
            {
                h3 class="font-semibold" { (ERROR_ALERT_TITLE) }
                p class="alert-message text-sm" { (message) }
            }
        }
    }
}
