use leptos::*;

use crate::domain::chart::ColorMode;
use crate::domain::market_data::Timespan;

/// `1M 3M YTD 1Y` buttons; the active one is highlighted.
#[component]
pub fn TimespanPicker(
    #[prop(into)] active: Signal<Timespan>,
    #[prop(into)] on_select: Callback<Timespan>,
) -> impl IntoView {
    view! {
        <div class="timespans">
            {Timespan::ALL
                .into_iter()
                .map(|timespan| {
                    view! {
                        <button
                            class="timespan"
                            class:active=move || active.get() == timespan
                            value=timespan.to_string()
                            on:click=move |_| on_select.call(timespan)
                        >
                            {timespan.to_string()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Moon in light mode, sun in dark mode.
pub fn mode_icon(mode: ColorMode) -> &'static str {
    mode.pick("☾", "☀")
}

#[component]
pub fn ColorModeToggle(
    #[prop(into)] mode: Signal<ColorMode>,
    #[prop(into)] on_toggle: Callback<()>,
) -> impl IntoView {
    view! {
        <button
            class="color-mode-toggle"
            aria-label=move || format!("Switch to {} mode", mode.get().toggled())
            on:click=move |_| on_toggle.call(())
        >
            {move || mode_icon(mode.get())}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_follows_mode() {
        assert_eq!(mode_icon(ColorMode::Light), "☾");
        assert_eq!(mode_icon(ColorMode::Dark), "☀");
    }
}
