use leptos::*;

use crate::domain::chart::Palette;
use crate::domain::market_data::AssetOption;

/// Options to render: the list, with the current selection prepended when the
/// list does not contain it yet (e.g. while it is still loading).
pub fn visible_options(options: &[AssetOption], current: &AssetOption) -> Vec<AssetOption> {
    let mut visible = Vec::with_capacity(options.len() + 1);
    if !options.iter().any(|o| o.value == current.value) {
        visible.push(current.clone());
    }
    visible.extend(options.iter().cloned());
    visible
}

#[component]
pub fn AssetSelect(
    #[prop(into)] options: Signal<Vec<AssetOption>>,
    #[prop(into)] value: Signal<AssetOption>,
    #[prop(into)] is_loading: Signal<bool>,
    #[prop(into)] on_change: Callback<AssetOption>,
    #[prop(into)] palette: Signal<Palette>,
) -> impl IntoView {
    let handle_change = move |ev: ev::Event| {
        let slug = event_target_value(&ev);
        let picked = options.with(|list| list.iter().find(|o| o.value == slug).cloned());
        if let Some(option) = picked {
            on_change.call(option);
        }
    };
    let style = move || {
        let p = palette.get();
        format!("background: {}; color: {};", p.card_background, p.page_text)
    };

    view! {
        <div class="asset-select" class:loading=move || is_loading.get()>
            <select
                style=style
                aria-busy=move || is_loading.get().to_string()
                prop:value=move || value.with(|v| v.value.clone())
                on:change=handle_change
            >
                {move || {
                    let current = value.get();
                    options
                        .with(|list| visible_options(list, &current))
                        .into_iter()
                        .map(|option| {
                            let selected = option.value == current.value;
                            view! {
                                <option value=option.value.clone() data-id=option.id.clone() selected=selected>
                                    {option.label}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>
            <Show when=move || is_loading.get() fallback=|| ()>
                <span class="spinner" aria-label="Loading"></span>
            </Show>
        </div>
    }
}
