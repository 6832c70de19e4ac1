use gloo::events::EventListener;
use gloo::storage::{LocalStorage, Storage};
use gloo_timers::callback::Interval;
use leptos::*;

use crate::{
    application::{
        DashboardServices, DashboardState, series_of, use_asset_list, use_asset_metrics, use_time_series,
    },
    config::{DashboardConfig, EMBEDDED_CONFIG_ID},
    domain::{
        chart::ColorMode,
        logging::LogComponent,
        market_data::{AssetOption, MetricsSummary, Timespan},
    },
    log_info, log_warn,
    presentation::{AssetSelect, ColorModeToggle, PriceChart, StatGroup, TimespanPicker},
    time_utils::today_utc,
};

pub const COLOR_MODE_STORAGE_KEY: &str = "asset-dashboard-color-mode";

const STYLES: &str = r#"
.dashboard {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    min-height: 100vh;
    overflow: hidden;
}
.dashboard main {
    max-width: 62rem;
    margin: 0 auto;
    padding: 1rem;
}
.toolbar {
    display: flex;
    justify-content: space-between;
    align-items: center;
}
.asset-select {
    width: 50%;
    display: flex;
    align-items: center;
    gap: 0.5rem;
}
.asset-select select {
    width: 100%;
    padding: 0.5rem;
    border-radius: 4px;
    border: 1px solid #cccccc;
}
.spinner {
    width: 1rem;
    height: 1rem;
    border: 2px solid #0091EA;
    border-top-color: transparent;
    border-radius: 50%;
    animation: spin 0.8s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.color-mode-toggle, .timespan {
    background: transparent;
    color: inherit;
    border: none;
    border-radius: 6px;
    padding: 0.4rem 0.8rem;
    cursor: pointer;
    font-size: 1rem;
}
.timespan {
    font-size: 0.875rem;
    text-transform: uppercase;
    margin-right: 0.5rem;
}
.timespan.active, .timespan:hover, .color-mode-toggle:hover {
    background: rgba(128, 128, 128, 0.25);
}
.stat-group {
    display: flex;
    gap: 0.5rem;
    margin: 1rem 0;
}
.stat {
    flex: 1;
    border: 1px solid;
    border-radius: 8px;
    padding: 0.5rem;
    margin: 0.5rem 0;
}
.stat-label { font-size: 0.875rem; font-weight: 500; }
.stat-number { font-size: 1.5rem; font-weight: 600; min-height: 2rem; }
.stat-help { display: flex; align-items: center; gap: 0.5rem; margin: 0; font-size: 0.875rem; opacity: 0.8; }
.stat-arrow.increase { color: #38A169; }
.stat-arrow.decrease { color: #E53E3E; }
.skeleton {
    display: inline-block;
    width: 6rem;
    height: 1.25rem;
    border-radius: 4px;
    background: rgba(128, 128, 128, 0.3);
    animation: pulse 1.2s ease-in-out infinite;
}
.skeleton.skeleton-circle { width: 1rem; height: 1rem; border-radius: 50%; }
@keyframes pulse { 50% { opacity: 0.4; } }
.timespans {
    display: flex;
    justify-content: flex-end;
    padding: 0.5rem 0;
}
.price-chart {
    position: relative;
    width: 100%;
}
.chart-tooltip {
    position: absolute;
    padding: 0.3rem 0.5rem;
    border-radius: 3px;
    font-size: 14px;
    line-height: 1;
    pointer-events: none;
    background: white;
    color: #666666;
    box-shadow: 0 1px 2px rgba(33, 33, 33, 0.2);
}
.chart-tooltip-date {
    min-width: 72px;
    text-align: center;
    transform: translateX(-50%);
}
"#;

/// `#dashboard-config` JSON, then the stored color mode, then `?asset=..&timespan=..&mode=..`.
fn load_config() -> DashboardConfig {
    let document = web_sys::window().and_then(|w| w.document());
    let embedded = document
        .and_then(|d| d.get_element_by_id(EMBEDDED_CONFIG_ID))
        .and_then(|el| el.text_content());
    let stored_mode = LocalStorage::get::<ColorMode>(COLOR_MODE_STORAGE_KEY).ok();
    let search = web_sys::window().and_then(|w| w.location().search().ok()).unwrap_or_default();
    DashboardConfig::resolve(embedded.as_deref(), stored_mode, &search)
}

/// Whole page: toolbar, stats, timespan picker and chart.
#[component]
pub fn App() -> impl IntoView {
    let config = load_config();
    let services = DashboardServices::from_config(&config);
    let state = DashboardState::new(&config, today_utc());

    let assets = use_asset_list(&services.cache, &services.endpoints);
    let metrics = use_asset_metrics(&services.cache, &services.endpoints, state.selected_asset.into());
    let time_series = use_time_series(&services.cache, &services.endpoints, state.time_series_query());
    let series = series_of(time_series);

    let summary = Signal::derive(move || metrics.data.with(|m| MetricsSummary::from_metrics(m.as_ref())));
    let options = Signal::derive(move || {
        assets.data.with(|list| list.iter().flatten().map(AssetOption::from).collect::<Vec<_>>())
    });
    let assets_loading =
        Signal::derive(move || assets.data.with(Option::is_none) || assets.is_validating.get());
    let palette = state.palette();

    // a slug from the URL gets its display name once the list arrives
    create_effect(move |_| {
        let current = state.selected_asset.get_untracked();
        let listed = options.with(|list| list.iter().find(|o| o.value == current.value).cloned());
        if let Some(listed) = listed.filter(|listed| *listed != current) {
            state.selected_asset.set(listed);
        }
    });

    let title = state.title();
    create_effect(move |_| {
        let title = title.get();
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(&title);
        }
    });

    create_effect(move |_| {
        let mode = state.color_mode.get();
        if let Err(err) = LocalStorage::set(COLOR_MODE_STORAGE_KEY, mode) {
            log_warn!(LogComponent::Presentation("App"), "color mode not persisted: {}", err);
        }
    });

    if config.revalidate_on_focus {
        if let Some(window) = web_sys::window() {
            let cache = services.cache.clone();
            let listener = EventListener::new(&window, "focus", move |_| {
                state.set_today(today_utc());
                cache.revalidate_active();
            });
            on_cleanup(move || drop(listener));
        }
    }
    if let Some(every_ms) = config.refresh_interval_ms.filter(|ms| *ms > 0) {
        let cache = services.cache.clone();
        let interval = Interval::new(every_ms, move || cache.revalidate_active());
        on_cleanup(move || drop(interval));
    }

    log_info!(
        LogComponent::Presentation("App"),
        "dashboard mounted: asset={} timespan={} mode={}",
        config.default_asset.value,
        config.default_timespan,
        config.color_mode
    );

    let page_style = move || {
        let p = palette.get();
        format!("background: {}; color: {};", p.page_background, p.page_text)
    };

    view! {
        <style>{STYLES}</style>
        <div class="dashboard" style=page_style>
            <main>
                <div class="toolbar">
                    <AssetSelect
                        options=options
                        value=state.selected_asset
                        is_loading=assets_loading
                        on_change=move |option: AssetOption| state.select_asset(option)
                        palette=palette
                    />
                    <ColorModeToggle mode=state.color_mode on_toggle=move |_: ()| state.toggle_color_mode() />
                </div>
                <StatGroup summary=summary palette=palette />
                <TimespanPicker active=state.timespan on_select=move |timespan: Timespan| state.select_timespan(timespan) />
                <PriceChart series=series palette=palette height=config.chart_height />
            </main>
        </div>
    }
}
