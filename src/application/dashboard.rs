use std::rc::Rc;

use chrono::NaiveDate;
use leptos::*;

use crate::config::DashboardConfig;
use crate::domain::chart::{ColorMode, Palette};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{AssetOption, TimeSeriesQuery, Timespan};
use crate::infrastructure::cache::QueryCache;
use crate::infrastructure::http::{HttpFetcher, MessariEndpoints};
use crate::log_info;

/// Browser tab title for the selected asset.
pub fn document_title(asset: &AssetOption) -> String {
    if asset.label.is_empty() {
        "Messari Asset Details".to_string()
    } else {
        format!("{} Price and Metrics | Powered by Messari", asset.label)
    }
}

/// Long-lived collaborators of the page
#[derive(Clone)]
pub struct DashboardServices {
    pub cache: QueryCache,
    pub endpoints: MessariEndpoints,
}

impl DashboardServices {
    pub fn from_config(config: &DashboardConfig) -> Self {
        let fetcher = Rc::new(HttpFetcher::new(config.api_key.clone()));
        Self {
            cache: QueryCache::new(fetcher, config.cache_options()),
            endpoints: MessariEndpoints::new(&config.api_base_url),
        }
    }
}

/// User-driven page state. Each field changes only through its own setter.
#[derive(Debug, Clone, Copy)]
pub struct DashboardState {
    pub selected_asset: RwSignal<AssetOption>,
    pub timespan: RwSignal<Timespan>,
    pub color_mode: RwSignal<ColorMode>,
    today: RwSignal<NaiveDate>,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig, today: NaiveDate) -> Self {
        Self {
            selected_asset: create_rw_signal(config.default_asset.clone()),
            timespan: create_rw_signal(config.default_timespan),
            color_mode: create_rw_signal(config.color_mode),
            today: create_rw_signal(today),
        }
    }

    pub fn select_asset(&self, option: AssetOption) {
        log_info!(LogComponent::Application("Dashboard"), "asset -> {}", option.value);
        self.selected_asset.set(option);
    }

    pub fn select_timespan(&self, timespan: Timespan) {
        self.timespan.set(timespan);
    }

    pub fn toggle_color_mode(&self) {
        self.color_mode.update(|mode| *mode = mode.toggled());
    }

    /// Roll the date ranges forward, e.g. after the tab sat open past midnight.
    pub fn set_today(&self, today: NaiveDate) {
        if self.today.get_untracked() != today {
            self.today.set(today);
        }
    }

    /// Time-series request for the current asset and timespan.
    pub fn time_series_query(&self) -> Signal<TimeSeriesQuery> {
        let (asset, timespan, today) = (self.selected_asset, self.timespan, self.today);
        create_memo(move |_| TimeSeriesQuery::new(asset.with(AssetOption::slug), timespan.get(), today.get()))
            .into()
    }

    pub fn palette(&self) -> Signal<Palette> {
        let mode = self.color_mode;
        Signal::derive(move || mode.get().palette())
    }

    pub fn title(&self) -> Signal<String> {
        let asset = self.selected_asset;
        Signal::derive(move || asset.with(document_title))
    }
}
