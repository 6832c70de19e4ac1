use leptos::*;
use strum::AsRefStr;

use crate::domain::chart::Palette;
use crate::domain::market_data::MetricsSummary;
use crate::format::{format_currency, format_percent};

/// Direction of a stat's change indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StatTrend {
    Increase,
    Decrease,
}

impl StatTrend {
    /// `None` for a missing, zero or non-finite percentage: nothing is shown.
    pub fn of(percentage: Option<f64>) -> Option<Self> {
        let pct = percentage.filter(|p| p.is_finite() && *p != 0.0)?;
        Some(if pct > 0.0 { StatTrend::Increase } else { StatTrend::Decrease })
    }

    fn glyph(self) -> &'static str {
        match self {
            StatTrend::Increase => "▲",
            StatTrend::Decrease => "▼",
        }
    }
}

#[component]
pub fn Skeleton(#[prop(optional)] circle: bool) -> impl IntoView {
    view! { <span class="skeleton" class:skeleton-circle=circle aria-busy="true"></span> }
}

/// Trend and percent text for the help line under a stat. `None` hides the
/// whole line: no percentage, or `hide_arrow` set.
pub fn stat_help(percentage: Option<f64>, hide_arrow: bool) -> Option<(StatTrend, String)> {
    if hide_arrow {
        return None;
    }
    let pct = percentage?;
    StatTrend::of(Some(pct)).map(|trend| (trend, format_percent(pct)))
}

/// Change indicator under a stat number
#[component]
pub fn StatArrow(
    #[prop(into)] percentage: Signal<Option<f64>>,
    #[prop(into)] is_loaded: Signal<bool>,
    #[prop(optional)] hide_arrow: bool,
) -> impl IntoView {
    move || {
        stat_help(percentage.get(), hide_arrow).map(|(trend, text)| {
            view! {
                <p class="stat-help">
                    {move || if is_loaded.get() {
                        view! { <span class=format!("stat-arrow {}", trend.as_ref())>{trend.glyph()}</span> }
                            .into_view()
                    } else {
                        view! { <Skeleton circle=true /> }.into_view()
                    }}
                    {move || if is_loaded.get() { text.clone().into_view() } else { view! { <Skeleton /> }.into_view() }}
                </p>
            }
        })
    }
}

/// Bordered stat card; shows a skeleton until `value` resolves.
#[component]
pub fn StatCard(
    label: &'static str,
    #[prop(into)] value: Signal<Option<String>>,
    #[prop(into)] palette: Signal<Palette>,
    children: Children,
) -> impl IntoView {
    let style = move || {
        let p = palette.get();
        format!("background: {}; border-color: {};", p.card_background, p.card_border)
    };
    view! {
        <div class="stat" style=style>
            <div class="stat-label">{label}</div>
            <div class="stat-number">
                {move || match value.get() {
                    Some(text) => text.into_view(),
                    None => view! { <Skeleton /> }.into_view(),
                }}
            </div>
            {children()}
        </div>
    }
}

/// Current price, ATH and days since ATH
#[component]
pub fn StatGroup(
    #[prop(into)] summary: Signal<MetricsSummary>,
    #[prop(into)] palette: Signal<Palette>,
) -> impl IntoView {
    let price = Signal::derive(move || summary.with(|s| s.price_usd.map(format_currency)));
    let change = Signal::derive(move || summary.with(|s| s.change_24h_pct));
    let ath = Signal::derive(move || summary.with(|s| s.ath_price.map(format_currency)));
    let ath_change = Signal::derive(move || summary.with(|s| s.ath_change_pct));
    let days = Signal::derive(move || summary.with(|s| s.days_since_ath.map(|d| d.to_string())));

    view! {
        <div class="stat-group">
            <StatCard label="Current Price" value=price palette=palette>
                <StatArrow percentage=change is_loaded=Signal::derive(move || price.with(Option::is_some)) />
            </StatCard>
            <StatCard label="All Time High(ATH)" value=ath palette=palette>
                <StatArrow percentage=ath_change is_loaded=Signal::derive(move || ath_change.with(Option::is_some)) />
            </StatCard>
            <StatCard label="Days Since ATH" value=days palette=palette>
                <StatArrow
                    percentage=ath_change
                    is_loaded=Signal::derive(move || days.with(Option::is_some))
                    hide_arrow=true
                />
            </StatCard>
        </div>
    }
}
