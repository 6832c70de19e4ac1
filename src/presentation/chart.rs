use gloo::events::EventListener;
use leptos::html::Div;
use leptos::*;

use crate::domain::chart::{ChartGeometry, Dimensions, Palette, TooltipState};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::PriceSeries;
use crate::format::format_price;
use crate::log_trace;
use crate::time_utils::format_tooltip_date;

const BACKGROUND_GRADIENT_ID: &str = "area-background-gradient";
const AREA_GRADIENT_ID: &str = "area-gradient";

/// 📈 Area price chart with hover crosshair and tooltips.
///
/// Fills the width of its container and tracks window resizes. Nothing is
/// drawn while the container is narrower than [`Dimensions::MIN_RENDER_WIDTH`].
#[component]
pub fn PriceChart(
    #[prop(into)] series: Signal<PriceSeries>,
    #[prop(into)] palette: Signal<Palette>,
    height: f64,
) -> impl IntoView {
    let container = create_node_ref::<Div>();
    let width = create_rw_signal(0.0_f64);
    let tooltip = create_rw_signal(TooltipState::Idle);

    let measure = move || {
        if let Some(el) = container.get_untracked() {
            width.set(el.client_width() as f64);
        }
    };
    // the node is still detached when it loads; measure once it is laid out
    container.on_load(move |_| request_animation_frame(measure));
    if let Some(window) = web_sys::window() {
        let listener = EventListener::new(&window, "resize", move |_| measure());
        on_cleanup(move || drop(listener));
    }

    let geometry = create_memo(move |_| {
        let dims = Dimensions::new(width.get(), height);
        series.with(|s| ChartGeometry::new(s, dims))
    });
    let renderable = create_memo(move |_| geometry.with(|g| g.dims.is_renderable()));

    // a new series invalidates whatever the pointer was over
    create_effect(move |_| {
        series.with(|_| ());
        tooltip.set(TooltipState::Idle);
    });

    let pointer_at = move |client_x: f64| {
        let Some(el) = container.get_untracked() else {
            return;
        };
        let x = client_x - el.get_bounding_client_rect().left();
        let state = series.with_untracked(|s| {
            geometry.with_untracked(|g| TooltipState::pointer_move(s.samples(), &g.scales, x))
        });
        log_trace!(LogComponent::Presentation("PriceChart"), "pointer x={:.1} -> {:?}", x, state.is_visible());
        tooltip.set(state);
    };
    let on_touch = move |ev: ev::TouchEvent| {
        if let Some(touch) = ev.touches().get(0) {
            pointer_at(touch.client_x() as f64);
        }
    };

    let plot = move || geometry.with(|g| (g.dims.margin.left, g.plot_top(), g.dims.inner_width(), g.dims.inner_height()));
    let hovered = move || tooltip.with(|t| t.tooltip().copied());

    view! {
        <div node_ref=container class="price-chart" style=format!("height: {height}px;")>
            <Show when=move || renderable.get() fallback=|| ()>
                <svg
                    width=move || geometry.with(|g| g.dims.width)
                    height=move || geometry.with(|g| g.dims.height)
                >
                    <defs>
                        <linearGradient id=BACKGROUND_GRADIENT_ID x1="0" y1="0" x2="0" y2="1">
                            <stop offset="0%" stop-color=move || palette.get().chart_background />
                            <stop offset="100%" stop-color=move || palette.get().chart_background />
                        </linearGradient>
                        <linearGradient id=AREA_GRADIENT_ID x1="0" y1="0" x2="0" y2="1">
                            <stop offset="0%" stop-color=move || palette.get().accent stop-opacity="1" />
                            <stop offset="100%" stop-color=move || palette.get().accent stop-opacity="0.1" />
                        </linearGradient>
                    </defs>
                    <rect
                        x="0"
                        y="0"
                        width=move || geometry.with(|g| g.dims.width)
                        height=move || geometry.with(|g| g.dims.height)
                        fill=format!("url(#{BACKGROUND_GRADIENT_ID})")
                        rx="14"
                    />
                    <g class="grid-rows" pointer-events="none">
                        {move || {
                            let (left, _, inner_width, _) = plot();
                            let stroke = palette.get().accent;
                            geometry.with(|g| {
                                g.grid_rows
                                    .iter()
                                    .map(|&y| view! {
                                        <line
                                            x1=left
                                            y1=y
                                            x2=left + inner_width
                                            y2=y
                                            stroke=stroke
                                            stroke-dasharray="1,3"
                                            stroke-opacity="0"
                                        />
                                    })
                                    .collect_view()
                            })
                        }}
                    </g>
                    <g class="grid-columns" pointer-events="none">
                        {move || {
                            let (_, top, _, inner_height) = plot();
                            let stroke = palette.get().accent;
                            geometry.with(|g| {
                                g.grid_columns
                                    .iter()
                                    .map(|&x| view! {
                                        <line
                                            x1=x
                                            y1=top
                                            x2=x
                                            y2=top + inner_height
                                            stroke=stroke
                                            stroke-dasharray="1,3"
                                            stroke-opacity="0.2"
                                        />
                                    })
                                    .collect_view()
                            })
                        }}
                    </g>
                    <path
                        d=move || geometry.with(|g| g.area_path.clone())
                        stroke-width="1"
                        stroke=format!("url(#{AREA_GRADIENT_ID})")
                        fill=format!("url(#{AREA_GRADIENT_ID})")
                    />
                    <rect
                        class="interaction-layer"
                        x=move || plot().0
                        y=move || plot().1
                        width=move || plot().2
                        height=move || plot().3
                        fill="transparent"
                        rx="14"
                        on:mousemove=move |ev: ev::MouseEvent| pointer_at(ev.client_x() as f64)
                        on:touchstart=on_touch
                        on:touchmove=on_touch
                        on:mouseleave=move |_| tooltip.set(TooltipState::pointer_leave())
                    />
                    {move || {
                        hovered().map(|t| {
                            let (_, top, _, inner_height) = plot();
                            let accent_dark = palette.get().accent_dark;
                            view! {
                                <g class="crosshair" pointer-events="none">
                                    <line
                                        x1=t.left
                                        y1=top
                                        x2=t.left
                                        y2=top + inner_height
                                        stroke=accent_dark
                                        stroke-width="2"
                                        stroke-dasharray="5,2"
                                    />
                                    <circle
                                        cx=t.left
                                        cy=t.top + 1.0
                                        r="4"
                                        fill="black"
                                        fill-opacity="0.1"
                                        stroke="black"
                                        stroke-opacity="0.1"
                                        stroke-width="2"
                                    />
                                    <circle
                                        cx=t.left
                                        cy=t.top
                                        r="4"
                                        fill=accent_dark
                                        stroke="white"
                                        stroke-width="2"
                                    />
                                </g>
                            }
                        })
                    }}
                </svg>
                {move || {
                    hovered().map(|t| {
                        let (_, top, _, inner_height) = plot();
                        let background = palette.get().chart_background;
                        view! {
                            <div
                                class="chart-tooltip"
                                style=format!(
                                    "top: 0px; left: {}px; background: {background}; border: 1px solid white; color: white;",
                                    t.left + 12.0,
                                )
                            >
                                {format_price(t.sample.close())}
                            </div>
                            <div
                                class="chart-tooltip chart-tooltip-date"
                                style=format!("top: {}px; left: {}px;", top + inner_height - 14.0, t.left)
                            >
                                {format_tooltip_date(t.sample.timestamp())}
                            </div>
                        }
                    })
                }}
            </Show>
        </div>
    }
}
