use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AnnularLayout, KpiCard, MetricDataSource, TrendLayout, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer};
use crate::scroll::{
    ScrollObserver, ScrollObserverConfig, ScrollSignalSource, ScrollState, SubscriberId,
};

use super::distribution_chart::{
    DEFAULT_LEGEND_LEN, DistributionChart, DistributionChartConfig, Legend, Tooltip,
};
use super::nav_style::{NavChromeStyle, nav_style_for};
use super::trend_chart::{TrendChart, TrendChartConfig};

/// Page bootstrap configuration.
///
/// Serializable so hosts can ship page setup alongside their markup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_distribution_container")]
    pub distribution_container: Viewport,
    #[serde(default = "default_trend_container")]
    pub trend_container: Viewport,
    #[serde(default)]
    pub scroll: ScrollObserverConfig,
    #[serde(default)]
    pub annular: AnnularLayout,
    #[serde(default = "default_legend_len")]
    pub legend_len: usize,
    /// Whether the growth chart is part of the composed page.
    #[serde(default)]
    pub show_growth_trend: bool,
    #[serde(default)]
    pub trend: TrendLayout,
}

fn default_distribution_container() -> Viewport {
    Viewport::new(640, 300)
}

fn default_trend_container() -> Viewport {
    Viewport::new(640, 240)
}

fn default_legend_len() -> usize {
    DEFAULT_LEGEND_LEN
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            distribution_container: default_distribution_container(),
            trend_container: default_trend_container(),
            scroll: ScrollObserverConfig::default(),
            annular: AnnularLayout::default(),
            legend_len: default_legend_len(),
            show_growth_trend: false,
            trend: TrendLayout::default(),
        }
    }
}

impl PageConfig {
    #[must_use]
    pub fn with_distribution_container(mut self, container: Viewport) -> Self {
        self.distribution_container = container;
        self
    }

    #[must_use]
    pub fn with_trend_container(mut self, container: Viewport) -> Self {
        self.trend_container = container;
        self
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll: ScrollObserverConfig) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn with_annular_layout(mut self, annular: AnnularLayout) -> Self {
        self.annular = annular;
        self
    }

    #[must_use]
    pub fn with_legend_len(mut self, legend_len: usize) -> Self {
        self.legend_len = legend_len;
        self
    }

    #[must_use]
    pub fn with_growth_trend(mut self, show_growth_trend: bool) -> Self {
        self.show_growth_trend = show_growth_trend;
        self
    }

    #[must_use]
    pub fn with_trend_layout(mut self, trend: TrendLayout) -> Self {
        self.trend = trend;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        for container in [self.distribution_container, self.trend_container] {
            if !container.is_valid() {
                return Err(ChartError::InvalidViewport {
                    width: container.width,
                    height: container.height,
                });
            }
        }
        self.scroll.validate()?;
        self.annular.validate()?;
        self.trend.validate()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse page config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize page config: {e}"))
        })
    }
}

/// Page markup the composer carries but never inspects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaticContent {
    blocks: IndexMap<String, String>,
}

impl StaticContent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_block(mut self, id: impl Into<String>, markup: impl Into<String>) -> Self {
        self.blocks.insert(id.into(), markup.into());
        self
    }

    #[must_use]
    pub fn block(&self, id: &str) -> Option<&str> {
        self.blocks.get(id).map(String::as_str)
    }

    pub fn blocks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.blocks.iter().map(|(id, markup)| (id.as_str(), markup.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Everything a host needs to paint the page once.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub scroll: ScrollState,
    pub nav: NavChromeStyle,
    pub kpi_cards: &'a [KpiCard],
    pub distribution_frame: RenderFrame,
    pub legend: Legend,
    pub tooltip: Option<Tooltip>,
    pub trend_frame: Option<RenderFrame>,
    pub static_content: &'a StaticContent,
}

/// Wires scroll state, metric data and charts into one page.
///
/// Data flows one way: the data source feeds the charts, the scroll observer
/// feeds the navigation style. Nothing feeds back.
pub struct PageComposer<R: Renderer> {
    source: Rc<dyn MetricDataSource>,
    scroll: ScrollObserver,
    distribution: DistributionChart<R>,
    trend: TrendChart<R>,
    static_content: StaticContent,
    config: PageConfig,
}

impl<R: Renderer + Default> PageComposer<R> {
    pub fn new(
        source: Rc<dyn MetricDataSource>,
        scroll_source: Rc<dyn ScrollSignalSource>,
        static_content: StaticContent,
        config: PageConfig,
    ) -> ChartResult<Self> {
        config.validate()?;

        let distribution = DistributionChart::new(
            R::default(),
            source.distribution().to_vec(),
            DistributionChartConfig::new(config.distribution_container)
                .with_layout(config.annular)
                .with_legend_len(config.legend_len),
        )?;
        let trend = TrendChart::new(
            R::default(),
            source.growth().to_vec(),
            TrendChartConfig::new(config.trend_container).with_layout(config.trend),
        )?;
        let scroll = ScrollObserver::attach(scroll_source, config.scroll)?;

        debug!(
            segments = distribution.segments().len(),
            growth_points = trend.points().len(),
            kpi_cards = source.kpi_cards().len(),
            static_blocks = static_content.len(),
            show_growth_trend = config.show_growth_trend,
            "page composed"
        );

        Ok(Self {
            source,
            scroll,
            distribution,
            trend,
            static_content,
            config,
        })
    }
}

impl<R: Renderer> PageComposer<R> {
    #[must_use]
    pub fn config(&self) -> PageConfig {
        self.config
    }

    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    #[must_use]
    pub fn scroll_observer(&self) -> &ScrollObserver {
        &self.scroll
    }

    #[must_use]
    pub fn nav_style(&self) -> NavChromeStyle {
        nav_style_for(self.scroll.state())
    }

    /// Restyles the navigation bar on every threshold flip.
    ///
    /// Release with `scroll_observer().unsubscribe(id)`; `dispose` drops it too.
    pub fn on_nav_change(
        &self,
        mut on_change: impl FnMut(NavChromeStyle) + 'static,
    ) -> SubscriberId {
        self.scroll.subscribe(move |state| on_change(nav_style_for(state)))
    }

    #[must_use]
    pub fn kpi_cards(&self) -> &[KpiCard] {
        self.source.kpi_cards()
    }

    #[must_use]
    pub fn static_content(&self) -> &StaticContent {
        &self.static_content
    }

    #[must_use]
    pub fn distribution(&self) -> &DistributionChart<R> {
        &self.distribution
    }

    pub fn distribution_mut(&mut self) -> &mut DistributionChart<R> {
        &mut self.distribution
    }

    /// Growth chart, built even when it is not part of the composed page.
    #[must_use]
    pub fn trend(&self) -> &TrendChart<R> {
        &self.trend
    }

    pub fn trend_mut(&mut self) -> &mut TrendChart<R> {
        &mut self.trend
    }

    #[must_use]
    pub fn shows_growth_trend(&self) -> bool {
        self.config.show_growth_trend
    }

    pub fn set_show_growth_trend(&mut self, show: bool) {
        self.config.show_growth_trend = show;
    }

    pub fn resize_distribution(&mut self, container: Viewport) -> ChartResult<()> {
        self.distribution.resize(container)?;
        self.config.distribution_container = container;
        Ok(())
    }

    pub fn resize_trend(&mut self, container: Viewport) -> ChartResult<()> {
        self.trend.resize(container)?;
        self.config.trend_container = container;
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<usize> {
        self.distribution.pointer_move(x, y)
    }

    pub fn pointer_leave(&mut self) {
        self.distribution.pointer_leave();
    }

    pub fn compose(&self) -> ChartResult<PageView<'_>> {
        let trend_frame = if self.config.show_growth_trend {
            Some(self.trend.build_render_frame()?)
        } else {
            None
        };

        Ok(PageView {
            scroll: self.scroll.state(),
            nav: self.nav_style(),
            kpi_cards: self.source.kpi_cards(),
            distribution_frame: self.distribution.build_render_frame()?,
            legend: self.distribution.legend(),
            tooltip: self.distribution.tooltip(),
            trend_frame,
            static_content: &self.static_content,
        })
    }

    /// Renders the charts that are part of the page through their renderers.
    pub fn render(&mut self) -> ChartResult<()> {
        self.distribution.render()?;
        if self.config.show_growth_trend {
            self.trend.render()?;
        }
        Ok(())
    }

    /// Releases the scroll subscription. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.scroll.dispose();
    }
}
