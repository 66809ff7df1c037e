use serde::{Deserialize, Serialize};

use crate::core::{AnnularGeometry, TrendGeometry};
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;
use crate::scroll::ScrollState;

use super::distribution_chart::{LegendEntry, Tooltip};
use super::nav_style::{NavChromeVariant, nav_variant_for};
use super::page::PageComposer;

pub const PAGE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable deterministic page state used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub scroll: ScrollState,
    pub nav_variant: NavChromeVariant,
    pub distribution: AnnularGeometry,
    pub legend: Vec<LegendEntry>,
    pub tooltip: Option<Tooltip>,
    /// Present only while the growth chart is part of the page.
    pub trend: Option<TrendGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: PageSnapshot,
}

impl PageSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = PageSnapshotJsonContractV1 {
            schema_version: PAGE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts both a bare snapshot and a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<PageSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: PageSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != PAGE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<R: Renderer> PageComposer<R> {
    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        let scroll = self.scroll_state();
        PageSnapshot {
            scroll,
            nav_variant: nav_variant_for(scroll),
            distribution: self.distribution().geometry().clone(),
            legend: self.distribution().legend().into_vec(),
            tooltip: self.distribution().tooltip(),
            trend: self
                .shows_growth_trend()
                .then(|| self.trend().geometry().clone()),
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
