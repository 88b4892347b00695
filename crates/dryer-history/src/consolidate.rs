//! 歷史年度 KPI 彙整與融合
//!
//! 把儲存的多次年度彙總表合併為 (產品, 區段) 彙整列，
//! 並以樣本數導出可信度，融合進當期分析結果。

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use dryer_core::{kwh_per_m3, YearlySummaryRow, Zone};
use serde::{Deserialize, Serialize};

use crate::entry::KpiHistoryEntry;

/// 融合時歷史值的預設權重
pub const DEFAULT_HISTORICAL_WEIGHT: f64 = 0.3;

/// 歷史彙整列：一個 (產品, 區段) 組合跨全部歷史條目的合計
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedRow {
    /// 產品代碼
    pub product: String,

    /// 區段
    pub zone: Zone,

    /// 跨條目能耗合計（kWh）
    pub energy_kwh: f64,

    /// 跨條目體積合計（m³）
    pub volume_m3: f64,

    /// 合計效率（kWh/m³）；體積為零時為 None
    pub kwh_per_m3: Option<f64>,

    /// 參與彙整的歷史列數
    pub sample_count: usize,

    /// 可信度 = min(樣本數 / 10, 1.0)
    pub confidence: f64,
}

/// 單一產品的歷史統計（跨分析批次）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalProductStats {
    /// 產品代碼
    pub product: String,

    /// 各批次平均效率的平均（kWh/m³）
    pub avg_kwh_per_m3: f64,

    /// 各批次平均效率的標準差（樣本數 < 2 時為 None）
    pub std_kwh_per_m3: Option<f64>,

    /// 覆蓋該產品的分析批次數
    pub total_runs: usize,

    /// 最近一次分析時間
    pub last_run: NaiveDateTime,
}

/// 跨全部歷史條目彙整年度列
pub fn consolidate_yearly(entries: &[KpiHistoryEntry]) -> Vec<ConsolidatedRow> {
    let mut groups: BTreeMap<(String, Zone), (f64, f64, usize)> = BTreeMap::new();

    for entry in entries {
        for row in &entry.yearly {
            let acc = groups
                .entry((row.product.clone(), row.zone))
                .or_insert((0.0, 0.0, 0));
            acc.0 += row.energy_kwh;
            acc.1 += row.volume_m3;
            acc.2 += 1;
        }
    }

    groups
        .into_iter()
        .map(|((product, zone), (energy_kwh, volume_m3, n))| ConsolidatedRow {
            product,
            zone,
            energy_kwh,
            volume_m3,
            kwh_per_m3: kwh_per_m3(energy_kwh, volume_m3),
            sample_count: n,
            confidence: (n as f64 / 10.0).min(1.0),
        })
        .collect()
}

/// 把歷史彙整值融合進當期年度表
///
/// 有對應歷史列且兩側效率皆可用時：
/// `blended = current × (1 − w) + historical × w × confidence`；
/// 其餘列原樣保留。能耗與體積欄位永遠維持當期值。
pub fn blend_with_current(
    current: &[YearlySummaryRow],
    consolidated: &[ConsolidatedRow],
    weight_historical: f64,
) -> Vec<YearlySummaryRow> {
    let lookup: BTreeMap<(&str, Zone), &ConsolidatedRow> = consolidated
        .iter()
        .map(|row| ((row.product.as_str(), row.zone), row))
        .collect();

    let mut blended_count = 0usize;
    let result = current
        .iter()
        .map(|row| {
            let mut out = row.clone();
            if let Some(hist) = lookup.get(&(row.product.as_str(), row.zone)) {
                if let (Some(cur), Some(past)) = (row.kwh_per_m3, hist.kwh_per_m3) {
                    out.kwh_per_m3 = Some(
                        cur * (1.0 - weight_historical)
                            + past * weight_historical * hist.confidence,
                    );
                    blended_count += 1;
                }
            }
            out
        })
        .collect();

    tracing::debug!(
        "歷史融合: {} / {} 個 (產品, 區段) 組合有歷史值",
        blended_count,
        current.len()
    );
    result
}

/// 單一產品跨批次的歷史統計；無任何覆蓋時回傳 None
pub fn product_stats(entries: &[KpiHistoryEntry], product: &str) -> Option<HistoricalProductStats> {
    let mut run_means: Vec<f64> = Vec::new();
    let mut total_runs = 0usize;
    let mut last_run: Option<NaiveDateTime> = None;

    for entry in entries {
        let ratios: Vec<f64> = entry
            .yearly
            .iter()
            .filter(|r| r.product == product)
            .filter_map(|r| r.kwh_per_m3)
            .collect();
        let covered = entry.yearly.iter().any(|r| r.product == product);
        if covered {
            total_runs += 1;
            last_run = Some(last_run.map_or(entry.recorded_at, |t| t.max(entry.recorded_at)));
        }
        if !ratios.is_empty() {
            run_means.push(ratios.iter().sum::<f64>() / ratios.len() as f64);
        }
    }

    let last_run = last_run?;
    if run_means.is_empty() {
        return None;
    }

    let mean = run_means.iter().sum::<f64>() / run_means.len() as f64;
    let std = if run_means.len() >= 2 {
        let var = run_means.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / (run_means.len() - 1) as f64;
        Some(var.sqrt())
    } else {
        None
    };

    Some(HistoricalProductStats {
        product: product.to_string(),
        avg_kwh_per_m3: mean,
        std_kwh_per_m3: std,
        total_runs,
        last_run,
    })
}
