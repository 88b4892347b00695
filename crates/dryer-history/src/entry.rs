//! 歷史紀錄條目

use chrono::NaiveDateTime;
use dryer_core::YearlySummaryRow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 一次 KPI 分析的歷史條目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiHistoryEntry {
    /// 條目 ID
    pub id: Uuid,

    /// 分析時間
    pub recorded_at: NaiveDateTime,

    /// 年度彙總表（完整保存，供後續彙整）
    pub yearly: Vec<YearlySummaryRow>,

    /// 涵蓋的產品（去重）
    pub products: Vec<String>,

    /// 總能耗（kWh）
    pub total_energy_kwh: f64,

    /// 平均效率（kWh/m³，各列可用值的平均；無可用值時為 None）
    pub avg_kwh_per_m3: Option<f64>,
}

impl KpiHistoryEntry {
    /// 由年度彙總表建立條目（自動導出產品清單與統計值）
    pub fn from_yearly(yearly: Vec<YearlySummaryRow>, recorded_at: NaiveDateTime) -> Self {
        let mut products: Vec<String> = yearly.iter().map(|r| r.product.clone()).collect();
        products.sort();
        products.dedup();

        let total_energy_kwh = yearly.iter().map(|r| r.energy_kwh).sum();

        let ratios: Vec<f64> = yearly.iter().filter_map(|r| r.kwh_per_m3).collect();
        let avg_kwh_per_m3 = if ratios.is_empty() {
            None
        } else {
            Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
        };

        Self {
            id: Uuid::new_v4(),
            recorded_at,
            yearly,
            products,
            total_energy_kwh,
            avg_kwh_per_m3,
        }
    }
}

/// 一次排序優化的歷史條目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationHistoryEntry {
    /// 條目 ID
    pub id: Uuid,

    /// 優化時間
    pub recorded_at: NaiveDateTime,

    /// 輸入的產品集合
    pub products: Vec<String>,

    /// 最佳生產順序
    pub optimal_sequence: Vec<String>,

    /// 最佳順序的總轉換成本（kWh）
    pub total_cost: f64,

    /// 相對最差情境的節省百分比
    pub savings_percent: f64,
}

impl OptimizationHistoryEntry {
    pub fn new(
        products: Vec<String>,
        optimal_sequence: Vec<String>,
        total_cost: f64,
        savings_percent: f64,
        recorded_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            products,
            optimal_sequence,
            total_cost,
            savings_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dryer_core::Zone;

    fn ts() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_from_yearly_derives_stats() {
        let yearly = vec![
            YearlySummaryRow::new("L36".to_string(), Zone::Z2, 100.0, 4.0),
            YearlySummaryRow::new("L36".to_string(), Zone::Z3, 200.0, 4.0),
            YearlySummaryRow::new("L30".to_string(), Zone::Z2, 60.0, 2.0),
        ];
        let entry = KpiHistoryEntry::from_yearly(yearly, ts());

        assert_eq!(entry.products, vec!["L30".to_string(), "L36".to_string()]);
        assert_eq!(entry.total_energy_kwh, 360.0);
        // (25 + 50 + 30) / 3
        assert_eq!(entry.avg_kwh_per_m3, Some(35.0));
    }

    #[test]
    fn test_from_yearly_empty_ratio_is_none() {
        let yearly = vec![YearlySummaryRow::new("L36".to_string(), Zone::Z2, 100.0, 0.0)];
        let entry = KpiHistoryEntry::from_yearly(yearly, ts());

        assert_eq!(entry.avg_kwh_per_m3, None);
        assert_eq!(entry.total_energy_kwh, 100.0);
    }
}
