//! KPI 彙總列模型

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// 效率比值：kWh / m³；體積為零時回傳 None（不除以零）
pub fn kwh_per_m3(energy_kwh: f64, volume_m3: f64) -> Option<f64> {
    if volume_m3 == 0.0 {
        None
    } else {
        Some(energy_kwh / volume_m3)
    }
}

/// 月度彙總列：(月份, 產品, 區段) 分組
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummaryRow {
    /// 月份（1-12）
    pub month: u32,

    /// 產品代碼
    pub product: String,

    /// 區段
    pub zone: Zone,

    /// 分攤能耗合計（kWh）
    pub energy_kwh: f64,

    /// 體積合計（m³）
    pub volume_m3: f64,

    /// 效率 KPI（kWh/m³）；體積為零時為 None
    pub kwh_per_m3: Option<f64>,
}

/// 年度彙總列：(產品, 區段) 分組
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlySummaryRow {
    /// 產品代碼
    pub product: String,

    /// 區段
    pub zone: Zone,

    /// 分攤能耗合計（kWh）
    pub energy_kwh: f64,

    /// 體積合計（m³）
    pub volume_m3: f64,

    /// 效率 KPI（kWh/m³）；體積為零時為 None
    pub kwh_per_m3: Option<f64>,
}

impl YearlySummaryRow {
    /// 創建新的年度彙總列（自動導出 KPI）
    pub fn new(product: String, zone: Zone, energy_kwh: f64, volume_m3: f64) -> Self {
        Self {
            product,
            zone,
            energy_kwh,
            volume_m3,
            kwh_per_m3: kwh_per_m3(energy_kwh, volume_m3),
        }
    }
}

impl MonthlySummaryRow {
    /// 創建新的月度彙總列（自動導出 KPI）
    pub fn new(month: u32, product: String, zone: Zone, energy_kwh: f64, volume_m3: f64) -> Self {
        Self {
            month,
            product,
            zone,
            energy_kwh,
            volume_m3,
            kwh_per_m3: kwh_per_m3(energy_kwh, volume_m3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_null_on_zero_volume() {
        assert_eq!(kwh_per_m3(100.0, 0.0), None);
        assert_eq!(kwh_per_m3(100.0, 4.0), Some(25.0));
    }

    #[test]
    fn test_row_derives_ratio() {
        let row = YearlySummaryRow::new("L36".to_string(), Zone::Z3, 120.0, 3.0);
        assert_eq!(row.kwh_per_m3, Some(40.0));

        let empty = YearlySummaryRow::new("L36".to_string(), Zone::Z3, 0.0, 0.0);
        assert_eq!(empty.kwh_per_m3, None);
    }
}
