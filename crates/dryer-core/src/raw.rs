//! 原始資料列模型
//!
//! 檔案載入層（Excel/CSV，不在本 crate 範圍內）交付給解析器的列格式。
//! 所有欄位保留原始文字，解析與容錯由 dryer-calc 負責。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// 每小時能耗原始列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnergyRow {
    /// 時間戳記原始文字（整點）
    pub timestamp: String,

    /// 各區段瓦斯量（m³），缺漏欄位不出現在映射中
    pub gas_m3: BTreeMap<Zone, f64>,

    /// 電力消耗（kWh）
    pub electrical_kwh: Option<f64>,
}

impl RawEnergyRow {
    /// 創建新的能耗原始列
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            gas_m3: BTreeMap::new(),
            electrical_kwh: None,
        }
    }

    /// 建構器模式：設置單一區段瓦斯量
    pub fn with_gas(mut self, zone: Zone, m3: f64) -> Self {
        self.gas_m3.insert(zone, m3);
        self
    }

    /// 建構器模式：設置電力消耗
    pub fn with_electrical(mut self, kwh: f64) -> Self {
        self.electrical_kwh = Some(kwh);
        self
    }
}

/// 台車追蹤原始列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWagonRow {
    /// 台車編號（WG-Nr 欄位；整批缺失視為結構性錯誤）
    pub wagon_id: Option<String>,

    /// 產品代碼（例如 L36、N40）
    pub product: String,

    /// 板材厚度（mm）
    pub thickness_mm: Option<f64>,

    /// 體積（m³）；缺漏時由厚度以板材幾何推算
    pub volume_m3: Option<f64>,

    /// 壓製（入窯）時間戳記原始文字
    pub press_timestamp: String,

    /// 各區段進入時間原始文字（Z1 固定為入窯時間，不在此映射中）
    pub zone_entries: BTreeMap<Zone, String>,

    /// 各區段停留時間的自由文字（「Zeit in Zx」欄）
    pub zone_duration_texts: BTreeMap<Zone, String>,

    /// 出窯時間原始文字
    pub removal_timestamp: Option<String>,
}

impl RawWagonRow {
    /// 創建新的台車原始列
    pub fn new(
        wagon_id: impl Into<String>,
        product: impl Into<String>,
        press_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            wagon_id: Some(wagon_id.into()),
            product: product.into(),
            thickness_mm: None,
            volume_m3: None,
            press_timestamp: press_timestamp.into(),
            zone_entries: BTreeMap::new(),
            zone_duration_texts: BTreeMap::new(),
            removal_timestamp: None,
        }
    }

    /// 建構器模式：設置厚度
    pub fn with_thickness(mut self, thickness_mm: f64) -> Self {
        self.thickness_mm = Some(thickness_mm);
        self
    }

    /// 建構器模式：設置體積
    pub fn with_volume(mut self, volume_m3: f64) -> Self {
        self.volume_m3 = Some(volume_m3);
        self
    }

    /// 建構器模式：設置區段進入時間
    pub fn with_entry(mut self, zone: Zone, timestamp: impl Into<String>) -> Self {
        self.zone_entries.insert(zone, timestamp.into());
        self
    }

    /// 建構器模式：設置區段停留時間文字
    pub fn with_duration_text(mut self, zone: Zone, text: impl Into<String>) -> Self {
        self.zone_duration_texts.insert(zone, text.into());
        self
    }

    /// 建構器模式：設置出窯時間
    pub fn with_removal(mut self, timestamp: impl Into<String>) -> Self {
        self.removal_timestamp = Some(timestamp.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_row_builder() {
        let row = RawEnergyRow::new("2025-03-01 08:00:00")
            .with_gas(Zone::Z2, 4.5)
            .with_gas(Zone::Z3, 3.2)
            .with_electrical(120.0);

        assert_eq!(row.gas_m3.len(), 2);
        assert_eq!(row.gas_m3[&Zone::Z2], 4.5);
        assert_eq!(row.electrical_kwh, Some(120.0));
    }

    #[test]
    fn test_wagon_row_builder() {
        let row = RawWagonRow::new("WG-0012", "L36", "01.03.2025 07:30")
            .with_thickness(36.0)
            .with_entry(Zone::Z2, "01.03.2025 08:35")
            .with_duration_text(Zone::Z2, "5 h 30 min");

        assert_eq!(row.wagon_id.as_deref(), Some("WG-0012"));
        assert_eq!(row.zone_entries.len(), 1);
        assert!(row.volume_m3.is_none());
    }
}
