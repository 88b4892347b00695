//! 產品能耗檔案模型
//!
//! 由歷史分攤結果彙整而成，優化時視為唯讀參考資料。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// 資料可信度等級（依台車樣本數分級）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
    VeryLow,
}

impl Confidence {
    /// 依台車樣本數分級
    pub fn from_wagon_count(count: usize) -> Self {
        if count >= 50 {
            Confidence::High
        } else if count >= 20 {
            Confidence::Medium
        } else if count >= 5 {
            Confidence::Low
        } else {
            Confidence::VeryLow
        }
    }
}

/// 單一區段的產品能耗統計
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneProfile {
    /// 分攤能耗合計（kWh）
    pub total_energy_kwh: f64,

    /// 平均單筆分攤能耗（kWh）
    pub avg_energy_kwh: f64,

    /// 效率（kWh/m³）；無體積資料時為 None
    pub kwh_per_m3: Option<f64>,

    /// 佔用時數合計
    pub total_hours: f64,
}

/// 產品能耗檔案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductProfile {
    /// 產品代碼
    pub product: String,

    /// 板材厚度（mm），取自產品代碼中的數字
    pub thickness_mm: f64,

    /// 材質代碼（產品代碼首字母）
    pub material_type: char,

    /// 生產台車數
    pub total_wagons: usize,

    /// 體積合計（m³）
    pub total_volume_m3: f64,

    /// 分攤能耗合計（kWh）
    pub total_energy_kwh: f64,

    /// 佔用時數合計
    pub total_hours: f64,

    /// 平均能耗（kWh/m³）；無體積資料時為 0
    pub avg_kwh_per_m3: f64,

    /// 單台車平均能耗（kWh）
    pub kwh_per_wagon: f64,

    /// 各區段統計
    pub zone_profiles: BTreeMap<Zone, ZoneProfile>,

    /// 可信度等級
    pub confidence: Confidence,
}

impl ProductProfile {
    /// 從產品代碼取出厚度（首段連續數字，例如 "L36" → 36）；無數字時預設 36
    pub fn thickness_from_code(code: &str) -> f64 {
        let digits: String = code
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(36.0)
    }

    /// 從產品代碼取出材質（首字母）；空代碼預設 'L'
    pub fn material_from_code(code: &str) -> char {
        code.chars().next().unwrap_or('L')
    }

    /// 取得單一區段統計
    pub fn zone_profile(&self, zone: Zone) -> Option<&ZoneProfile> {
        self.zone_profiles.get(&zone)
    }
}
