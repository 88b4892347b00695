//! 能耗資料解析

use std::collections::BTreeMap;

use dryer_core::{AnalysisConfig, EnergyReading, RawEnergyRow};

use crate::duration::parse_timestamp;

/// 能耗解析器：原始每小時讀值 → `EnergyReading`
///
/// 各區段瓦斯量（m³）依配置係數換算為 kWh；時間戳記無法解析的列
/// 直接略過（記數後以警告回報），不中斷整批。
pub struct EnergyParser {
    config: AnalysisConfig,
}

impl EnergyParser {
    /// 創建新的能耗解析器
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 解析整批原始列，回傳讀值與被略過的列數
    pub fn parse(&self, rows: &[RawEnergyRow]) -> (Vec<EnergyReading>, usize) {
        let mut readings = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;

        for row in rows {
            let Some(window_start) = parse_timestamp(&row.timestamp) else {
                skipped += 1;
                continue;
            };

            let mut zone_energy = BTreeMap::new();
            for (&zone, &gas_m3) in &row.gas_m3 {
                zone_energy.insert(zone, gas_m3 * self.config.gas_to_kwh);
            }

            let mut reading = EnergyReading::new(window_start, zone_energy);
            if let Some(kwh) = row.electrical_kwh {
                reading = reading.with_electrical(kwh);
            }
            readings.push(reading);
        }

        if skipped > 0 {
            tracing::warn!("能耗資料有 {} 列時間戳記無法解析，已略過", skipped);
        }
        tracing::info!("解析 {} 筆能耗讀值", readings.len());

        (readings, skipped)
    }
}
