//! 台車追蹤資料解析

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use dryer_core::{AnalysisConfig, DryerError, RawWagonRow, WagonRecord, Zone};

use crate::duration::{duration_hours, parse_duration_text, parse_timestamp};

/// 台車解析器：原始追蹤列 → `WagonRecord`
///
/// 逐列容錯：時間、體積無法判定的列略過。整批缺少台車編號欄
/// 則為結構性錯誤，直接回傳錯誤讓呼叫端提示欄位設定。
pub struct WagonParser {
    config: AnalysisConfig,
}

impl WagonParser {
    /// 創建新的台車解析器
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 解析整批原始列，回傳記錄與被略過的列數
    pub fn parse(&self, rows: &[RawWagonRow]) -> dryer_core::Result<(Vec<WagonRecord>, usize)> {
        if !rows.is_empty() && rows.iter().all(|r| r.wagon_id.is_none()) {
            return Err(DryerError::MissingColumn(
                "台車編號（WG- 開頭欄位）".to_string(),
            ));
        }

        let mut wagons = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;

        for row in rows {
            match self.parse_row(row) {
                Some(wagon) => wagons.push(wagon),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!("台車資料有 {} 列無法解析（缺編號、時間或體積），已略過", skipped);
        }
        tracing::info!("解析 {} 筆台車記錄", wagons.len());

        Ok((wagons, skipped))
    }

    fn parse_row(&self, row: &RawWagonRow) -> Option<WagonRecord> {
        let id = row.wagon_id.clone()?;
        let t0 = parse_timestamp(&row.press_timestamp)?;

        // 體積：追蹤表值優先，否則依厚度以板材幾何推算
        let volume_m3 = row
            .volume_m3
            .filter(|v| v.is_finite() && *v > 0.0)
            .or_else(|| row.thickness_mm.map(|t| self.config.plate_volume_m3(t)))?;

        // 區段進入時間；Z1 進入即入窯時間
        let mut entries: BTreeMap<Zone, NaiveDateTime> = BTreeMap::new();
        for (&zone, raw) in &row.zone_entries {
            if let Some(ts) = parse_timestamp(raw) {
                entries.insert(zone, ts);
            }
        }
        entries.insert(Zone::Z1, t0);

        let removal = row
            .removal_timestamp
            .as_deref()
            .and_then(parse_timestamp);

        let durations = self.resolve_durations(row, &entries, removal);

        Some(WagonRecord {
            id,
            product: row.product.clone(),
            thickness_mm: row.thickness_mm,
            volume_m3,
            dryer_start: t0,
            month: t0.month(),
            year: t0.year(),
            zone_entries: entries,
            zone_durations_h: durations,
        })
    }

    /// 停留時間判定：文字值可信（在可信區間內）時優先，否則改用
    /// 相鄰進入時間的差值（Z5 以出窯時間收尾）
    fn resolve_durations(
        &self,
        row: &RawWagonRow,
        entries: &BTreeMap<Zone, NaiveDateTime>,
        removal: Option<NaiveDateTime>,
    ) -> BTreeMap<Zone, f64> {
        let mut durations = BTreeMap::new();

        for &zone in &Zone::SEQUENCE {
            let computed = self.computed_duration(zone, entries, removal);

            let stated = row
                .zone_duration_texts
                .get(&zone)
                .and_then(|text| parse_duration_text(text))
                .map(duration_hours)
                .filter(|h| {
                    *h >= self.config.min_stated_duration_hours
                        && *h <= self.config.max_stated_duration_hours
                });

            if let Some(hours) = stated.or(computed) {
                durations.insert(zone, hours);
            }
        }

        durations
    }

    fn computed_duration(
        &self,
        zone: Zone,
        entries: &BTreeMap<Zone, NaiveDateTime>,
        removal: Option<NaiveDateTime>,
    ) -> Option<f64> {
        let start = entries.get(&zone).copied()?;
        let end = match zone.next() {
            Some(next) => entries.get(&next).copied()?,
            None => removal?,
        };
        Some(duration_hours(end - start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_row() -> RawWagonRow {
        RawWagonRow::new("WG-0001", "L36", "2025-03-01 07:00")
            .with_thickness(36.0)
            .with_volume(2.4)
    }

    #[test]
    fn test_parse_basic_row() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let rows = vec![base_row()
            .with_entry(Zone::Z2, "2025-03-01 08:05")
            .with_entry(Zone::Z3, "2025-03-01 13:35")];

        let (wagons, skipped) = parser.parse(&rows).unwrap();

        assert_eq!(skipped, 0);
        assert_eq!(wagons.len(), 1);
        let w = &wagons[0];
        assert_eq!(w.id, "WG-0001");
        assert_eq!(w.month, 3);
        // Z1 進入 = 入窯時間
        assert_eq!(w.entry(Zone::Z1), Some(w.dryer_start));
        // Z1 停留由 Z2 進入時間推算：07:00 → 08:05
        let z1 = w.duration_h(Zone::Z1).unwrap();
        assert!((z1 - 65.0 / 60.0).abs() < 1e-9);
        // Z2 停留：08:05 → 13:35 = 5.5 小時
        assert_eq!(w.duration_h(Zone::Z2), Some(5.5));
        // Z3 之後無資料
        assert_eq!(w.duration_h(Zone::Z3), None);
    }

    #[test]
    fn test_stated_duration_preferred_when_plausible() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let rows = vec![base_row()
            .with_entry(Zone::Z2, "2025-03-01 08:00")
            .with_entry(Zone::Z3, "2025-03-01 12:00")
            .with_duration_text(Zone::Z2, "5 h 30 min")];

        let (wagons, _) = parser.parse(&rows).unwrap();
        // 文字值 5.5h 可信，蓋過推算的 4h
        assert_eq!(wagons[0].duration_h(Zone::Z2), Some(5.5));
    }

    #[test]
    fn test_implausible_stated_duration_falls_back() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let rows = vec![base_row()
            .with_entry(Zone::Z2, "2025-03-01 08:00")
            .with_entry(Zone::Z3, "2025-03-01 12:00")
            // 低於一小時的文字值視為可疑
            .with_duration_text(Zone::Z2, "0:20")];

        let (wagons, _) = parser.parse(&rows).unwrap();
        assert_eq!(wagons[0].duration_h(Zone::Z2), Some(4.0));
    }

    #[test]
    fn test_z5_duration_uses_removal_time() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let rows = vec![base_row()
            .with_entry(Zone::Z5, "2025-03-02 01:00")
            .with_removal("2025-03-02 07:00")];

        let (wagons, _) = parser.parse(&rows).unwrap();
        assert_eq!(wagons[0].duration_h(Zone::Z5), Some(6.0));
    }

    #[test]
    fn test_volume_derived_from_thickness() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let rows = vec![RawWagonRow::new("WG-0002", "L36", "2025-03-01 07:00")
            .with_thickness(36.0)];

        let (wagons, _) = parser.parse(&rows).unwrap();
        let expected = AnalysisConfig::default().plate_volume_m3(36.0);
        assert_eq!(wagons[0].volume_m3, expected);
    }

    #[test]
    fn test_row_without_volume_or_thickness_skipped() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let rows = vec![RawWagonRow::new("WG-0003", "L36", "2025-03-01 07:00")];

        let (wagons, skipped) = parser.parse(&rows).unwrap();
        assert!(wagons.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_missing_wagon_column_is_structural_error() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let mut row = base_row();
        row.wagon_id = None;

        let err = parser.parse(&[row]).unwrap_err();
        assert!(matches!(err, DryerError::MissingColumn(_)));
    }

    #[test]
    fn test_invalid_press_timestamp_skipped() {
        let parser = WagonParser::new(AnalysisConfig::default());
        let mut bad = base_row();
        bad.press_timestamp = "???".to_string();

        let (wagons, skipped) = parser.parse(&[bad, base_row()]).unwrap();
        assert_eq!(wagons.len(), 1);
        assert_eq!(skipped, 1);
    }
}
