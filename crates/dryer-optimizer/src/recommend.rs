//! 操作建議
//!
//! 依排序結果與產品檔案套用門檻規則，產生給現場排程人員的文字建議。

use std::collections::HashMap;

use dryer_core::RecommendationThresholds;

use crate::transition::OptimizationDatabase;
use crate::TransitionDetail;

/// 建議產生器
pub struct RecommendationEngine {
    thresholds: RecommendationThresholds,
}

impl RecommendationEngine {
    pub fn new(thresholds: RecommendationThresholds) -> Self {
        Self { thresholds }
    }

    /// 套用全部規則，依規則順序輸出建議
    pub fn generate(
        &self,
        db: &OptimizationDatabase,
        sequence: &[String],
        transitions: &[TransitionDetail],
        demand: Option<&HashMap<String, u32>>,
    ) -> Vec<String> {
        let mut out = Vec::new();

        // 規則 1: 高成本轉換
        for t in transitions {
            if t.cost_kwh > self.thresholds.high_cost_kwh {
                out.push(format!(
                    "{} → {} 轉換成本 {:.0} kWh 偏高，建議預留額外的調機時間",
                    t.from, t.to, t.cost_kwh
                ));
            }
        }

        // 規則 2: 材質轉換需清潔
        for t in transitions {
            if t.type_change {
                out.push(format!(
                    "{} → {} 為材質轉換，轉換時需清潔乾燥機並加強首批品質檢查",
                    t.from, t.to
                ));
            }
        }

        // 規則 3: 厚度跳變
        for t in transitions {
            if t.thickness_change_mm.abs() > self.thresholds.thickness_jump_mm {
                out.push(format!(
                    "{} → {} 厚度跳變 {:.0} mm，請確認各區段溫度設定已跟上",
                    t.from,
                    t.to,
                    t.thickness_change_mm.abs()
                ));
            }
        }

        // 規則 4: 高能耗產品排離峰
        for product in sequence {
            if let Some(profile) = db.profile(product) {
                if profile.avg_kwh_per_m3 > self.thresholds.high_energy_kwh_per_m3 {
                    out.push(format!(
                        "{} 平均能耗 {:.0} kWh/m³ 偏高，建議安排在離峰電價時段生產",
                        product, profile.avg_kwh_per_m3
                    ));
                }
            }
        }

        // 規則 5: 高總需求量提醒排班
        if let Some(demand) = demand {
            let total_wagons: u32 = sequence
                .iter()
                .filter_map(|p| demand.get(p))
                .sum();
            if total_wagons > self.thresholds.high_volume_wagons {
                out.push(format!(
                    "本批總需求 {total_wagons} 台車，建議提前確認班次與人力安排"
                ));
            }
        }

        out
    }
}
