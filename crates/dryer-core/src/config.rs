//! 分析與優化配置模型
//!
//! 所有配置在建構時傳入各元件，管線階段之間不共享可變全域狀態。

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// KPI 分析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 瓦斯量轉換係數（kWh / m³ 瓦斯）
    pub gas_to_kwh: f64,

    /// 區段製程順序
    pub zone_order: Vec<Zone>,

    /// 產品篩選（None 表示不篩選）
    pub product_filter: Option<Vec<String>>,

    /// 月份篩選（1-12，None 表示不篩選）
    pub month_filter: Option<u32>,

    /// 板材寬度（m），體積推算用
    pub plate_width_m: f64,

    /// 裁切餘量（mm），體積推算用
    pub cutting_allowance_mm: f64,

    /// 文字停留時間的可信下限（小時）；低於此值改用時間戳記推算
    pub min_stated_duration_hours: f64,

    /// 文字停留時間的可信上限（小時）；Excel 日期誤植保護
    pub max_stated_duration_hours: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            gas_to_kwh: 11.5,
            zone_order: Zone::SEQUENCE.to_vec(),
            product_filter: None,
            month_filter: None,
            plate_width_m: 0.605,
            cutting_allowance_mm: 7.0,
            min_stated_duration_hours: 1.0,
            max_stated_duration_hours: 168.0,
        }
    }
}

impl AnalysisConfig {
    /// 建構器模式：設置瓦斯轉換係數
    pub fn with_gas_to_kwh(mut self, factor: f64) -> Self {
        self.gas_to_kwh = factor;
        self
    }

    /// 建構器模式：設置產品篩選
    pub fn with_product_filter(mut self, products: Vec<String>) -> Self {
        self.product_filter = Some(products);
        self
    }

    /// 建構器模式：設置月份篩選
    pub fn with_month_filter(mut self, month: u32) -> Self {
        self.month_filter = Some(month);
        self
    }

    /// 依板材幾何推算單板體積（m³）
    ///
    /// 體積 = 寬 × 寬 × (厚度 + 裁切餘量) / 1000
    pub fn plate_volume_m3(&self, thickness_mm: f64) -> f64 {
        self.plate_width_m * self.plate_width_m * (thickness_mm + self.cutting_allowance_mm)
            / 1000.0
    }
}

/// 轉換成本權重
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransitionWeights {
    /// 厚度差成本（kWh / mm）
    pub thickness_per_mm: f64,

    /// 材質轉換固定罰分（kWh，需清潔）
    pub type_change_penalty: f64,

    /// 整體能耗差權重（溫度調整）
    pub energy_weight: f64,

    /// 分區能耗差權重（兩側皆有分區統計時）
    pub zone_energy_weight: f64,
}

impl Default for TransitionWeights {
    fn default() -> Self {
        Self {
            thickness_per_mm: 3.0,
            type_change_penalty: 50.0,
            energy_weight: 0.8,
            zone_energy_weight: 0.2,
        }
    }
}

/// 建議規則門檻
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    /// 高轉換成本門檻（kWh）
    pub high_cost_kwh: f64,

    /// 厚度跳變門檻（mm）
    pub thickness_jump_mm: f64,

    /// 高能耗產品門檻（kWh/m³）
    pub high_energy_kwh_per_m3: f64,

    /// 高產量門檻（台車數）
    pub high_volume_wagons: u32,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            high_cost_kwh: 100.0,
            thickness_jump_mm: 8.0,
            high_energy_kwh_per_m3: 100.0,
            high_volume_wagons: 100,
        }
    }
}

/// 排序優化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// 窮舉搜尋的產品數上限（超過改用貪婪啟發式）
    pub exhaustive_threshold: usize,

    /// 窮舉排列數預算；n! 超出時退回貪婪啟發式
    pub permutation_budget: u64,

    /// 貪婪搜尋的一步前瞻權重
    pub lookahead_weight: f64,

    /// 轉換成本權重
    pub weights: TransitionWeights,

    /// 建議規則門檻
    pub thresholds: RecommendationThresholds,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            exhaustive_threshold: 8,
            permutation_budget: 40_320, // 8!
            lookahead_weight: 0.3,
            weights: TransitionWeights::default(),
            thresholds: RecommendationThresholds::default(),
        }
    }
}

impl OptimizerConfig {
    /// 建構器模式：設置窮舉門檻
    pub fn with_exhaustive_threshold(mut self, threshold: usize) -> Self {
        self.exhaustive_threshold = threshold;
        self
    }

    /// 建構器模式：設置排列數預算
    pub fn with_permutation_budget(mut self, budget: u64) -> Self {
        self.permutation_budget = budget;
        self
    }

    /// 建構器模式：設置轉換成本權重
    pub fn with_weights(mut self, weights: TransitionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// 建構器模式：設置建議門檻
    pub fn with_thresholds(mut self, thresholds: RecommendationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}
