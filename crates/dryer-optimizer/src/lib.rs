//! # Dryer Production Sequence Optimizer
//!
//! 生產排序優化：最小化產品切換的累積轉換能耗

pub mod recommend;
pub mod search;
pub mod transition;

// Re-export 主要類型
pub use recommend::RecommendationEngine;
pub use search::{SearchMethod, SequenceComparison, SequenceOptimizer};
pub use transition::{
    transition_cost, OptimizationDatabase, OptimizationRules, PreferredSequence, TransitionMatrix,
};

use serde::{Deserialize, Serialize};

/// 排序優化錯誤類型
///
/// 以結構化錯誤回傳，呼叫端可直接轉為使用者提示。
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("未指定任何產品")]
    NoProducts,

    #[error("未知的產品（不在能耗檔案中）: {0:?}")]
    UnknownProducts(Vec<String>),
}

/// 單一轉換的明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDetail {
    /// 來源產品
    pub from: String,

    /// 目標產品
    pub to: String,

    /// 轉換成本（kWh）
    pub cost_kwh: f64,

    /// 厚度變化（mm，帶號）
    pub thickness_change_mm: f64,

    /// 是否為材質轉換
    pub type_change: bool,

    /// 能耗強度變化（kWh/m³，帶號）
    pub energy_change: f64,
}

/// 總能耗估算（有需求量時）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyEstimate {
    /// 生產能耗（kWh）= Σ 單台車能耗 × 台車數
    pub production_kwh: f64,

    /// 轉換能耗（kWh）
    pub transition_kwh: f64,

    /// 合計（kWh）
    pub total_kwh: f64,
}

/// 排序優化結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// 最佳生產順序
    pub sequence: Vec<String>,

    /// 最佳順序的總轉換成本（kWh）
    pub total_cost: f64,

    /// 最差情境成本（薄厚交錯排列）
    pub worst_case_cost: f64,

    /// 相對最差情境的節省百分比（最差成本為 0 時為 0）
    pub savings_percent: f64,

    /// 各轉換明細
    pub transitions: Vec<TransitionDetail>,

    /// 建議清單
    pub recommendations: Vec<String>,

    /// 總能耗估算（無需求量時為 None）
    pub estimated_energy: Option<EnergyEstimate>,

    /// 實際使用的搜尋方法
    pub method: SearchMethod,
}
