//! # Dryer KPI
//!
//! 乾燥機能耗 KPI 分攤與生產排序優化。
//!
//! 工作區入口 crate：re-export 各子 crate 的主要介面。
//!
//! - [`dryer_core`] — 共用資料模型與配置
//! - [`dryer_calc`] — 解析、區段佔用、能耗分攤與 KPI 彙總
//! - [`dryer_optimizer`] — 轉換成本模型與排序搜尋
//! - [`dryer_history`] — 分析歷史保存與融合

pub use dryer_calc::{AnalysisResult, EnergyAllocator, IntervalBuilder, KpiAnalyzer};
pub use dryer_core::{
    AnalysisConfig, OptimizerConfig, ProductProfile, RawEnergyRow, RawWagonRow, Zone,
};
pub use dryer_history::{HistoryStore, JsonlHistoryStore, KpiHistoryEntry};
pub use dryer_optimizer::{OptimizationDatabase, OptimizationOutcome, SequenceOptimizer};
