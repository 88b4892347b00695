//! # Dryer Core
//!
//! 核心資料模型與類型定義

pub mod allocation;
pub mod config;
pub mod energy;
pub mod interval;
pub mod profile;
pub mod raw;
pub mod summary;
pub mod wagon;
pub mod zone;

// Re-export 主要類型
pub use allocation::AllocationRecord;
pub use config::{AnalysisConfig, OptimizerConfig, RecommendationThresholds, TransitionWeights};
pub use energy::EnergyReading;
pub use interval::ZoneInterval;
pub use profile::{Confidence, ProductProfile, ZoneProfile};
pub use raw::{RawEnergyRow, RawWagonRow};
pub use summary::{kwh_per_m3, MonthlySummaryRow, YearlySummaryRow};
pub use wagon::WagonRecord;
pub use zone::Zone;

/// 乾燥分析錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum DryerError {
    #[error("找不到必要欄位: {0}")]
    MissingColumn(String),

    #[error("無效的月份篩選: {0}（必須為 1-12）")]
    InvalidMonthFilter(u32),

    #[error("無效的時間戳記: {0}")]
    InvalidTimestamp(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DryerError>;
