//! # Dryer KPI Calculation Engine
//!
//! 核心計算管線：解析 → 時段建構 → 能耗分攤 → KPI 彙總

pub mod allocation;
pub mod analyzer;
pub mod duration;
pub mod energy;
pub mod intervals;
pub mod profiles;
pub mod summary;
pub mod wagon;

// Re-export 主要類型
pub use allocation::EnergyAllocator;
pub use analyzer::KpiAnalyzer;
pub use energy::EnergyParser;
pub use intervals::IntervalBuilder;
pub use profiles::ProfileBuilder;
pub use summary::SummaryCalculator;
pub use wagon::WagonParser;

use dryer_core::{
    AllocationRecord, EnergyReading, MonthlySummaryRow, WagonRecord, YearlySummaryRow,
    ZoneInterval,
};

/// KPI 分析結果
///
/// 保留所有中間表（外部匯出層逐表輸出），附帶各階段警告與耗時。
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// 分析執行 ID
    pub run_id: uuid::Uuid,

    /// 解析後能耗讀值
    pub readings: Vec<EnergyReading>,

    /// 解析後台車記錄（已套用篩選）
    pub wagons: Vec<WagonRecord>,

    /// 區段佔用時段
    pub intervals: Vec<ZoneInterval>,

    /// 能耗分攤記錄
    pub allocations: Vec<AllocationRecord>,

    /// 月度彙總
    pub monthly: Vec<MonthlySummaryRow>,

    /// 年度彙總
    pub yearly: Vec<YearlySummaryRow>,

    /// 階段警告（空結果、被略過的資料列）
    pub warnings: Vec<AnalysisWarning>,

    /// 計算耗時（毫秒）
    pub elapsed_ms: Option<u128>,
}

impl AnalysisResult {
    /// 創建空的分析結果
    pub fn empty() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            readings: Vec::new(),
            wagons: Vec::new(),
            intervals: Vec::new(),
            allocations: Vec::new(),
            monthly: Vec::new(),
            yearly: Vec::new(),
            warnings: Vec::new(),
            elapsed_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: AnalysisWarning) {
        self.warnings.push(warning);
    }

    /// 是否沒有產出任何分攤結果
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// 年度總能耗（kWh）
    pub fn total_energy_kwh(&self) -> f64 {
        self.yearly.iter().map(|r| r.energy_kwh).sum()
    }

    /// 年度總體積（m³）
    pub fn total_volume_m3(&self) -> f64 {
        self.yearly.iter().map(|r| r.volume_m3).sum()
    }
}

/// 管線階段（警告來源；彙總為純分組，不產生警告）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParseEnergy,
    ParseWagons,
    Filter,
    BuildIntervals,
    Allocate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ParseEnergy => "parse_energy",
            Stage::ParseWagons => "parse_wagons",
            Stage::Filter => "filter",
            Stage::BuildIntervals => "build_intervals",
            Stage::Allocate => "allocate",
        }
    }
}

/// 分析警告
#[derive(Debug, Clone)]
pub struct AnalysisWarning {
    pub stage: Stage,
    pub message: String,
    pub severity: WarningSeverity,
}

impl AnalysisWarning {
    pub fn new(stage: Stage, message: String, severity: WarningSeverity) -> Self {
        Self {
            stage,
            message,
            severity,
        }
    }

    pub fn info(stage: Stage, message: String) -> Self {
        Self::new(stage, message, WarningSeverity::Info)
    }

    pub fn warning(stage: Stage, message: String) -> Self {
        Self::new(stage, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
}
