//! # Dryer KPI History
//!
//! 分析與優化結果的歷史保存：追加式儲存（JSON Lines 檔案或記憶體）、
//! 歷史年度 KPI 的合併彙整，以及與當期結果的加權融合。

pub mod consolidate;
pub mod entry;
pub mod store;

// Re-export 主要類型
pub use consolidate::{
    blend_with_current, consolidate_yearly, product_stats, ConsolidatedRow,
    HistoricalProductStats,
};
pub use entry::{KpiHistoryEntry, OptimizationHistoryEntry};
pub use store::{HistoryStore, InMemoryHistoryStore, JsonlHistoryStore};

/// 歷史儲存錯誤類型
///
/// 區分「檔案不存在 → 視為無歷史，照常繼續」（非錯誤，store 直接回傳空集）
/// 與「檔案存在但內容毀損 → 必須回報」。
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("歷史檔案內容毀損（第 {line} 行）: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("歷史檔案 I/O 失敗: {0}")]
    Io(#[from] std::io::Error),

    #[error("歷史紀錄序列化失敗: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
