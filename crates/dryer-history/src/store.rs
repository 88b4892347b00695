//! 追加式歷史儲存
//!
//! 窄介面：`append` 與 `load_all`，背後可換實作。
//! JSON Lines 後端每次操作整份讀寫，不做增量索引，
//! 以保留上限（最後 N 筆）控制檔案大小。

use std::fs;
use std::io::Write as _;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{HistoryError, Result};

/// KPI 歷史保留上限
pub const KPI_RETENTION: usize = 100;

/// 優化歷史保留上限
pub const OPTIMIZATION_RETENTION: usize = 50;

/// 歷史儲存介面
pub trait HistoryStore<T> {
    /// 追加一筆條目（超過保留上限時丟棄最舊者）
    fn append(&mut self, entry: T) -> Result<()>;

    /// 載入全部條目（最舊在前）；無任何歷史時回傳空集
    fn load_all(&self) -> Result<Vec<T>>;
}

/// JSON Lines 檔案後端
///
/// 檔案不存在視為無歷史（回傳空集），檔案存在但內容無法解析
/// 則回報 `HistoryError::Corrupt`。
pub struct JsonlHistoryStore<T> {
    path: PathBuf,
    retention: usize,
    _marker: PhantomData<T>,
}

impl<T> JsonlHistoryStore<T> {
    pub fn new(path: impl AsRef<Path>, retention: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            retention,
            _marker: PhantomData,
        }
    }

    /// KPI 歷史檔（保留最後 100 筆）
    pub fn kpi(path: impl AsRef<Path>) -> Self {
        Self::new(path, KPI_RETENTION)
    }

    /// 優化歷史檔（保留最後 50 筆）
    pub fn optimization(path: impl AsRef<Path>) -> Self {
        Self::new(path, OPTIMIZATION_RETENTION)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + DeserializeOwned> JsonlHistoryStore<T> {
    fn read_entries(&self) -> Result<Vec<T>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryError::Io(e)),
        };

        let mut entries = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(line).map_err(|source| HistoryError::Corrupt {
                line: i + 1,
                source,
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn write_entries(&self, entries: &[T]) -> Result<()> {
        let mut buf = Vec::new();
        for entry in entries {
            serde_json::to_writer(&mut buf, entry)?;
            buf.push(b'\n');
        }
        // 先寫暫存檔再改名，中途失敗不會毀掉既有歷史
        let tmp = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&buf)?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl<T: Serialize + DeserializeOwned> HistoryStore<T> for JsonlHistoryStore<T> {
    fn append(&mut self, entry: T) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.push(entry);

        if entries.len() > self.retention {
            let excess = entries.len() - self.retention;
            entries.drain(..excess);
            tracing::debug!("歷史超過保留上限 {}，丟棄最舊 {} 筆", self.retention, excess);
        }

        self.write_entries(&entries)
    }

    fn load_all(&self) -> Result<Vec<T>> {
        self.read_entries()
    }
}

/// 記憶體後端（測試與暫存分析用）
pub struct InMemoryHistoryStore<T> {
    entries: Vec<T>,
    retention: usize,
}

impl<T> InMemoryHistoryStore<T> {
    pub fn new(retention: usize) -> Self {
        Self {
            entries: Vec::new(),
            retention,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> HistoryStore<T> for InMemoryHistoryStore<T> {
    fn append(&mut self, entry: T) -> Result<()> {
        self.entries.push(entry);
        if self.entries.len() > self.retention {
            let excess = self.entries.len() - self.retention;
            self.entries.drain(..excess);
        }
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<T>> {
        Ok(self.entries.clone())
    }
}
