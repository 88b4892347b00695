//! 乾燥區段定義

use serde::{Deserialize, Serialize};

/// 乾燥區段（台車依序通過 Z1 → Z5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    Z1,
    Z2,
    Z3,
    Z4,
    Z5,
}

impl Zone {
    /// 固定的製程順序
    pub const SEQUENCE: [Zone; 5] = [Zone::Z1, Zone::Z2, Zone::Z3, Zone::Z4, Zone::Z5];

    /// 有瓦斯計量的區段（Z1 為預熱區，無獨立表計）
    pub const METERED: [Zone; 4] = [Zone::Z2, Zone::Z3, Zone::Z4, Zone::Z5];

    /// 區段名稱
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Z1 => "Z1",
            Zone::Z2 => "Z2",
            Zone::Z3 => "Z3",
            Zone::Z4 => "Z4",
            Zone::Z5 => "Z5",
        }
    }

    /// 在製程順序中的位置（0 起算）
    pub fn sequence_index(&self) -> usize {
        match self {
            Zone::Z1 => 0,
            Zone::Z2 => 1,
            Zone::Z3 => 2,
            Zone::Z4 => 3,
            Zone::Z5 => 4,
        }
    }

    /// 下一個區段（Z5 之後為出窯）
    pub fn next(&self) -> Option<Zone> {
        let idx = self.sequence_index();
        Zone::SEQUENCE.get(idx + 1).copied()
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Zone {
    type Err = crate::DryerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Z1" => Ok(Zone::Z1),
            "Z2" => Ok(Zone::Z2),
            "Z3" => Ok(Zone::Z3),
            "Z4" => Ok(Zone::Z4),
            "Z5" => Ok(Zone::Z5),
            other => Err(crate::DryerError::Other(format!("未知的區段: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_order() {
        assert_eq!(Zone::SEQUENCE[0], Zone::Z1);
        assert_eq!(Zone::SEQUENCE[4], Zone::Z5);

        // Ord 與製程順序一致
        assert!(Zone::Z1 < Zone::Z2);
        assert!(Zone::Z4 < Zone::Z5);
    }

    #[test]
    fn test_next_zone() {
        assert_eq!(Zone::Z1.next(), Some(Zone::Z2));
        assert_eq!(Zone::Z5.next(), None);
    }

    #[test]
    fn test_parse_zone() {
        assert_eq!("Z3".parse::<Zone>().unwrap(), Zone::Z3);
        assert!("Z9".parse::<Zone>().is_err());
    }
}
