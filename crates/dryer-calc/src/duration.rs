//! 時間戳記與停留時間文字解析
//!
//! 追蹤表的時間欄位混雜多種手填格式。解析失敗一律回傳 `None`，
//! 由呼叫端決定略過或改用推算值，不中斷整批處理。

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// 支援的時間戳記格式（德式 dayfirst 與 ISO 並存）
const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d.%m.%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// 解析時間戳記文字；無法解析時回傳 None
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    // 只有日期的欄位視為當日零時
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// 解析自由文字停留時間（例如 "12:34"、"5 h 30 min"、"1,5 h"）
///
/// 依序嘗試：冒號格式（時:分[:秒]）、數字+單位格式、Excel 時間格式
/// （1900 紀元的日期時間）。全部失敗時回傳 None。
pub fn parse_duration_text(raw: &str) -> Option<Duration> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }

    // 小數逗號正規化
    let s = s.replace(',', ".");

    if let Some(d) = parse_colon_form(&s) {
        return Some(d);
    }
    if let Some(d) = parse_unit_form(&s) {
        return Some(d);
    }
    parse_excel_time_form(&s)
}

/// 時段長度（小時）
pub fn duration_hours(d: Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0
}

/// "12:34" 或 "12:34:56" → 12h34m(56s)
fn parse_colon_form(s: &str) -> Option<Duration> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }

    let hours: i64 = parts[0].trim().parse().ok()?;
    let minutes: i64 = parts[1].trim().parse().ok()?;
    let seconds: i64 = match parts.get(2) {
        Some(p) => p.trim().parse().ok()?,
        None => 0,
    };

    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }

    Some(Duration::seconds(hours * 3600 + minutes * 60 + seconds))
}

/// "5 h 30 min"、"1.5h" 之類的數字+單位形式
///
/// 每個數字都必須跟著可辨識的單位；裸數字（無單位）不接受。
fn parse_unit_form(s: &str) -> Option<Duration> {
    let mut total_seconds = 0.0_f64;
    let mut any = false;

    let mut pending: Option<f64> = None;
    for token in tokenize(s) {
        match token {
            Token::Number(n) => {
                if pending.is_some() {
                    return None; // 連續兩個裸數字
                }
                pending = Some(n);
            }
            Token::Word(w) => {
                let value = pending.take()?;
                let per_unit = unit_seconds(&w)?;
                total_seconds += value * per_unit;
                any = true;
            }
        }
    }

    if !any || pending.is_some() {
        return None;
    }
    Some(Duration::seconds(total_seconds.round() as i64))
}

/// Excel 時間格式：儲存格實際是 1900 紀元的日期時間
///
/// 僅接受 0 到 7 天之間的結果；超出視為日期誤植而非停留時間。
fn parse_excel_time_form(s: &str) -> Option<Duration> {
    let dt = parse_timestamp(s)?;
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let td = dt - epoch;
    if td > Duration::zero() && td <= Duration::days(7) {
        Some(td)
    } else {
        None
    }
}

enum Token {
    Number(f64),
    Word(String),
}

fn tokenize(s: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_number = false;

    let flush = |buf: &mut String, in_number: bool, tokens: &mut Vec<Token>| {
        if buf.is_empty() {
            return;
        }
        if in_number {
            if let Ok(n) = buf.parse::<f64>() {
                tokens.push(Token::Number(n));
            }
        } else {
            tokens.push(Token::Word(buf.to_lowercase()));
        }
        buf.clear();
    };

    for c in s.chars() {
        if c.is_ascii_digit() || c == '.' {
            if !buf.is_empty() && !in_number {
                flush(&mut buf, in_number, &mut tokens);
            }
            in_number = true;
            buf.push(c);
        } else if c.is_alphabetic() {
            if !buf.is_empty() && in_number {
                flush(&mut buf, in_number, &mut tokens);
            }
            in_number = false;
            buf.push(c);
        } else {
            flush(&mut buf, in_number, &mut tokens);
        }
    }
    flush(&mut buf, in_number, &mut tokens);

    tokens
}

fn unit_seconds(unit: &str) -> Option<f64> {
    match unit {
        "h" | "hr" | "hrs" | "hour" | "hours" | "std" => Some(3600.0),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60.0),
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        _ => None,
    }
}
