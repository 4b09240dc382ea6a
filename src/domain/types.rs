// ==========================================
// 出店计划测算引擎 - 领域类型定义
// ==========================================
// 职责: 营业曜日、营业时段等基础类型
// 存储格式: 曜日使用小写英文标识 (monday..sunday)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 曜日 (Weekday)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// 一周七天（固定顺序）
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// 存储标识
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            "saturday" => Ok(Weekday::Saturday),
            "sunday" => Ok(Weekday::Sunday),
            other => Err(format!("未知曜日标识: {}", other)),
        }
    }
}

// ==========================================
// 营业曜日集合 (WeekdaySet)
// ==========================================
// 位集合, 重复曜日只计一次
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet {
    bits: u8,
}

impl WeekdaySet {
    /// 空集合（该时段不营业）
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// 每天营业
    pub fn every_day() -> Self {
        Weekday::ALL.iter().copied().collect()
    }

    /// 从存储的字符串列表解析
    ///
    /// 无法识别的标识会被丢弃并记录警告
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        let mut set = Self::empty();
        for id in ids {
            match id.as_ref().parse::<Weekday>() {
                Ok(day) => set.insert(day),
                Err(reason) => {
                    tracing::warn!(raw_value = id.as_ref(), %reason, "营业曜日标识无效，已忽略");
                }
            }
        }
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.bits |= day.bit();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.bits & day.bit() != 0
    }

    /// 营业曜日数
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// 是否七天全营业
    pub fn is_every_day(&self) -> bool {
        self.len() == Weekday::ALL.len()
    }

    /// 按周一到周日的顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(move |d| self.contains(*d))
    }

    /// 转换为存储用的字符串列表
    pub fn to_ids(&self) -> Vec<String> {
        self.iter().map(|d| d.as_str().to_string()).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

// ==========================================
// 营业时段 (Slot Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotKind {
    Lunch,  // 午市
    Dinner, // 晚市
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Lunch => write!(f, "LUNCH"),
            SlotKind::Dinner => write!(f, "DINNER"),
        }
    }
}
