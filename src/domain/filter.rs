// ==========================================
// 车险经营分析引擎 - 筛选状态
// ==========================================
// 职责: 时间筛选 + 下钻条件的请求级状态
// 说明: 每次请求携带,引擎不保存
// ==========================================

use crate::domain::record::CellValue;
use serde::{Deserialize, Deserializer, Serialize};

/// 时间筛选
///
/// `year` 按字符串精确匹配；周次区间为闭区间，缺省为不设限。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFilter {
    #[serde(default, deserialize_with = "optional_text")]
    pub year: Option<String>,
    #[serde(default)]
    pub week_start: u32,
    #[serde(default = "unbounded_week")]
    pub week_end: u32,
}

impl TimeFilter {
    pub fn weeks(week_start: u32, week_end: u32) -> Self {
        Self {
            year: None,
            week_start,
            week_end,
        }
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    /// 周次区间是否合法 (weekStart ≤ weekEnd)
    pub fn is_valid(&self) -> bool {
        self.week_start <= self.week_end
    }
}

impl Default for TimeFilter {
    fn default() -> Self {
        Self::weeks(0, unbounded_week())
    }
}

fn unbounded_week() -> u32 {
    u32::MAX
}

/// 下钻条件：同一维度内取值为"或"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillCondition {
    pub dimension: String,
    #[serde(default, deserialize_with = "text_list")]
    pub values: Vec<String>,
}

impl DrillCondition {
    pub fn new(dimension: &str, values: &[&str]) -> Self {
        Self {
            dimension: dimension.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// 筛选状态：时间条件 + 多个下钻条件（条件之间为"与"）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub time: Option<TimeFilter>,
    #[serde(default)]
    pub drill: Vec<DrillCondition>,
}

impl FilterState {
    pub fn with_time(mut self, time: TimeFilter) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_drill(mut self, condition: DrillCondition) -> Self {
        self.drill.push(condition);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.time.as_ref().map_or(true, TimeFilter::is_valid)
    }
}

// 年度、下钻取值在前端可能是数字也可能是字符串，统一转为文本
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<CellValue>::deserialize(deserializer)?;
    Ok(value.filter(CellValue::is_present).map(|v| v.to_text()))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<CellValue>::deserialize(deserializer)?;
    Ok(values.iter().map(CellValue::to_text).collect())
}
