// ==========================================
// 车险经营分析引擎 - 明细记录模型
// ==========================================
// 职责: 定义单元格取值、明细记录与字段读取接口
// 说明: 记录由外部解析器产出,引擎只读不改
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// CellValue - 单元格原始取值
// ==========================================
// 序列化格式: 原样 JSON 标量 (字符串/数字/布尔/null)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    #[default]
    Empty,
}

impl CellValue {
    /// 是否为"有值"（null、空串与纯空白串视为无值）
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Text(s) => !s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Bool(_) => true,
        }
    }

    /// 数值强转
    ///
    /// 解析失败、null、空串、布尔值一律为 0，从不报错。
    pub fn to_number(&self) -> f64 {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            CellValue::Bool(_) | CellValue::Empty => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// 文本形式（整数值的浮点数不带小数部分，与表格里看到的一致）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ==========================================
// FieldSource - 按物理列名取值
// ==========================================
pub trait FieldSource {
    /// 读取物理列的原始值；列不存在时返回 None
    fn field(&self, name: &str) -> Option<&CellValue>;
}

// ==========================================
// Record - 一行明细
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式写入字段（测试与导入器使用）
    pub fn with(mut self, name: &str, value: impl Into<CellValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<CellValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 所有字段均无值
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| !v.is_present())
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl FieldSource for Record {
    fn field(&self, name: &str) -> Option<&CellValue> {
        self.fields.get(name)
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<&CellValue> {
        (**self).field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_number_coercion() {
        assert_eq!(CellValue::from("1200.5").to_number(), 1200.5);
        assert_eq!(CellValue::from(" 80 ").to_number(), 80.0);
        assert_eq!(CellValue::from("abc").to_number(), 0.0);
        assert_eq!(CellValue::from("").to_number(), 0.0);
        assert_eq!(CellValue::Empty.to_number(), 0.0);
        assert_eq!(CellValue::Number(f64::NAN).to_number(), 0.0);
        assert_eq!(CellValue::Bool(true).to_number(), 0.0);
        assert_eq!(CellValue::Bool(false).to_number(), 0.0);
    }

    #[test]
    fn test_whitespace_text_is_not_present() {
        assert!(!CellValue::from("   ").is_present());
        assert!(!CellValue::from("\t").is_present());
        assert!(CellValue::from(" 天府 ").is_present());
        assert!(CellValue::Bool(false).is_present());
    }

    #[test]
    fn test_cell_value_text_of_integral_number() {
        assert_eq!(CellValue::Number(2025.0).to_text(), "2025");
        assert_eq!(CellValue::Number(12.5).to_text(), "12.5");
    }

    #[test]
    fn test_record_deserialize_mixed_scalars() {
        let record: Record = serde_json::from_str(
            r#"{"三级机构": "天府", "签单保费": 1000, "周次": null, "备注": ""}"#,
        )
        .unwrap();

        assert_eq!(record.field("三级机构"), Some(&CellValue::from("天府")));
        assert_eq!(record.field("签单保费"), Some(&CellValue::Number(1000.0)));
        assert_eq!(record.field("周次"), Some(&CellValue::Empty));
        assert!(!record.field("备注").unwrap().is_present());
    }
}
