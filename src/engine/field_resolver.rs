// ==========================================
// 车险经营分析引擎 - 字段解析
// ==========================================
// 职责: 按候选列名顺序取第一个有值的列
// 规则: 空串与纯空白串不算有值,继续查看下一个候选列
//       无任何候选列有值时结果为"缺失" (None),与空串区分
// ==========================================

use crate::config::FieldSpec;
use crate::domain::{CellValue, FieldSource};

/// 取第一个有值的候选列
pub fn resolve<'a, R>(record: &'a R, spec: &FieldSpec) -> Option<&'a CellValue>
where
    R: FieldSource + ?Sized,
{
    spec.candidates()
        .iter()
        .filter_map(|name| record.field(name))
        .find(|value| value.is_present())
}

/// 文本取值（已去除首尾空白，空白串视为缺失）
pub fn resolve_text<R>(record: &R, spec: &FieldSpec) -> Option<String>
where
    R: FieldSource + ?Sized,
{
    resolve(record, spec)
        .map(|value| value.to_text().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// 数值取值；缺失或无法解析时为 0
pub fn resolve_number<R>(record: &R, spec: &FieldSpec) -> f64
where
    R: FieldSource + ?Sized,
{
    resolve(record, spec).map_or(0.0, CellValue::to_number)
}

/// 周次取值；缺失或无法解析时为 0
///
/// 兼容 "第12周" 这类带修饰的写法，只取数字部分的整数值。
pub fn resolve_week<R>(record: &R, spec: &FieldSpec) -> u32
where
    R: FieldSource + ?Sized,
{
    resolve(record, spec).map_or(0, parse_week)
}

pub fn parse_week(value: &CellValue) -> u32 {
    match value {
        CellValue::Number(n) if n.is_finite() && *n >= 0.0 => n.trunc() as u32,
        CellValue::Text(text) => {
            let digits: String = strip_week_decoration(text)
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u32>().unwrap_or(0)
        }
        _ => 0,
    }
}

/// 去掉周次的"第"/"周"修饰
pub fn strip_week_decoration(text: &str) -> String {
    text.replace(['第', '周'], "").trim().to_string()
}
