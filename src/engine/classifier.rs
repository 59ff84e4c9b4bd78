// ==========================================
// 车险经营分析引擎 - 业务类型归类
// ==========================================
// 职责: 为每条记录派生 business_label / business_category
// 说明: 不修改原始记录,派生字段以覆盖视图的形式挂在记录上
//       重复归类结果一致,归类必须先于任何按业务类型分组的聚合
// ==========================================

use crate::config::{BusinessClass, BusinessMappingTable, FieldSpec};
use crate::domain::{CellValue, FieldSource, Record};
use crate::engine::field_resolver;

/// 派生字段: 业务类型简称
pub const BUSINESS_LABEL_FIELD: &str = "business_label";
/// 派生字段: 业务大类
pub const BUSINESS_CATEGORY_FIELD: &str = "business_category";

// ==========================================
// ClassifiedRecord - 原始记录 + 派生字段
// ==========================================
#[derive(Debug, Clone)]
pub struct ClassifiedRecord<'a> {
    record: &'a Record,
    label: CellValue,
    category: CellValue,
}

impl<'a> ClassifiedRecord<'a> {
    pub fn record(&self) -> &'a Record {
        self.record
    }

    pub fn business_label(&self) -> String {
        self.label.to_text()
    }

    pub fn business_category(&self) -> String {
        self.category.to_text()
    }
}

impl FieldSource for ClassifiedRecord<'_> {
    fn field(&self, name: &str) -> Option<&CellValue> {
        match name {
            BUSINESS_LABEL_FIELD => Some(&self.label),
            BUSINESS_CATEGORY_FIELD => Some(&self.category),
            _ => self.record.field(name),
        }
    }
}

// ==========================================
// BusinessClassifier
// ==========================================
pub struct BusinessClassifier<'c> {
    table: &'c BusinessMappingTable,
    business_type_field: &'c FieldSpec,
}

impl<'c> BusinessClassifier<'c> {
    pub fn new(table: &'c BusinessMappingTable, business_type_field: &'c FieldSpec) -> Self {
        Self {
            table,
            business_type_field,
        }
    }

    /// 归类单条记录，从不失败
    pub fn classify<R: FieldSource + ?Sized>(&self, record: &R) -> BusinessClass {
        let raw = field_resolver::resolve_text(record, self.business_type_field);
        self.table.classify(raw.as_deref())
    }

    /// 为整个数据集生成派生视图（与原始记录一一对应、顺序一致）
    pub fn classify_all<'a>(&self, records: &'a [Record]) -> Vec<ClassifiedRecord<'a>> {
        let classified: Vec<ClassifiedRecord<'a>> = records
            .iter()
            .map(|record| {
                let class = self.classify(record);
                ClassifiedRecord {
                    record,
                    label: CellValue::Text(class.label),
                    category: CellValue::Text(class.category),
                }
            })
            .collect();

        tracing::debug!("业务类型归类完成: {} 行", classified.len());
        classified
    }
}
