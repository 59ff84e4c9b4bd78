// ==========================================
// 车险经营分析引擎 - 维度取值排序
// ==========================================
// 规则: 中文排序规则 (zh,拼音序),数字段按数值比较 ("2" < "10")
//       排序规则判定相等时按原始字节序兜底,保证全序且稳定
// 说明: 排序规则数据随 icu_collator 编译内置,不读外部文件
// ==========================================

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use icu_locale_core::locale;
use std::cmp::Ordering;

/// 维度取值比较器
pub struct LabelCollator {
    collator: Option<CollatorBorrowed<'static>>,
}

impl LabelCollator {
    /// zh 排序规则,开启数字排序 (-u-kn)
    pub fn new() -> Self {
        let collator = match Collator::try_new(locale!("zh-u-kn").into(), CollatorOptions::default()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!("中文排序规则加载失败,按字节序排序: {}", e);
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let ord = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => Ordering::Equal,
        };
        ord.then_with(|| a.cmp(b))
    }
}

impl Default for LabelCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// 单次比较（批量排序请用 sort_labels）
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    LabelCollator::new().compare(a, b)
}

/// 升序排序并去重
pub fn sort_labels(values: &mut Vec<String>) {
    let collator = LabelCollator::new();
    values.sort_by(|a, b| collator.compare(a, b));
    values.dedup();
}
