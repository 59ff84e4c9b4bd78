// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use insurance_kpi_engine::domain::Record;

// ==========================================
// 明细记录构建器
// ==========================================

pub struct RecordBuilder {
    organization: Option<String>,
    customer_category: Option<String>,
    business_type: Option<String>,
    year: Option<String>,
    week: Option<f64>,
    premium: f64,
    matured_premium: f64,
    claim: f64,
    expense: f64,
    policy_count: f64,
    claim_count: f64,
}

impl RecordBuilder {
    pub fn new(organization: &str) -> Self {
        Self {
            organization: Some(organization.to_string()),
            customer_category: None,
            business_type: None,
            year: None,
            week: None,
            premium: 0.0,
            matured_premium: 0.0,
            claim: 0.0,
            expense: 0.0,
            policy_count: 0.0,
            claim_count: 0.0,
        }
    }

    /// 无机构字段的记录
    pub fn without_organization() -> Self {
        let mut builder = Self::new("");
        builder.organization = None;
        builder
    }

    pub fn customer(mut self, category: &str) -> Self {
        self.customer_category = Some(category.to_string());
        self
    }

    pub fn business(mut self, business_type: &str) -> Self {
        self.business_type = Some(business_type.to_string());
        self
    }

    pub fn year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    pub fn week(mut self, week: u32) -> Self {
        self.week = Some(week as f64);
        self
    }

    pub fn premium(mut self, premium: f64, matured: f64) -> Self {
        self.premium = premium;
        self.matured_premium = matured;
        self
    }

    pub fn claim(mut self, claim: f64) -> Self {
        self.claim = claim;
        self
    }

    pub fn expense(mut self, expense: f64) -> Self {
        self.expense = expense;
        self
    }

    pub fn counts(mut self, policies: f64, claims: f64) -> Self {
        self.policy_count = policies;
        self.claim_count = claims;
        self
    }

    /// 使用英文列名
    pub fn build(self) -> Record {
        self.build_with(&ENGLISH_COLUMNS)
    }

    /// 使用中文列名
    pub fn build_chinese(self) -> Record {
        self.build_with(&CHINESE_COLUMNS)
    }

    fn build_with(self, columns: &Columns) -> Record {
        let mut record = Record::new()
            .with(columns.premium, self.premium)
            .with(columns.matured_premium, self.matured_premium)
            .with(columns.claim, self.claim)
            .with(columns.expense, self.expense)
            .with(columns.policy_count, self.policy_count)
            .with(columns.claim_count, self.claim_count);

        if let Some(org) = self.organization {
            record.insert(columns.organization, org);
        }
        if let Some(category) = self.customer_category {
            record.insert(columns.customer_category, category);
        }
        if let Some(business) = self.business_type {
            record.insert(columns.business_type, business);
        }
        if let Some(year) = self.year {
            record.insert(columns.year, year);
        }
        if let Some(week) = self.week {
            record.insert(columns.week, week);
        }
        record
    }
}

struct Columns {
    premium: &'static str,
    matured_premium: &'static str,
    claim: &'static str,
    expense: &'static str,
    policy_count: &'static str,
    claim_count: &'static str,
    organization: &'static str,
    customer_category: &'static str,
    business_type: &'static str,
    year: &'static str,
    week: &'static str,
}

const ENGLISH_COLUMNS: Columns = Columns {
    premium: "signed_premium_yuan",
    matured_premium: "matured_premium_yuan",
    claim: "reported_claim_payment_yuan",
    expense: "expense_amount_yuan",
    policy_count: "policy_count",
    claim_count: "claim_case_count",
    organization: "third_level_organization",
    customer_category: "customer_category_3",
    business_type: "business_type_category",
    year: "policy_start_year",
    week: "week_number",
};

const CHINESE_COLUMNS: Columns = Columns {
    premium: "签单保费",
    matured_premium: "满期保费",
    claim: "已报告赔款",
    expense: "费用额",
    policy_count: "保单件数",
    claim_count: "赔案件数",
    organization: "三级机构",
    customer_category: "客户类别",
    business_type: "业务类型分类",
    year: "保单年度",
    week: "周次",
};

// ==========================================
// 标准数据集
// ==========================================

/// 三个机构、两个周次、三种业务类型
pub fn sample_dataset() -> Vec<Record> {
    vec![
        RecordBuilder::new("天府")
            .customer("非营业个人客车")
            .business("非营业个人客车")
            .year("2025")
            .week(48)
            .premium(1000.0, 800.0)
            .claim(400.0)
            .expense(120.0)
            .counts(100.0, 8.0)
            .build(),
        RecordBuilder::new("高新")
            .customer("营业货车")
            .business("营业货车")
            .year("2025")
            .week(49)
            .premium(3000.0, 2500.0)
            .claim(2300.0)
            .expense(300.0)
            .counts(50.0, 20.0)
            .build(),
        RecordBuilder::new("天府")
            .customer("非营业个人客车")
            .business("家自车")
            .year("2025")
            .week(49)
            .premium(500.0, 400.0)
            .claim(100.0)
            .expense(50.0)
            .counts(40.0, 2.0)
            .build(),
        RecordBuilder::new("宜宾")
            .customer("摩托车")
            .business("摩托车")
            .year("2024")
            .week(49)
            .premium(200.0, 200.0)
            .claim(20.0)
            .expense(60.0)
            .counts(30.0, 1.0)
            .build(),
    ]
}
