// ==========================================
// 请求分发端到端测试
// ==========================================
// 测试目标: JSON 信封 → Dispatcher → JSON 响应
// 覆盖: 状态机、init 载荷、load_file、筛选、维度可选值、错误响应
// ==========================================


use insurance_kpi_engine::api::{RequestEnvelope, ResponseEnvelope};
use insurance_kpi_engine::app::{Dispatcher, SessionState};
use insurance_kpi_engine::config::{ConfigLoader, EngineConfig};
use insurance_kpi_engine::logging;
use serde_json::{json, Value};
use test_helpers::{create_config_dir, create_csv_file, BUSINESS_MAPPING_JSON, YEAR_PLANS_JSON};

fn send(dispatcher: &mut Dispatcher, request: Value) -> Value {
    let envelope: RequestEnvelope = serde_json::from_value(request).unwrap();
    let response: ResponseEnvelope = dispatcher.handle(envelope);
    serde_json::to_value(&response).unwrap()
}

fn rows() -> Value {
    json!([
        {"三级机构": "天府", "保单年度": "2025", "周次": 48, "业务类型分类": "家自车",
         "签单保费": 1000, "满期保费": 800, "已报告赔款": 400, "费用额": 120},
        {"三级机构": "高新", "保单年度": "2025", "周次": 49, "业务类型分类": "营业货车",
         "签单保费": 2000, "满期保费": 1800, "已报告赔款": 180, "费用额": 200},
        {"三级机构": "宜宾", "保单年度": "2024", "周次": 49, "业务类型分类": "摩托车",
         "签单保费": 500, "满期保费": 500, "已报告赔款": 50, "费用额": 40}
    ])
}

fn init_payload() -> Value {
    json!({
        "businessMapping": serde_json::from_str::<Value>(BUSINESS_MAPPING_JSON).unwrap(),
        "yearPlans": serde_json::from_str::<Value>(YEAR_PLANS_JSON).unwrap(),
    })
}

#[test]
fn test_完整请求流程() {
    logging::init_test();
    let mut dispatcher = Dispatcher::new();

    // 未初始化
    let response = send(&mut dispatcher, json!({"id": 1, "type": "process"}));
    assert_eq!(response["id"], 1);
    assert_eq!(response["type"], "error");
    assert_eq!(response["payload"]["kind"], "invalid_state");

    let response = send(&mut dispatcher, json!({"id": 2, "type": "init", "payload": init_payload()}));
    assert_eq!(response["type"], "ack");
    assert_eq!(dispatcher.state(), SessionState::Configured);

    // 已配置但无数据集
    let response = send(&mut dispatcher, json!({"id": 3, "type": "filter", "payload": {}}));
    assert_eq!(response["payload"]["kind"], "invalid_state");

    let response = send(&mut dispatcher, json!({"id": 4, "type": "load_dataset", "payload": rows()}));
    assert_eq!(response["type"], "loaded");
    assert_eq!(response["payload"]["rowCount"], 3);
    assert_eq!(dispatcher.state(), SessionState::Ready);

    let response = send(&mut dispatcher, json!({"id": 5, "type": "process"}));
    assert_eq!(response["id"], 5);
    assert_eq!(response["type"], "report");
    let report = &response["payload"];
    assert_eq!(report["recordCount"], 3);
    assert_eq!(report["summary"]["sums"]["premium"], 3500.0);
    assert_eq!(report["groupsByOrg"][0]["dimensionValue"], "高新");
    assert_eq!(report["groupsByBusinessType"][1]["dimensionValue"], "私家车");
    assert_eq!(report["dynamicInfo"]["analysisMode"], "multi");
    // 高新计划 2500 达成 80,天府计划 2000 达成 50
    assert_eq!(report["problems"], json!(["高新(保费未达标)", "天府(保费未达标)"]));

    let response = send(
        &mut dispatcher,
        json!({"id": 6, "type": "filter", "payload": {
            "time": {"year": "2025", "weekStart": 1, "weekEnd": 52},
            "drill": [{"dimension": "business_label", "values": ["私家车", "营业货车"]}]
        }}),
    );
    assert_eq!(response["payload"]["recordCount"], 2);

    let response = send(
        &mut dispatcher,
        json!({"id": 7, "type": "get_dimension_values", "payload": {
            "dimension": "third_level_organization",
            "currentFilters": {"time": {"weekStart": 49, "weekEnd": 49},
                               "drill": [{"dimension": "third_level_organization", "values": ["高新"]}]}
        }}),
    );
    assert_eq!(response["type"], "dimension_values");
    // 下钻条件不参与可选值计算
    assert_eq!(response["payload"]["values"].as_array().unwrap().len(), 2);

    let response = send(&mut dispatcher, json!({"id": 8, "type": "clear"}));
    assert_eq!(response["type"], "ack");
    assert_eq!(dispatcher.state(), SessionState::Configured);
}

#[test]
fn test_周次区间倒置返回筛选错误() {
    let mut dispatcher = Dispatcher::with_config(EngineConfig::with_defaults().unwrap());
    send(&mut dispatcher, json!({"id": 1, "type": "load_dataset", "payload": rows()}));

    let response = send(
        &mut dispatcher,
        json!({"id": 2, "type": "filter", "payload": {"time": {"weekStart": 10, "weekEnd": 2}}}),
    );
    assert_eq!(response["payload"]["kind"], "invalid_filter");
    assert!(!response["payload"]["message"].as_str().unwrap().is_empty());
    assert_eq!(dispatcher.state(), SessionState::Ready);
}

#[test]
fn test_从配置目录与csv文件加载() {
    logging::init_test();
    let dir = create_config_dir(None).unwrap();
    let config = EngineConfig::from_init(ConfigLoader::load_dir(dir.path()).unwrap()).unwrap();
    let mut dispatcher = Dispatcher::with_config(config);

    let file = create_csv_file(&[
        "三级机构,周次,业务类型分类,签单保费,满期保费,已报告赔款,费用额",
        "天府,49,家自车,1000,800,400,120",
    ])
    .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let response = send(&mut dispatcher, json!({"id": 1, "type": "load_file", "payload": {"path": path}}));
    assert_eq!(response["type"], "loaded");
    assert_eq!(response["payload"]["source"], path.as_str());

    let response = send(&mut dispatcher, json!({"id": 2, "type": "process"}));
    let report = &response["payload"];
    assert_eq!(report["dynamicInfo"]["analysisMode"], "single");
    assert_eq!(report["dynamicInfo"]["company"], "天府");
    assert_eq!(report["groupsByBusinessType"][0]["dimensionValue"], "私家车");
    // 天府计划 2000,保费 1000
    assert_eq!(report["groupsByOrg"][0]["kpis"]["achievementRate"], 50.0);
}

#[test]
fn test_重新装载替换数据集() {
    let mut dispatcher = Dispatcher::with_config(EngineConfig::with_defaults().unwrap());
    let first = send(&mut dispatcher, json!({"id": 1, "type": "load_dataset", "payload": rows()}));
    let second = send(
        &mut dispatcher,
        json!({"id": 2, "type": "parse", "payload": [{"三级机构": "天府", "签单保费": 10}]}),
    );

    assert_ne!(first["payload"]["datasetId"], second["payload"]["datasetId"]);
    let response = send(&mut dispatcher, json!({"id": 3, "type": "process"}));
    assert_eq!(response["payload"]["recordCount"], 1);
}
