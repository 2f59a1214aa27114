// ==========================================
// DatasetLoader 集成测试
// ==========================================
// 依据: Dataset_Schema_Spec_v0.2.md - 3. 文件口径
// 职责: 验证文件装载的错误分类与装载后端到端重算
// ==========================================


use carbon_scenario_engine::engine::{DatasetNormalizer, OverrideSet, ScenarioEngine};
use carbon_scenario_engine::importer::{DatasetLoader, LoadError};
use carbon_scenario_engine::logging;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use test_helpers::{full_dataset, overrides_json};

// ==========================================
// 测试辅助函数
// ==========================================

/// 把 JSON 文档写入带 .json 后缀的临时文件
fn write_json_file(value: &serde_json::Value) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("创建临时文件失败");
    write!(file, "{}", serde_json::to_string_pretty(value).unwrap()).expect("写入临时文件失败");
    file.flush().expect("刷新临时文件失败");
    file
}

// ==========================================
// 测试1: 装载合法文件并端到端重算
// ==========================================
#[test]
fn test_load_and_recalculate_end_to_end() {
    // 初始化日志系统
    logging::init_test();

    let loader = DatasetLoader::new();
    let dataset_file = write_json_file(&full_dataset());
    let overrides_file = write_json_file(&overrides_json(&[
        ("manufacturing.renewable_share", json!(0.5)),
    ]));

    let raw_dataset = loader.load_file(dataset_file.path()).unwrap();
    let raw_overrides = loader.load_file(overrides_file.path()).unwrap();

    let dataset = DatasetNormalizer::new().normalize(&raw_dataset).unwrap();
    let overrides = OverrideSet::from_json_value(&raw_overrides).unwrap();
    let report = ScenarioEngine::new().recalculate(&dataset, &overrides).unwrap();

    // 制造 500 → 250,总量 2400 → 2150
    assert_eq!(report.baseline_total_kg, 2400.0);
    assert_eq!(report.simulated_total_kg, 2150.0);
    assert_eq!(report.delta_kg, -250.0);
}

// ==========================================
// 测试2: 文件缺失
// ==========================================
#[test]
fn test_load_missing_file() {
    logging::init_test();

    let loader = DatasetLoader::new();
    let result = loader.load_file(Path::new("/nonexistent/dataset.json"));

    match result {
        Err(LoadError::FileNotFound(path)) => {
            assert!(path.contains("dataset.json"));
        }
        other => panic!("应返回文件不存在, 实际: {:?}", other),
    }
}

// ==========================================
// 测试3: 扩展名不支持
// ==========================================
#[test]
fn test_load_unsupported_extension() {
    logging::init_test();

    let loader = DatasetLoader::new();
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时文件失败");
    writeln!(file, "stage,value").expect("写入临时文件失败");

    let result = loader.load_file(file.path());
    match result {
        Err(LoadError::UnsupportedFormat(_)) => {}
        other => panic!("应返回不支持的文件格式, 实际: {:?}", other),
    }

    // 大小写不敏感: .JSON 同样可装载
    let mut upper = tempfile::Builder::new()
        .suffix(".JSON")
        .tempfile()
        .expect("创建临时文件失败");
    write!(upper, "{{}}").expect("写入临时文件失败");
    upper.flush().expect("刷新临时文件失败");
    assert!(loader.load_file(upper.path()).is_ok());
}

// ==========================================
// 测试4: JSON 解析失败
// ==========================================
#[test]
fn test_load_malformed_json() {
    logging::init_test();

    let loader = DatasetLoader::new();
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("创建临时文件失败");
    write!(file, "{{ \"stages\": ").expect("写入临时文件失败");
    file.flush().expect("刷新临时文件失败");

    let result = loader.load_file(file.path());
    match result {
        Err(LoadError::JsonParseError { path, message }) => {
            assert!(path.ends_with(".json"));
            assert!(!message.is_empty());
        }
        other => panic!("应返回 JSON 解析失败, 实际: {:?}", other),
    }
}
