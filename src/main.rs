// ==========================================
// 供应链碳足迹情景模拟引擎 - CLI 主入口
// ==========================================
// 依据: Carbon_Master_Spec_v0.2.md
// 技术栈: Rust + serde_json
// 系统定位: 决策支持系统
// ==========================================
// 用法:
//   carbon-scenario-engine <dataset.json> [overrides.json]
//
// 示例:
//   carbon-scenario-engine data/baseline_2025h2.json
//   carbon-scenario-engine data/baseline_2025h2.json scenario.json
// ==========================================

use carbon_scenario_engine::engine::{DatasetNormalizer, DiffReporter, OverrideSet, ScenarioEngine};
use carbon_scenario_engine::importer::DatasetLoader;
use carbon_scenario_engine::perf::PerfGuard;
use carbon_scenario_engine::{logging, APP_NAME, VERSION};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    // 解析命令行参数
    let mut args = std::env::args().skip(1);
    let dataset_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("用法: carbon-scenario-engine <dataset.json> [overrides.json]"))?;
    let overrides_path = args.next().map(PathBuf::from);

    // 装载数据集文件
    let loader = DatasetLoader::new();
    tracing::info!("装载数据集: {}", dataset_path.display());
    let raw_dataset = loader.load_file(&dataset_path)?;

    // 装载覆盖文件(缺省为空覆盖 = 基线口径)
    let overrides = match &overrides_path {
        Some(path) => {
            tracing::info!("装载覆盖集合: {}", path.display());
            OverrideSet::from_json_value(&loader.load_file(path)?)?
        }
        None => OverrideSet::empty(),
    };

    // 归一化
    let dataset = {
        let _perf = PerfGuard::new("normalize");
        DatasetNormalizer::new().normalize(&raw_dataset)?
    };
    tracing::info!(
        "数据集就绪: {} ({} 个阶段, {} 件)",
        dataset.product.name,
        dataset.stage_count(),
        dataset.product.total_units
    );

    // 重算
    let report = {
        let _perf = PerfGuard::new("recalculate");
        ScenarioEngine::new().recalculate(&dataset, &overrides)?
    };
    tracing::info!("{}", DiffReporter::new().generate_readable_description(&report));

    // 输出报告
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
