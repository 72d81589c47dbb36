use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use roster_application::EntityCollectionController;
use roster_application::dto::Dto;
use roster_application::presets::{sales_orders, users};
use roster_domain::entity::Entity;
use roster_domain::schema::EntitySchema;
use roster_domain::source::StaticSource;
use roster_domain::specification::CategoryFilter;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    SalesOrders,
    RemoteUsers,
    ManualUsers,
}

#[derive(Parser, Debug)]
#[command(about = "Load a collection, apply edits and print it as cards")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Preset::SalesOrders)]
    preset: Preset,
    /// 远程用户接口地址（remote-users）
    #[arg(long, default_value = users::USERS_URL)]
    users_url: String,
    /// 自定义结构配置（JSON），与 --seed 一起使用时忽略 --preset
    #[arg(long, requires = "seed")]
    schema: Option<PathBuf>,
    /// 自定义种子数据（JSON 数组）
    #[arg(long, requires = "schema")]
    seed: Option<PathBuf>,
    /// 分类筛选，"All" 表示不过滤
    #[arg(long, default_value = "All")]
    filter: String,
    /// 新建一条记录，字段以 key=value 形式给出
    #[arg(long = "create", value_name = "KEY=VALUE")]
    create: Vec<String>,
    /// 编辑指定标识的记录，字段取自 --set
    #[arg(long)]
    edit: Option<String>,
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
    /// 删除指定标识的记录
    #[arg(long)]
    remove: Vec<String>,
    /// 以 JSON 快照输出而非卡片
    #[arg(long)]
    json: bool,
}

fn parse_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|p| {
            p.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| anyhow!("expected KEY=VALUE, got `{p}`"))
        })
        .collect()
}

async fn build(cli: &Cli) -> Result<EntityCollectionController> {
    if let (Some(schema), Some(seed)) = (&cli.schema, &cli.seed) {
        let schema = tokio::fs::read_to_string(schema)
            .await
            .with_context(|| format!("reading {}", schema.display()))?;
        let seed = tokio::fs::read_to_string(seed)
            .await
            .with_context(|| format!("reading {}", seed.display()))?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&seed)?;
        return Ok(EntityCollectionController::builder()
            .schema(EntitySchema::from_json(&schema)?)
            .source(Arc::new(StaticSource::new(records)))
            .build());
    }

    Ok(match cli.preset {
        Preset::SalesOrders => sales_orders::controller()?,
        Preset::RemoteUsers => users::remote(cli.users_url.clone())?,
        Preset::ManualUsers => users::manual(users::staff_seed())?,
    })
}

fn print_card(controller: &EntityCollectionController, entity: &Entity) {
    let schema = controller.schema();
    println!("┌ {}", entity.id());
    for spec in schema.value_fields() {
        println!(
            "│ {:<16} {}",
            spec.label(),
            entity.input_value(schema, spec.name())
        );
    }
    println!("└");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut controller = build(&cli).await?.start().await;
    if let Some(message) = controller.error_message() {
        eprintln!("{message}");
    }

    if !cli.create.is_empty() {
        controller.stage_draft(parse_pairs(&cli.create)?);
        match controller.commit() {
            Ok(outcome) => info!(id = %outcome.id(), "created"),
            Err(_) => eprintln!("{}", controller.error_message().unwrap_or_default()),
        }
    }

    if let Some(id) = &cli.edit {
        controller.begin_edit(id.as_str())?;
        controller.stage_draft(parse_pairs(&cli.set)?);
        match controller.commit() {
            Ok(outcome) => info!(id = %outcome.id(), "updated"),
            Err(_) => eprintln!("{}", controller.error_message().unwrap_or_default()),
        }
    }

    for id in &cli.remove {
        controller.remove(id.as_str());
    }

    if cli.json {
        let snapshot = controller.snapshot().to_json()?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let filter = CategoryFilter::from(cli.filter.as_str());
    println!(
        "{} · filter: {} · options: {}",
        controller.schema().entity(),
        filter,
        controller.filter_options().join(" | ")
    );
    for entity in controller.filtered_view(&filter) {
        print_card(&controller, entity);
    }
    Ok(())
}
