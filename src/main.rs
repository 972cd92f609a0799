use std::sync::Arc;

use elearning_admin_core::core::config::{Config, LogFormat};
use elearning_admin_core::features::categories::services::taxonomy;
use elearning_admin_core::features::categories::{
    CategoryApiClient, CategoryService, CategoryTreeDto,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn async_main() -> anyhow::Result<()> {
    // Config loads .env, so RUST_LOG is available before the logger starts
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    init_tracing(config.app.log_format);

    tracing::info!("Configuration loaded successfully: {:?}", config.api);
    if !config.api.has_token() {
        tracing::warn!("ADMIN_TOKEN is not set; requests will be sent without credentials");
    }

    let client = Arc::new(CategoryApiClient::new(config.api.clone())?);
    tracing::info!("Category API client initialized for {}", client.base_url());

    let mut service = CategoryService::new(client);
    if !service.load().await {
        let message = service
            .store()
            .last_error()
            .map(|e| e.to_string())
            .unwrap_or_default();
        anyhow::bail!(message);
    }

    let categories = service.categories();
    let stats = taxonomy::category_stats(categories);
    tracing::info!(
        "Categories: total={}, main={}, sub={}, sub_sub={}",
        stats.total,
        stats.main,
        stats.sub,
        stats.sub_sub
    );

    let tree =
        CategoryTreeDto::build_tree(categories, config.view.sort_by, config.view.sort_order);
    for node in tree {
        node.walk(&mut Vec::new(), &mut |node, _ancestors| {
            tracing::info!(
                "[{}] {} ({} children{})",
                node.level,
                taxonomy::path_label(categories, Some(node.id.as_str())),
                node.child_count,
                if node.is_active { "" } else { ", inactive" }
            );
        });
    }

    let orphans: Vec<_> = categories
        .iter()
        .filter(|c| {
            c.parent_id()
                .is_some_and(|id| taxonomy::find_category(categories, id).is_none())
        })
        .collect();
    for orphan in orphans {
        tracing::warn!(
            "Category '{}' ({}) points at missing parent '{}'",
            orphan.name,
            orphan.id,
            orphan.parent_id().unwrap_or_default()
        );
    }

    Ok(())
}
