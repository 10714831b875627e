//! Product command handlers.

use std::sync::Arc;

use tabled::Tabled;
use tracing::debug;

use shopview_core::{Catalogue, CatalogueConfig, CatalogueView, LoadOutcome, Presentation, Product};

use crate::cli::{GlobalOpts, OutputFormat, ProductsArgs, ProductsCommand};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const TITLE_WIDTH: usize = 48;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&Arc<Product>> for ProductRow {
    fn from(p: &Arc<Product>) -> Self {
        Self {
            id: p.id.to_string(),
            title: output::truncate(&p.title, TITLE_WIDTH),
            price: output::format_price(p.price),
            category: p.category.clone().unwrap_or_default(),
            rating: p
                .rating
                .as_ref()
                .map(|r| format!("{:.1} ({})", r.rate, r.count))
                .unwrap_or_default(),
        }
    }
}

fn detail(p: &Arc<Product>, color: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Title:       {}", output::emphasis(&p.title, color)),
        format!("Price:       {}", output::price(p.price, color)),
        format!("Category:    {}", p.category.as_deref().unwrap_or("-")),
    ];
    if let Some(ref r) = p.rating {
        lines.push(format!("Rating:      {:.1} ({} reviews)", r.rate, r.count));
    }
    lines.push(format!(
        "Image:       {}",
        if p.image.is_empty() { "-" } else { p.image.as_str() }
    ));
    if let Some(ref d) = p.description {
        lines.push(String::new());
        lines.push(d.clone());
    }
    lines.join("\n")
}

// ── Loading ─────────────────────────────────────────────────────────

/// Run the catalogue's one load and fold the result into a fresh view.
async fn load_view(catalogue_config: &CatalogueConfig, quiet: bool) -> Result<CatalogueView, CliError> {
    debug!(
        endpoint = %catalogue_config.endpoint,
        timeout = %config::describe_timeout(catalogue_config),
        "loading catalogue"
    );
    let catalogue = Catalogue::from_config(catalogue_config)?;

    let spinner = output::spinner("Loading products...", quiet);
    let outcome = catalogue.load().await;
    spinner.finish_and_clear();

    match outcome {
        LoadOutcome::Loaded { count } => debug!(count, "catalogue ready"),
        LoadOutcome::Failed | LoadOutcome::AlreadyStarted | LoadOutcome::Abandoned => {
            return Err(CliError::LoadFailed {
                endpoint: catalogue_config.endpoint.to_string(),
            });
        }
    }

    let mut view = CatalogueView::new();
    view.on_state_changed(catalogue.state());
    Ok(view)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ProductsArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let catalogue_config = config::resolve_catalogue(global, cfg)?;
    let format = config::effective_output(global, cfg);
    let color = output::should_color(config::effective_color(global, cfg));

    match args.command {
        ProductsCommand::List { search } => {
            let mut view = load_view(&catalogue_config, global.quiet).await?;
            view.on_query_changed(search.unwrap_or_default());

            match view.presentation() {
                Presentation::Products(products) => {
                    let out = output::render_list(
                        format,
                        products,
                        |p| ProductRow::from(p),
                        |p| p.id.to_string(),
                    );
                    output::print_output(&out, global.quiet);
                }
                Presentation::NoResults => {
                    // Structured formats still get a valid empty document.
                    if matches!(
                        format,
                        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml
                    ) {
                        let out = output::render_list(
                            format,
                            view.projected(),
                            |p| ProductRow::from(p),
                            |p| p.id.to_string(),
                        );
                        output::print_output(&out, global.quiet);
                    }
                    output::print_status(&output::dim("No products found.", color), global.quiet);
                }
                Presentation::Loading | Presentation::Failed => {
                    return Err(CliError::LoadFailed {
                        endpoint: catalogue_config.endpoint.to_string(),
                    });
                }
            }
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let view = load_view(&catalogue_config, global.quiet).await?;
            let found = view
                .state()
                .products()
                .iter()
                .find(|p| p.id.to_string() == id);

            match found {
                Some(p) => {
                    let out = output::render_single(
                        format,
                        p,
                        |p| detail(p, color),
                        |p| p.id.to_string(),
                    );
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "product".into(),
                    identifier: id,
                    list_command: "products list".into(),
                }),
            }
        }
    }
}
