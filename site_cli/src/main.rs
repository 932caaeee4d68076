mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use site_lib::Settings;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "insurance-site")]
#[command(about = "Browse and serve the insurance article site's content")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Upstream content API base URL (overrides NEXT_PUBLIC_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles the way the /articles page shows them
    Articles(commands::articles::ArticlesArgs),
    /// Show a single article
    Article(commands::article::ArticleArgs),
    /// List article categories
    Categories(commands::categories::CategoriesArgs),
    /// Live search suggestions for partial input
    Suggest(commands::suggest::SuggestArgs),
    /// Show the homepage payload
    Homepage,
    /// Show a content page's sections
    Page(commands::page::PageArgs),
    /// Submit a contact form body
    Contact(commands::contact::ContactArgs),
    /// Check a ZIP code and print the quotes link
    Zip(commands::zip::ZipArgs),
    /// Run editor commands and filters
    Editor(commands::editor::EditorArgs),
    /// Show which fields a homepage section row displays
    Section(commands::section::SectionArgs),
    /// Load the blog form's category picker for a parent page
    Picker(commands::picker::PickerArgs),
    /// Serve the JSON proxy routes and the /articles view-model
    Serve(commands::serve::ServeArgs),
}

/// `RUST_LOG` plus info-level output from this binary, its libraries and the
/// HTTP trace layer. The binary's target is `insurance_site`, after `[[bin]]`.
fn env_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("insurance_site=info".parse()?)
        .add_directive("site_lib=info".parse()?)
        .add_directive("content_api=info".parse()?)
        .add_directive("tower_http=info".parse()?))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::parse(&cli.output)?;

    let mut settings = Settings::from_env();
    if let Some(base) = &cli.api_base {
        settings = settings.with_api_base(base);
    }

    match &cli.command {
        Commands::Articles(args) => commands::articles::run(args, &settings, &format).await?,
        Commands::Article(args) => commands::article::run(args, &settings, &format).await?,
        Commands::Categories(args) => commands::categories::run(args, &settings, &format).await?,
        Commands::Suggest(args) => commands::suggest::run(args, &settings, &format).await?,
        Commands::Homepage => commands::homepage::run(&settings, &format).await?,
        Commands::Page(args) => commands::page::run(args, &settings, &format).await?,
        Commands::Contact(args) => commands::contact::run(args, &settings, &format).await?,
        Commands::Zip(args) => commands::zip::run(args, &format)?,
        Commands::Editor(args) => commands::editor::run(args, &format)?,
        Commands::Section(args) => commands::section::run(args, &format)?,
        Commands::Picker(args) => commands::picker::run(args, &settings, &format).await?,
        Commands::Serve(args) => commands::serve::run(args, settings).await?,
    }

    Ok(())
}
