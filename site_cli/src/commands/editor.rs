use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use site_lib::editor::{EditorContext, EditorEdit, Selection};
use site_lib::ExtensionRegistry;

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct EditorArgs {
    #[command(subcommand)]
    pub action: EditorAction,
}

#[derive(Subcommand)]
pub enum EditorAction {
    /// List registered editor commands
    Commands,
    /// Run a command, e.g. `insert_video <url>` or `set_id <id>`
    Exec {
        /// Command name
        name: String,
        /// Command argument
        arg: String,
        /// Admin origin used to resolve /media/ paths
        #[arg(long)]
        origin: Option<String>,
        /// Tag of the selected element
        #[arg(long)]
        element: Option<String>,
        /// Selected markup
        #[arg(long, default_value = "")]
        html: String,
    },
    /// Run the paste/load filters over markup
    Filter {
        /// Markup to filter
        html: String,
    },
}

pub fn edit_json(edit: &EditorEdit) -> Value {
    match edit {
        EditorEdit::InsertHtml(html) => json!({ "insert_html": html }),
        EditorEdit::SetAttribute { name, value } => {
            json!({ "set_attribute": { "name": name, "value": value } })
        }
        EditorEdit::ReplaceSelection(html) => json!({ "replace_selection": html }),
    }
}

fn edit_text(edit: &EditorEdit) -> String {
    match edit {
        EditorEdit::InsertHtml(html) | EditorEdit::ReplaceSelection(html) => html.clone(),
        EditorEdit::SetAttribute { name, value } => format!("{}=\"{}\"", name, value),
    }
}

pub fn run(args: &EditorArgs, format: &OutputFormat) -> Result<()> {
    let registry = ExtensionRegistry::with_defaults()?;
    match &args.action {
        EditorAction::Commands => {
            let names = registry.command_names();
            match format {
                OutputFormat::Json => print_json(&names),
                _ => names.iter().for_each(|n| println!("{}", n)),
            }
        }
        EditorAction::Exec {
            name,
            arg,
            origin,
            element,
            html,
        } => {
            let ctx = EditorContext {
                origin: origin.clone(),
                selection: Selection {
                    element: element.clone(),
                    html: html.clone(),
                },
            };
            let edit = registry.exec(name, &ctx, arg)?;
            match format {
                OutputFormat::Json => print_json(&edit_json(&edit)),
                _ => println!("{}", edit_text(&edit)),
            }
        }
        EditorAction::Filter { html } => {
            let filtered = registry.on_paste(html);
            match format {
                OutputFormat::Json => print_json(&json!({ "html": filtered })),
                _ => println!("{}", filtered),
            }
        }
    }
    Ok(())
}
