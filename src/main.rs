use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{self, filter::EnvFilter};

use recast::recipes::{RecipeParams, CATALOG};
use recast::{apply, ApplyOptions};

/// recast - catalog-driven refactoring for Python source files
#[derive(Parser, Debug)]
#[command(name = "recast")]
#[command(about = "Apply catalogued refactorings to Python source files")]
#[command(version)]
struct Args {
    /// Refactoring to apply (see --list)
    recipe: Option<String>,

    /// Target address, e.g. `order.py::Order::print_owing#L6-L8`
    target: Option<String>,

    /// New method/variable/constant name
    #[arg(long = "name", value_name = "NAME")]
    name: Option<String>,

    /// Destination class for move refactorings
    #[arg(long = "to", value_name = "CLASS")]
    to: Option<String>,

    /// Field holding the collaborator instance
    #[arg(long = "field", value_name = "FIELD")]
    field: Option<String>,

    /// Literal value, e.g. the magic number to replace
    #[arg(long = "value", value_name = "LITERAL")]
    value: Option<String>,

    /// Default value for a newly added parameter
    #[arg(long = "default", value_name = "EXPR")]
    default: Option<String>,

    /// Print the transformed source to stdout instead of rewriting the file
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Emit a machine-readable change report on stdout
    #[arg(long = "json")]
    json: bool,

    /// List the available refactorings and exit
    #[arg(long = "list")]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RECAST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if args.list {
        print_catalog();
        return Ok(());
    }

    let (Some(recipe), Some(target)) = (&args.recipe, &args.target) else {
        eprintln!("usage: recast <recipe> <target> [flags] (see recast --list)");
        std::process::exit(2);
    };

    let params = RecipeParams {
        name: args.name.clone(),
        to: args.to.clone(),
        field: args.field.clone(),
        value: args.value.clone(),
        default: args.default.clone(),
    };
    let options = ApplyOptions {
        dry_run: args.dry_run,
    };

    match apply(recipe, target, &params, &options) {
        Ok(outcome) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else if args.dry_run {
                print!("{}", outcome.output);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn print_catalog() {
    let mut category = "";
    for entry in CATALOG {
        if entry.category != category {
            category = entry.category;
            println!("{category}:");
        }
        println!("  {:<44} {}", entry.name, entry.summary);
    }
}
