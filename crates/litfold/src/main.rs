//! Litfold command-line interface
//!
//! Normalizes parser trees, reduces class properties, and extracts the
//! synth configuration tables as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value as Json;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use litfold::declarations::{find_class, first_of_kind, property_of_class};
use litfold::extract::{chip_waves, config_scope, presets, unisons, CONFIG_ENUMS};
use litfold::{Evaluator, KindTable, ScriptParser, SyntaxParser};

#[derive(Parser)]
#[command(name = "litfold", version, about = "Reduce TypeScript syntax trees to plain data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace integer kind codes with symbolic names
    Normalize {
        /// Kind table dump (`ts.SyntaxKind` as JSON)
        #[arg(long)]
        kinds: PathBuf,
        /// Raw tree
        tree: PathBuf,
    },

    /// Reduce one property of a class
    Eval {
        /// Kind table dump (`ts.SyntaxKind` as JSON)
        #[arg(long)]
        kinds: PathBuf,
        /// Raw tree
        tree: PathBuf,
        /// Class holding the property
        #[arg(long = "class")]
        class_name: String,
        /// Property to reduce
        #[arg(long)]
        property: String,
        /// Resolve calls and member accesses against the class scope
        #[arg(long)]
        try_eval: bool,
        /// Reduce only the top level of the property
        #[arg(long)]
        shallow: bool,
        /// Enum to put in scope (repeatable)
        #[arg(long = "enum")]
        enums: Vec<String>,
        /// Also put the synth configuration enums in scope
        #[arg(long)]
        config_enums: bool,
        /// Limit on nested scope lookups and calls
        #[arg(long, default_value_t = litfold::context::DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Extract one of the synth configuration tables
    Table {
        /// Kind table dump (`ts.SyntaxKind` as JSON)
        #[arg(long)]
        kinds: PathBuf,
        /// Raw tree
        tree: PathBuf,
        /// Table to extract
        #[arg(value_enum)]
        table: Table,
        /// Class holding the table (defaults to the first class in the file)
        #[arg(long = "class")]
        class_name: Option<String>,
    },

    /// Parse a source file with the TypeScript compiler
    Parse {
        /// Also write the kind table here
        #[arg(long)]
        kinds_out: Option<PathBuf>,
        /// Program used to run the parser script
        #[arg(long, default_value = "bun")]
        runtime: String,
        /// TypeScript source
        source: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Table {
    /// `rawChipWaves`, normalized and scaled
    Waves,
    /// `unisons` with per-voice offsets
    Unisons,
    /// `presetCategories` without the custom category
    Presets,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match Cli::parse().command {
        Command::Normalize { kinds, tree } => {
            let kinds = load_kinds(&kinds)?;
            let normalized = litfold::normalize(&read_json(&tree)?, &kinds)
                .with_context(|| format!("failed to normalize {}", tree.display()))?;
            print_json(&normalized)
        }

        Command::Eval {
            kinds,
            tree,
            class_name,
            property,
            try_eval,
            shallow,
            enums,
            config_enums,
            max_depth,
        } => {
            let evaluator = Evaluator::new(load_kinds(&kinds)?).with_max_depth(max_depth);
            let source_file = evaluator
                .normalize(&read_json(&tree)?)
                .with_context(|| format!("failed to normalize {}", tree.display()))?;

            let mut enums: Vec<&str> = enums.iter().map(String::as_str).collect();
            if config_enums {
                enums.extend(CONFIG_ENUMS);
            }
            let scopes = config_scope(&source_file, &class_name, &enums)?;
            let class = find_class(&source_file, &class_name)?;
            let node = property_of_class(class, &property)?;

            let value = evaluator
                .evaluate(node, try_eval, shallow, &scopes)
                .with_context(|| format!("failed to reduce {}.{}", class_name, property))?;
            print_json(&value.to_json()?)
        }

        Command::Table {
            kinds,
            tree,
            table,
            class_name,
        } => {
            let evaluator = Evaluator::new(load_kinds(&kinds)?);
            let source_file = evaluator
                .normalize(&read_json(&tree)?)
                .with_context(|| format!("failed to normalize {}", tree.display()))?;
            let class = match &class_name {
                Some(name) => find_class(&source_file, name)?,
                None => first_of_kind(&source_file, "ClassDeclaration")
                    .with_context(|| format!("{} declares no class", tree.display()))?,
            };

            let extracted = match table {
                Table::Waves => serde_json::to_value(chip_waves(&evaluator, class)?)?,
                Table::Unisons => serde_json::to_value(unisons(&evaluator, class)?)?,
                Table::Presets => serde_json::to_value(presets(&evaluator, class)?)?,
            };
            print_json(&extracted)
        }

        Command::Parse {
            kinds_out,
            runtime,
            source,
        } => {
            let parser = ScriptParser::new(runtime, ["-e"]);
            let text = fs::read_to_string(&source)
                .with_context(|| format!("failed to read {}", source.display()))?;
            let filename = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "source.ts".to_string());

            if let Some(path) = kinds_out {
                let kinds = parser.syntax_kinds()?;
                fs::write(&path, serde_json::to_string_pretty(&kinds)?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            print_json(&parser.parse(&text, &filename)?)
        }
    }
}

fn read_json(path: &Path) -> Result<Json> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn load_kinds(path: &Path) -> Result<KindTable> {
    Ok(KindTable::from_enum_json(&read_json(path)?)?)
}

fn print_json(json: &Json) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(json)?);
    Ok(())
}
