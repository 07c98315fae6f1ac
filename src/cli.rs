//! Minimal CLI: load → translate → (graphql | model)
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use oas2gql::codegen;
use oas2gql::config::{Config, EmptyIdentifierPolicy, Ordering};
use oas2gql::ir::GqlSpec;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// translate an OpenAPI 3 document into a GraphQL schema
#[derive(Parser, Debug)]
#[command(name = "oas2gql", version)]
pub struct CommandLineInterface {
    /// debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// translate and print GraphQL SDL
    Graphql(GraphqlOut),
    /// translate and print the intermediate model as JSON (debug view)
    Model(ModelOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// OpenAPI document: a local path or an http(s) URL, JSON or YAML
    #[arg(long, short)]
    input: String,

    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// order types and operations by name instead of document order
    #[arg(long, default_value_t = false)]
    sort: bool,

    /// translate schemas and operations on all cores
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// identifier to use when a path or parameter name has no usable characters
    #[arg(long)]
    placeholder: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct GraphqlOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .graphql file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// leave the generation time out of the header
    #[arg(long)]
    no_timestamp: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ModelOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.sort {
            config.ordering = Ordering::Lexicographic;
        }
        if self.parallel {
            config.parallel = true;
        }
        if let Some(placeholder) = &self.placeholder {
            config.empty_identifier = EmptyIdentifierPolicy::Placeholder(placeholder.clone());
        }
        Ok(config)
    }

    fn load_translate(&self, config: &Config) -> anyhow::Result<GqlSpec> {
        let doc = oas2gql::loader::load(&self.input).with_context(|| format!("failed to load {}", self.input))?;
        let spec = oas2gql::translate_document(&doc, config).with_context(|| format!("could not translate {}", self.input))?;
        Ok(spec)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Graphql(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let mut config = target.input_settings.config()?;
                if target.no_timestamp {
                    config.timestamp = false;
                }
                let spec = target.input_settings.load_translate(&config)?;

                let sdl = codegen::render(&spec, config.timestamp);
                write_output(target.out.as_deref(), &sdl)
            }
            Command::Model(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let config = target.input_settings.config()?;
                let spec = target.input_settings.load_translate(&config)?;
                let mut model_src = serde_json::to_string_pretty(&spec)?;
                model_src.push('\n');
                write_output(target.out.as_deref(), &model_src)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, src: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        print!("{src}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("could not create {}", parent.display()))?;
    }
    std::fs::write(out, src).with_context(|| format!("could not save {}", out.display()))?;
    eprintln!("{} {}", "Here you go:".green().bold(), out.display());
    Ok(())
}
