// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::Context;
use clap::{Parser, Subcommand};
use fieldkit::{codec, AccessorKind, FieldKind, Model, Schema, SchemaSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fieldkit")]
#[command(about = "Inspect schema documents and normalize data against them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a schema document and list its fields and accessors
    Check {
        /// Schema document (YAML, or JSON with a .json extension)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
    },

    /// Clean untrusted JSON input and print the resulting wire document
    Normalize {
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// JSON input document
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Model to instantiate (defaults to the last one declared)
        #[arg(short, long)]
        model: Option<String>,

        /// Write the result to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the default instance of a model
    Defaults {
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        #[arg(short, long)]
        model: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { schema } => {
            print!("{}", cmd_check(&schema)?);
        }
        Commands::Normalize {
            schema,
            input,
            model,
            output,
        } => {
            let wire = cmd_normalize(&schema, &input, model.as_deref())?;
            if let Some(out_path) = output {
                std::fs::write(&out_path, &wire)?;
                println!("[OK] Normalized document written to: {}", out_path.display());
            } else {
                println!("{wire}");
            }
        }
        Commands::Defaults { schema, model } => {
            println!("{}", cmd_defaults(&schema, model.as_deref())?);
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<SchemaSet> {
    SchemaSet::load(path).with_context(|| format!("loading schema {}", path.display()))
}

fn pick(set: &SchemaSet, model: Option<&str>) -> anyhow::Result<Arc<Schema>> {
    let schema = match model {
        Some(name) => set
            .get(name)
            .with_context(|| format!("no model named '{name}' in document"))?,
        None => set.last().context("document declares no models")?,
    };
    Ok(Arc::clone(schema))
}

fn cmd_check(path: &Path) -> anyhow::Result<String> {
    let set = load(path)?;
    let mut out = format!("[OK] {}: {} model(s)\n", path.display(), set.len());
    for schema in set.iter() {
        out.push_str(&format!("\n{}\n", schema.name()));
        for field in schema.fields() {
            let detail = match field.kind() {
                FieldKind::Model(target) => format!("model<{}>", target.name()),
                other => other.name().to_string(),
            };
            out.push_str(&format!(
                "  {:<16} {:<14} {}\n",
                field.name(),
                detail,
                field.label()
            ));
        }
        for accessor in schema.accessors() {
            let kind = match accessor.kind() {
                AccessorKind::Property => "property",
                AccessorKind::Element => "element",
            };
            out.push_str(&format!(
                "  -> {} / {} ({kind}, channel {})\n",
                accessor.getter_name(),
                accessor.setter_name(),
                accessor.channel()
            ));
        }
    }
    Ok(out)
}

fn cmd_normalize(schema: &Path, input: &Path, model: Option<&str>) -> anyhow::Result<String> {
    let set = load(schema)?;
    let schema = pick(&set, model)?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading input {}", input.display()))?;
    let raw = codec::decode(&text)?;
    let instance = Model::new(&schema, &raw);
    Ok(codec::encode_pretty(&instance.to_wire())?)
}

fn cmd_defaults(schema: &Path, model: Option<&str>) -> anyhow::Result<String> {
    let set = load(schema)?;
    let schema = pick(&set, model)?;
    Ok(codec::encode_pretty(&Model::with_defaults(&schema).to_wire())?)
}
