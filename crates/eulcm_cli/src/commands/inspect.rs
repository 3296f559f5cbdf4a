use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use eulcm_core::xmlmap::filetech::FileMasterTech;
use eulcm_core::xmlmap::mods::Mods;
use eulcm_core::xmlmap::mods_ext::CollectionMods;
use eulcm_core::xmlmap::rights::Rights;
use eulcm_core::xmlmap::series::ArrangementMods;
use eulcm_core::xmlmap::{Element, FieldKind, Schema, XmlObject};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocumentKind {
    Rights,
    Filetech,
    Mods,
    CollectionMods,
    ArrangementMods,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Path to the XML file
    #[arg(short, long)]
    pub file: PathBuf,

    /// How to read the document
    #[arg(short, long, value_enum)]
    pub kind: DocumentKind,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let xml = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    match args.kind {
        DocumentKind::Rights => report(&Rights::from_xml(&xml)?),
        DocumentKind::Mods => report(&Mods::from_xml(&xml)?),
        DocumentKind::CollectionMods => report(&CollectionMods::from_xml(&xml)?),
        DocumentKind::ArrangementMods => report(&ArrangementMods::from_xml(&xml)?),
        DocumentKind::Filetech => {
            let filetech = FileMasterTech::from_xml(&xml)?;
            report(&filetech);
            for (idx, file) in filetech.files().iter().enumerate() {
                println!("file[{}]: {}", idx, file.name().unwrap_or_default());
                println!("   browsable: {}", file.browsable());
                for part in file.dir_parts() {
                    println!(
                        "   dir: ({}, {}, {})",
                        part.computer.as_deref().unwrap_or("-"),
                        part.base,
                        part.part
                    );
                }
            }
        }
    }
    Ok(())
}

fn report<T: XmlObject>(document: &T) {
    println!("📄 {}", T::schema().name);
    print_fields(T::schema(), document.node(), "");

    let errors = document.validation_errors();
    if errors.is_empty() {
        println!("✅ No field errors");
    }
    for err in errors {
        println!("🛑 {}: {}", err.field, err.message);
    }
}

/// Every mapped value present in `node`, with dotted names for nested fields.
fn print_fields(schema: &Schema, node: &Element, scope: &str) {
    for field in &schema.fields {
        let name = if scope.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", scope, field.name)
        };
        match field.kind {
            FieldKind::String | FieldKind::Integer => {
                if let Some(value) = field.xpath.value(node) {
                    println!("{} = {}", name, value);
                }
            }
            FieldKind::Boolean { true_value, .. } => {
                let value = field.xpath.value(node);
                println!("{} = {}", name, value.as_deref() == Some(true_value));
            }
            FieldKind::Node(nested) => {
                if let Some(child) = field.xpath.select(node).first() {
                    print_fields(nested(), child, &name);
                }
            }
            FieldKind::NodeList(nested) => {
                for (idx, child) in field.xpath.select(node).into_iter().enumerate() {
                    print_fields(nested(), child, &format!("{}[{}]", name, idx));
                }
            }
        }
    }
}
