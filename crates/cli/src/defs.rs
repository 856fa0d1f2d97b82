use anyhow::{Context, Result, bail};
use console_options::{Arity, FlagIndex, OptionDeclaration};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One row of a declaration file.
///
/// Either the compact `["help, h", 0]` form or an object with optional help
/// text:
///
/// ```json
/// { "names": "select, s", "arity": "+", "help": "XPath to show", "valueName": "XPATH" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeclarationRow {
    Pair(String, Arity),
    Full(FullRow),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullRow {
    pub names: String,
    pub arity: Arity,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub value_name: Option<String>,
}

impl DeclarationRow {
    fn into_declaration(self, idx: usize) -> Result<OptionDeclaration> {
        let (names, arity, help, value_name) = match self {
            Self::Pair(names, arity) => (names, arity, None, None),
            Self::Full(row) => (row.names, row.arity, row.help, row.value_name),
        };
        let mut decl = OptionDeclaration::new(&names, arity)
            .with_context(|| format!("declaration #{idx} ({names:?})"))?;
        if let Some(help) = help {
            decl = decl.help(help);
        }
        if let Some(value_name) = value_name {
            decl = decl.value_name(value_name);
        }
        Ok(decl)
    }
}

/// Parse a JSON declaration table.
pub fn parse_defs(json: &str) -> Result<FlagIndex> {
    let rows: Vec<DeclarationRow> =
        serde_json::from_str(json).context("declaration file must be a JSON array of rows")?;
    if rows.is_empty() {
        bail!("declaration file has no rows");
    }
    let declarations = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| row.into_declaration(idx))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(count = declarations.len(), "loaded option declarations");
    Ok(FlagIndex::compile(declarations))
}

/// Read and compile a declaration file.
pub fn load_defs(path: &Path) -> Result<FlagIndex> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_defs(&text).with_context(|| format!("invalid declaration file {}", path.display()))
}
