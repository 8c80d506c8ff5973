//! Branch list loading and filtering for `yards batch`.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Branch identifiers arrive as numbers from the upstream listing, but hand
/// written files often use strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BranchId {
    Number(i64),
    Text(String),
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchId::Number(n) => write!(f, "{}", n),
            BranchId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "type", default)]
    pub kind: Option<i64>,
    #[serde(default)]
    pub province_id: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
}

/// Optional equality filters; `None` matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchFilter {
    pub kind: Option<i64>,
    pub province_id: Option<i64>,
    pub status: Option<i64>,
}

impl BranchFilter {
    pub fn matches(&self, branch: &Branch) -> bool {
        fn accepts(want: Option<i64>, have: Option<i64>) -> bool {
            want.is_none() || want == have
        }
        accepts(self.kind, branch.kind)
            && accepts(self.province_id, branch.province_id)
            && accepts(self.status, branch.status)
    }
}

/// Load the branch list and apply `filter`. An empty result is an error.
pub fn load_branches(path: &Path, filter: &BranchFilter) -> Result<Vec<Branch>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read branch list: {}", path.display()))?;
    let branches: Vec<Branch> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid branch list: {}", path.display()))?;

    let loaded = branches.len();
    let selected: Vec<Branch> = branches.into_iter().filter(|b| filter.matches(b)).collect();
    tracing::info!(loaded, selected = selected.len(), "loaded branch list");

    if selected.is_empty() {
        anyhow::bail!("No branches match the given filters in {}", path.display());
    }
    Ok(selected)
}
