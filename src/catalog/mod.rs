//! Static tool catalogue: categories and shortcut commands.
//!
//! Both tables are plain data (`data/categories.yaml`) embedded in the binary
//! and parsed once at startup.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

const BUILTIN: &str = include_str!("../../data/categories.yaml");

/// A group of related tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub tools: Vec<String>,
}

/// How a shortcut turns its positional arguments into `(tool, op)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutKind {
    /// Tool is fixed; one optional OP.
    Fixed,
    /// One optional OP; the tool is looked up in `routes`.
    Routed,
    /// Optional TOOL then optional OP.
    Open,
}

/// A per-domain shortcut command that pre-selects a tool.
#[derive(Debug, Clone, Deserialize)]
pub struct Shortcut {
    pub name: String,
    pub label: String,
    pub kind: ShortcutKind,
    /// Fixed tool, routing fallback, or default tool depending on `kind`.
    pub tool: String,
    pub default_op: String,
    #[serde(default)]
    pub common: Vec<String>,
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
}

impl Shortcut {
    /// Resolve positional arguments to `(tool, op)`.
    pub fn resolve(&self, positional: &[String]) -> Result<(String, String)> {
        let max = match self.kind {
            ShortcutKind::Fixed | ShortcutKind::Routed => 1,
            ShortcutKind::Open => 2,
        };
        if positional.len() > max {
            bail!(
                "'{}' takes at most {} positional argument(s), got {}",
                self.name,
                max,
                positional.len()
            );
        }

        Ok(match self.kind {
            ShortcutKind::Fixed => {
                let op = positional.first().unwrap_or(&self.default_op);
                (self.tool.clone(), op.clone())
            }
            ShortcutKind::Routed => {
                let op = positional.first().unwrap_or(&self.default_op);
                let tool = self.routes.get(op).unwrap_or(&self.tool);
                (tool.clone(), op.clone())
            }
            ShortcutKind::Open => {
                let tool = positional.first().unwrap_or(&self.tool);
                let op = positional.get(1).unwrap_or(&self.default_op);
                (tool.clone(), op.clone())
            }
        })
    }

    /// Hint line listing common tools / operations for this shortcut.
    pub fn hint(&self) -> String {
        let what = match self.kind {
            ShortcutKind::Open => "Tools",
            ShortcutKind::Fixed | ShortcutKind::Routed => "Common ops",
        };
        format!("{what}: {}", self.common.join(", "))
    }
}

/// Categories plus shortcuts.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCatalog {
    pub categories: Vec<Category>,
    pub shortcuts: Vec<Shortcut>,
}

impl ToolCatalog {
    /// The catalogue compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN).context("built-in tool catalogue is invalid")
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let catalog: ToolCatalog = serde_yaml::from_str(raw)?;
        Ok(catalog)
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(key))
    }

    pub fn category_keys(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn shortcut(&self, name: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builtin_catalog_loads() {
        let cat = ToolCatalog::builtin().unwrap();
        assert_eq!(cat.categories.len(), 15);
        let entries: usize = cat.categories.iter().map(|c| c.tools.len()).sum();
        assert_eq!(entries, 92);
        let otto = cat.category("OTTO").unwrap();
        assert_eq!(otto.label, "OTTO SEO");
        assert!(otto.tools.iter().any(|t| t == "task_management"));
        assert!(cat.category("nope").is_none());
    }

    #[test]
    fn every_shortcut_present() {
        let cat = ToolCatalog::builtin().unwrap();
        for name in ["brand", "otto", "geo", "gbp", "ppc", "site", "content"] {
            assert!(cat.shortcut(name).is_some(), "missing shortcut {name}");
        }
    }

    #[test]
    fn fixed_shortcut_uses_default_op() {
        let cat = ToolCatalog::builtin().unwrap();
        let brand = cat.shortcut("brand").unwrap();
        assert_eq!(
            brand.resolve(&[]).unwrap(),
            ("brand_vault".into(), "list_brand_vaults".into())
        );
        assert_eq!(
            brand.resolve(&args(&["get_brand_vault_overview"])).unwrap(),
            ("brand_vault".into(), "get_brand_vault_overview".into())
        );
        assert!(brand.resolve(&args(&["a", "b"])).is_err());
    }

    #[test]
    fn routed_shortcut_maps_operation_to_tool() {
        let cat = ToolCatalog::builtin().unwrap();
        let geo = cat.shortcut("geo").unwrap();
        assert_eq!(
            geo.resolve(&args(&["get_sentiment_overview"])).unwrap().0,
            "sentiment"
        );
        assert_eq!(
            geo.resolve(&args(&["check_ps_status"])).unwrap().0,
            "prompt_simulator"
        );
        assert_eq!(
            geo.resolve(&args(&["something_new"])).unwrap(),
            ("visibility".into(), "something_new".into())
        );
        assert_eq!(
            geo.resolve(&[]).unwrap(),
            ("visibility".into(), "get_brand_overview".into())
        );
    }

    #[test]
    fn open_shortcut_takes_tool_and_op() {
        let cat = ToolCatalog::builtin().unwrap();
        let otto = cat.shortcut("otto").unwrap();
        assert_eq!(
            otto.resolve(&[]).unwrap(),
            ("project_management".into(), "list_otto_projects".into())
        );
        assert_eq!(
            otto.resolve(&args(&["seo_analysis"])).unwrap(),
            ("seo_analysis".into(), "list_otto_projects".into())
        );
        assert_eq!(
            otto.resolve(&args(&["seo_analysis", "get_project_issues_summary"]))
                .unwrap(),
            ("seo_analysis".into(), "get_project_issues_summary".into())
        );
        assert!(otto.resolve(&args(&["a", "b", "c"])).is_err());
    }

    #[test]
    fn hint_lists_common_entries() {
        let cat = ToolCatalog::builtin().unwrap();
        let ppc = cat.shortcut("ppc").unwrap();
        assert!(ppc.hint().starts_with("Tools: business_crud"));
    }
}
