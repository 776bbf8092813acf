//! Typed build configuration mapped from a parsed document.

use crate::helpers::{get_kind, get_string, get_string_list, string_items};
use crate::hooks::{CachePolicy, ValidateStr};
use crate::{ConfigError, ConfigResult};
use anvil_common::{Node, NodeKind};
use hashbrown::HashMap;
use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};

pub const DEFAULT_LIBS_PATH: &str = "#{AWD}/src/libs";
pub const DEFAULT_TARGET_PATH: &str = "#{AWD}/target";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnvilConfig {
    pub package: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub workspace: Option<WorkspaceConfig>,
    pub targets: Vec<TargetConfig>,
    pub build: Option<BuildConfig>,
    pub profiles: HashMap<String, ProfileConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub libs: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetConfig {
    pub name: Option<String>,
    /// `type` in the document.
    pub kind: Option<String>,
    pub main: Option<String>,
    pub target: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub compiler: Option<String>,
    pub cstd: Option<String>,
    pub macros: HashMap<String, String>,
    pub arguments: HashMap<String, ArgumentConfig>,
    pub deps: Vec<DependencyConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentConfig {
    pub validate_str: Option<String>,
    pub cache_policy: Option<String>,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyConfig {
    pub name: Option<String>,
    /// `type` in the document.
    pub kind: Option<String>,
    pub repo: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub flags: Vec<String>,
}

impl AnvilConfig {
    /// Maps the root of a document.
    ///
    /// Only a root that is not a map is an error, everything else is optional
    /// and values of the wrong kind are ignored.
    pub fn from_node(node: &Node) -> ConfigResult<Self> {
        if !node.is_map() {
            return Err(ConfigError::NotAMap(node.kind()));
        }

        let version = match node.get("version") {
            Some(v) => match &**v {
                Node::String(s) => Some(s.clone()),
                Node::Number(n) => Some(n.to_string()),
                other => {
                    warn!(key = "version", found = %other.kind(), "ignoring value of the wrong kind");
                    None
                }
            },
            None => None,
        };

        let config = AnvilConfig {
            package: get_string(node, "package"),
            version,
            author: get_string(node, "author"),
            description: get_string(node, "description"),
            workspace: get_kind(node, "workspace", NodeKind::Map)
                .map(|ws| WorkspaceConfig::from_node(ws)),
            targets: get_kind(node, "targets", NodeKind::List)
                .and_then(|list| list.as_list())
                .unwrap_or_default()
                .iter()
                .filter(|item| item.is_map())
                .map(|item| TargetConfig::from_node(item))
                .collect(),
            build: get_kind(node, "build", NodeKind::Map).map(|build| BuildConfig::from_node(build)),
            profiles: get_kind(node, "profiles", NodeKind::Map)
                .map(|profiles| profiles_from_node(profiles))
                .unwrap_or_default(),
        };

        debug!(
            package = config.package.as_deref().unwrap_or("?"),
            targets = config.targets.len(),
            profiles = config.profiles.len(),
            "mapped configuration"
        );
        Ok(config)
    }
}

impl WorkspaceConfig {
    fn from_node(node: &Node) -> Self {
        WorkspaceConfig {
            libs: get_string(node, "libs"),
            target: get_string(node, "target"),
        }
    }

    #[must_use]
    pub fn libs_or_default(&self) -> &str {
        self.libs.as_deref().unwrap_or(DEFAULT_LIBS_PATH)
    }

    #[must_use]
    pub fn target_or_default(&self) -> &str {
        self.target.as_deref().unwrap_or(DEFAULT_TARGET_PATH)
    }
}

impl TargetConfig {
    fn from_node(node: &Node) -> Self {
        TargetConfig {
            name: get_string(node, "name"),
            kind: get_string(node, "type"),
            main: get_string(node, "main"),
            target: get_string_list(node, "target"),
        }
    }
}

impl BuildConfig {
    fn from_node(node: &Node) -> Self {
        let mut macros = HashMap::new();
        if let Some(map) = get_kind(node, "macros", NodeKind::Map).and_then(|m| m.as_map()) {
            for entry in map {
                if let Some(value) = entry.value.as_str() {
                    macros.insert(entry.key.clone(), value.to_string());
                }
            }
        }

        let mut arguments = HashMap::new();
        if let Some(map) = get_kind(node, "arguments", NodeKind::Map).and_then(|m| m.as_map()) {
            for entry in map {
                if entry.value.is_map() {
                    arguments.insert(entry.key.clone(), ArgumentConfig::from_node(&entry.value));
                }
            }
        }

        let deps = get_kind(node, "deps", NodeKind::List)
            .and_then(|list| list.as_list())
            .unwrap_or_default()
            .iter()
            .filter(|item| item.is_map())
            .map(|item| DependencyConfig::from_node(item))
            .collect();

        BuildConfig {
            compiler: get_string(node, "compiler"),
            cstd: get_string(node, "cstd"),
            macros,
            arguments,
            deps,
        }
    }
}

impl ArgumentConfig {
    fn from_node(node: &Node) -> Self {
        ArgumentConfig {
            validate_str: get_string(node, "validate_str"),
            cache_policy: get_string(node, "cache_policy"),
            commands: get_string_list(node, "commands"),
        }
    }

    #[must_use]
    pub fn validate_mode(&self) -> Option<ValidateStr> {
        self.validate_str.as_deref().and_then(ValidateStr::from_name)
    }

    #[must_use]
    pub fn cache_mode(&self) -> Option<CachePolicy> {
        self.cache_policy.as_deref().and_then(CachePolicy::from_name)
    }
}

impl DependencyConfig {
    fn from_node(node: &Node) -> Self {
        DependencyConfig {
            name: get_string(node, "name"),
            kind: get_string(node, "type"),
            repo: get_string(node, "repo"),
            path: get_string(node, "path"),
        }
    }
}

fn profiles_from_node(node: &Node) -> HashMap<String, ProfileConfig> {
    node.as_map()
        .unwrap_or_default()
        .iter()
        .filter(|entry| matches!(*entry.value, Node::List(_)))
        .map(|entry| {
            (
                entry.key.clone(),
                ProfileConfig {
                    flags: string_items(&entry.value),
                },
            )
        })
        .collect()
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

impl Display for AnvilConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== AnvilConfig ===")?;
        writeln!(f, "Package: {}", opt(&self.package))?;
        writeln!(f, "Version: {}", opt(&self.version))?;
        writeln!(f, "Author: {}", opt(&self.author))?;
        writeln!(f, "Description: {}", opt(&self.description))?;

        let workspace = self.workspace.clone().unwrap_or_default();
        writeln!(f, "\n-- Workspace --")?;
        writeln!(f, "Libs Path: {}", workspace.libs_or_default())?;
        writeln!(f, "Target Path: {}", workspace.target_or_default())?;

        writeln!(f, "\n-- Targets -- {}", self.targets.len())?;
        for (i, target) in self.targets.iter().enumerate() {
            writeln!(f, "Target {i}:")?;
            writeln!(f, "  Name: {}", opt(&target.name))?;
            writeln!(f, "  Type: {}", opt(&target.kind))?;
            writeln!(f, "  Main: {}", opt(&target.main))?;
            for (j, arch) in target.target.iter().enumerate() {
                writeln!(f, "    arch[{j}]: {arch}")?;
            }
        }

        if let Some(build) = &self.build {
            writeln!(f, "\n-- Build --")?;
            writeln!(f, "Compiler: {}", opt(&build.compiler))?;
            writeln!(f, "C Standard: {}", opt(&build.cstd))?;
            writeln!(f, "Macros:")?;
            for key in sorted_keys(&build.macros) {
                writeln!(f, "  {key} = {}", build.macros[key])?;
            }
            writeln!(f, "Arguments:")?;
            for key in sorted_keys(&build.arguments) {
                let args = &build.arguments[key];
                writeln!(f, "  {key}")?;
                writeln!(f, "    validate_str = {}", opt(&args.validate_str))?;
                writeln!(f, "    cache_policy = {}", opt(&args.cache_policy))?;
                for cmd in &args.commands {
                    writeln!(f, "    -> {cmd}")?;
                }
            }
            writeln!(f, "Dependencies:")?;
            for (i, dep) in build.deps.iter().enumerate() {
                writeln!(f, "  Dependency {i}:")?;
                writeln!(f, "    Name: {}", opt(&dep.name))?;
                writeln!(f, "    Type: {}", opt(&dep.kind))?;
                writeln!(f, "    Repo: {}", opt(&dep.repo))?;
                writeln!(f, "    Path: {}", opt(&dep.path))?;
            }
        }

        if !self.profiles.is_empty() {
            writeln!(f, "\n-- Profiles --")?;
            for key in sorted_keys(&self.profiles) {
                let flags = &self.profiles[key].flags;
                writeln!(f, "  {key} ({}):", flags.len())?;
                for (i, flag) in flags.iter().enumerate() {
                    writeln!(f, "      [{i}] {flag}")?;
                }
            }
        }

        writeln!(f, "====================")
    }
}
