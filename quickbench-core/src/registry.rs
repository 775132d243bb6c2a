//! Export Registry
//!
//! Functions annotated with `#[quickbench::export]` submit an [`ExportDef`]
//! through `inventory`. At startup [`Registry::from_inventory`] scans those
//! submissions once and groups them into [`Module`]s keyed by source file, in
//! source order. Modules can also be assembled by hand with the builder
//! methods, which is how tests and embedders register benchmarks without the
//! attribute.
//!
//! The registry never filters by name: prefix and allow-list selection are
//! applied to the enumerated exports afterwards.

use crate::error::LoadError;
use crate::unit::BenchmarkUnit;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Export definition registered via `#[quickbench::export]`
#[derive(Debug, Clone, Copy)]
pub struct ExportDef {
    /// Function identifier
    pub name: &'static str,
    /// Source file path as reported by `file!()`
    pub file: &'static str,
    /// Source line number
    pub line: u32,
    /// Module path
    pub module_path: &'static str,
    /// Constructor for the runtime export
    pub factory: ExportFactory,
}

/// How a registered export is turned into something runnable
#[derive(Debug, Clone, Copy)]
pub enum ExportFactory {
    /// A plain benchmark function
    Unit(fn() -> BenchmarkUnit),
    /// A function returning competing implementations
    Group(fn() -> Vec<BenchmarkUnit>),
}

inventory::collect!(ExportDef);

/// Anchor to prevent LTO from stripping inventory entries
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || for _ in inventory::iter::<ExportDef> {};

/// Factory producing the members of a comparison group
pub type GroupFactory = Arc<dyn Fn() -> Vec<BenchmarkUnit> + Send + Sync>;

/// Runtime form of an export
#[derive(Clone)]
pub enum ExportKind {
    /// Callable measured directly
    Unit(BenchmarkUnit),
    /// Comparison group factory
    Group(GroupFactory),
}

/// One named binding of a module
#[derive(Clone)]
pub struct Export {
    name: String,
    kind: ExportKind,
}

impl Export {
    /// Export a benchmark unit under its own name
    pub fn unit(unit: BenchmarkUnit) -> Self {
        Self {
            name: unit.name().to_string(),
            kind: ExportKind::Unit(unit),
        }
    }

    /// Export a comparison group factory
    pub fn group<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Vec<BenchmarkUnit> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: ExportKind::Group(Arc::new(factory)),
        }
    }

    fn from_def(def: &ExportDef) -> Self {
        match def.factory {
            ExportFactory::Unit(make) => Self {
                name: def.name.to_string(),
                kind: ExportKind::Unit(make()),
            },
            ExportFactory::Group(make) => Self::group(def.name, make),
        }
    }

    /// Export name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Export kind
    pub fn kind(&self) -> &ExportKind {
        &self.kind
    }

    /// View this export as a zero-argument callable.
    ///
    /// A group export is timed as the call that builds its member list.
    pub fn to_unit(&self) -> BenchmarkUnit {
        match &self.kind {
            ExportKind::Unit(unit) => unit.clone(),
            ExportKind::Group(factory) => {
                let factory = Arc::clone(factory);
                BenchmarkUnit::sync(self.name.as_str(), move || drop(factory()))
            }
        }
    }

    /// Invoke a group export and collect its members.
    pub fn to_group(&self) -> Result<ComparisonGroup, LoadError> {
        match &self.kind {
            ExportKind::Group(factory) => Ok(ComparisonGroup {
                name: self.name.clone(),
                units: factory(),
            }),
            ExportKind::Unit(_) => Err(LoadError::NotAGroup {
                name: self.name.clone(),
            }),
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ExportKind::Unit(_) => "unit",
            ExportKind::Group(_) => "group",
        };
        f.debug_struct("Export")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// Competing implementations measured under one label
#[derive(Debug, Clone)]
pub struct ComparisonGroup {
    /// Comparison name (the export's name)
    pub name: String,
    /// Members in the order the export returned them
    pub units: Vec<BenchmarkUnit>,
}

/// A source module and its exports, in enumeration order
#[derive(Debug, Clone)]
pub struct Module {
    path: PathBuf,
    exports: Vec<Export>,
}

impl Module {
    /// Create an empty module for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exports: Vec::new(),
        }
    }

    /// Append an export
    pub fn export(mut self, export: Export) -> Self {
        self.exports.push(export);
        self
    }

    /// Append a benchmark unit export
    pub fn unit(self, unit: BenchmarkUnit) -> Self {
        self.export(Export::unit(unit))
    }

    /// Append a comparison group export
    pub fn group<F>(self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Vec<BenchmarkUnit> + Send + Sync + 'static,
    {
        self.export(Export::group(name, factory))
    }

    /// Source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exports in enumeration order
    pub fn exports(&self) -> &[Export] {
        &self.exports
    }

    /// Whether `candidate` refers to this module's source file.
    ///
    /// Registered paths are relative to the workspace root while candidates
    /// are usually absolute, so the comparison is a path-suffix match.
    pub fn matches(&self, candidate: &Path) -> bool {
        candidate.ends_with(&self.path)
    }
}

/// Resolves a module path to its exports
pub trait ModuleLoader: Send + Sync {
    /// Load the module at `path`
    fn load(&self, path: &Path) -> Result<Module, LoadError>;
}

/// Collection of known modules
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: Vec<Module>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from every `#[quickbench::export]` in the binary.
    ///
    /// Exports are grouped per source file and ordered by line, so a module's
    /// enumeration order is its declaration order.
    pub fn from_inventory() -> Self {
        let mut files: BTreeMap<&'static str, Vec<&'static ExportDef>> = BTreeMap::new();
        for def in inventory::iter::<ExportDef> {
            files.entry(def.file).or_default().push(def);
        }

        let modules = files
            .into_iter()
            .map(|(file, mut defs)| {
                defs.sort_by_key(|def| def.line);
                tracing::debug!(file, exports = defs.len(), "registered module");
                defs.into_iter()
                    .fold(Module::new(file), |module, def| module.export(Export::from_def(def)))
            })
            .collect();

        Self { modules }
    }

    /// Add a module
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Find the module registered for `path`, preferring the most specific match.
    pub fn find(&self, path: &Path) -> Option<&Module> {
        self.modules
            .iter()
            .filter(|module| module.matches(path))
            .max_by_key(|module| module.path.components().count())
    }
}

impl ModuleLoader for Registry {
    fn load(&self, path: &Path) -> Result<Module, LoadError> {
        match self.find(path) {
            Some(module) => Ok(Module {
                path: path.to_path_buf(),
                exports: module.exports.clone(),
            }),
            None if path.is_file() => {
                tracing::debug!(path = %path.display(), "no exports registered for file");
                Ok(Module::new(path))
            }
            None => Err(LoadError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}
