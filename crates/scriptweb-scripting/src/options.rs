//! Compilation options: imports, references and resource limits

use serde::Serialize;
use std::time::Duration;

/// Produces the default-valued object for a constructor
pub type TemplateFn = fn() -> serde_json::Result<serde_json::Value>;

fn template_of<T: Serialize + Default>() -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(T::default())
}

/// A named zero-argument constructor exposed to scripts
#[derive(Debug, Clone)]
pub struct TypeConstructor {
    name: String,
    template: TemplateFn,
}

impl TypeConstructor {
    /// Name scripts call, e.g. `Person`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Materialize the default object this constructor returns
    pub fn template(&self) -> serde_json::Result<serde_json::Value> {
        (self.template)()
    }
}

/// A namespace of host types that scripts may construct.
///
/// A library listed in [`ScriptOptions::with_references`] is reachable by
/// qualified name (`models::Person()`); if its namespace is also imported,
/// its constructors are reachable unqualified (`Person()`).
#[derive(Debug, Clone)]
pub struct TypeLibrary {
    namespace: String,
    constructors: Vec<TypeConstructor>,
}

impl TypeLibrary {
    /// Create an empty library
    pub fn new<S: Into<String>>(namespace: S) -> Self {
        Self {
            namespace: namespace.into(),
            constructors: Vec::new(),
        }
    }

    /// Expose `T::default()` to scripts as the constructor `name`
    pub fn with_type<T: Serialize + Default>(mut self, name: impl Into<String>) -> Self {
        self.constructors.push(TypeConstructor {
            name: name.into(),
            template: template_of::<T>,
        });
        self
    }

    /// Library namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Constructors in registration order
    pub fn constructors(&self) -> &[TypeConstructor] {
        &self.constructors
    }
}

/// Engine resource limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLimits {
    /// Maximum operations per run
    pub max_operations: u64,
    /// Maximum string length in bytes
    pub max_string_size: usize,
    /// Maximum array length
    pub max_array_size: usize,
    /// Maximum object map size
    pub max_map_size: usize,
    /// Maximum expression nesting at global level
    pub max_expr_depth: usize,
    /// Maximum expression nesting inside functions
    pub max_function_expr_depth: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_operations: 100_000,
            max_string_size: 1024 * 1024,
            max_array_size: 10_000,
            max_map_size: 10_000,
            max_expr_depth: 25,
            max_function_expr_depth: 10,
        }
    }
}

/// Immutable compilation configuration.
///
/// Built with consuming `with_*` methods; nothing is cached between units.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    imports: Vec<String>,
    references: Vec<TypeLibrary>,
    strict_variables: bool,
    limits: ScriptLimits,
    timeout: Option<Duration>,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            imports: Vec::new(),
            references: Vec::new(),
            strict_variables: true,
            limits: ScriptLimits::default(),
            timeout: None,
        }
    }
}

impl ScriptOptions {
    /// Replace the imported namespaces
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the referenced type libraries
    pub fn with_references<I>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = TypeLibrary>,
    {
        self.references = references.into_iter().collect();
        self
    }

    /// Reject free variables that are neither declared globals nor locals
    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    /// Set resource limits
    pub fn with_limits(mut self, limits: ScriptLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the maximum wall-clock time for one run
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Imported namespaces
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Referenced type libraries
    pub fn references(&self) -> &[TypeLibrary] {
        &self.references
    }

    /// Whether strict variables are on
    pub fn strict_variables(&self) -> bool {
        self.strict_variables
    }

    /// Resource limits
    pub fn limits(&self) -> ScriptLimits {
        self.limits
    }

    /// Run timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether `namespace` is imported
    pub fn is_imported(&self, namespace: &str) -> bool {
        self.imports.iter().any(|i| i == namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Default)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[test]
    fn test_library_templates() {
        let library = TypeLibrary::new("geometry").with_type::<Point>("Point");

        assert_eq!(library.namespace(), "geometry");
        assert_eq!(library.constructors().len(), 1);

        let ctor = &library.constructors()[0];
        assert_eq!(ctor.name(), "Point");
        assert_eq!(ctor.template().unwrap(), serde_json::json!({"x": 0, "y": 0}));
    }

    #[test]
    fn test_options_builder() {
        let options = ScriptOptions::default()
            .with_imports(["geometry"])
            .with_references([TypeLibrary::new("geometry")])
            .with_strict_variables(false)
            .with_timeout(Duration::from_secs(2));

        assert!(options.is_imported("geometry"));
        assert!(!options.is_imported("models"));
        assert_eq!(options.references().len(), 1);
        assert!(!options.strict_variables());
        assert_eq!(options.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(options.limits().max_operations, 100_000);
    }

    #[test]
    fn test_with_imports_replaces() {
        let options = ScriptOptions::default()
            .with_imports(["a", "b"])
            .with_imports(vec!["c".to_string()]);
        assert_eq!(options.imports(), ["c".to_string()]);
    }
}
