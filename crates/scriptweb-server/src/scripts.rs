//! Built-in scripts and source selection

use scriptweb_config::{ScriptConfig, ScriptVariant};
use scriptweb_core::{Error, Result};
use scriptweb_scripting::ScriptSource;

/// Copy every field into a new person
pub const COPY_PERSON: &str = include_str!("../scripts/copy_person.rhai");

/// Copy into a list of people and return the last one
pub const LIST_COPY: &str = include_str!("../scripts/list_copy.rhai");

/// Source for a built-in variant; `None` for [`ScriptVariant::Custom`]
pub fn builtin(variant: ScriptVariant) -> Option<ScriptSource> {
    match variant {
        ScriptVariant::Copy => Some(ScriptSource::inline_named(COPY_PERSON, "copy_person.rhai")),
        ScriptVariant::ListCopy => Some(ScriptSource::inline_named(LIST_COPY, "list_copy.rhai")),
        ScriptVariant::Custom => None,
    }
}

/// Pick the configured source. File sources are read here, once, so
/// requests never touch the disk.
pub fn resolve_source(config: &ScriptConfig) -> Result<ScriptSource> {
    if let Some(source) = builtin(config.variant) {
        return Ok(source);
    }

    let source = config
        .source
        .clone()
        .ok_or_else(|| Error::Config("script.source is required for the custom variant".to_string()))?;

    let resolved = source.resolve().map_err(Error::script)?;
    tracing::debug!(script = %resolved.name(), "Custom script loaded");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_sources() {
        let copy = builtin(ScriptVariant::Copy).unwrap();
        assert_eq!(copy.name(), "copy_person.rhai");
        assert!(copy.load().unwrap().contains("person.Sex = Sex;"));

        let list = builtin(ScriptVariant::ListCopy).unwrap();
        assert!(list.load().unwrap().contains("people.push(person);"));

        assert!(builtin(ScriptVariant::Custom).is_none());
    }

    #[test]
    fn test_custom_requires_source() {
        let config = ScriptConfig {
            variant: ScriptVariant::Custom,
            ..Default::default()
        };
        assert!(matches!(resolve_source(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_file_is_read_once() {
        let mut file = tempfile::Builder::new().suffix(".rhai").tempfile().unwrap();
        writeln!(file, "Person()").unwrap();

        let config = ScriptConfig {
            variant: ScriptVariant::Custom,
            source: Some(ScriptSource::file(file.path())),
            ..Default::default()
        };
        let source = resolve_source(&config).unwrap();
        file.close().unwrap();

        assert!(matches!(source, ScriptSource::Inline { .. }));
        assert_eq!(source.load().unwrap().trim(), "Person()");
    }

    #[test]
    fn test_missing_custom_file() {
        let config = ScriptConfig {
            variant: ScriptVariant::Custom,
            source: Some(ScriptSource::file("/no/such/custom.rhai")),
            ..Default::default()
        };
        assert!(matches!(resolve_source(&config), Err(Error::Script(_))));
    }
}
