//! Parser configuration.
//!
//! [`ParserOptions`] can be built in code with the `with_*` methods or
//! deserialized from a camelCase JSON document with
//! [`ParserOptions::from_json`].

use crate::error::ConfigError;
use bitflags::bitflags;
use serde::Deserialize;
use serde_json::Value;

/// How the input should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTypeOption {
    #[default]
    Script,
    Module,
    /// Parse as a module, then report `script` unless module syntax was seen.
    Unambiguous,
}

bitflags! {
    /// The set of enabled grammar plugins.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Plugins: u16 {
        const JSX               = 1 << 0;
        const TYPESCRIPT        = 1 << 1;
        const FLOW              = 1 << 2;
        const DECORATORS        = 1 << 3;
        const DECORATORS_LEGACY = 1 << 4;
        const PLACEHOLDERS      = 1 << 5;
        const ESTREE            = 1 << 6;
        const V8INTRINSIC       = 1 << 7;
    }
}

/// Plugin pairs that cannot be enabled together.
const INCOMPATIBLE: [(Plugins, Plugins); 4] = [
    (Plugins::FLOW, Plugins::TYPESCRIPT),
    (Plugins::JSX, Plugins::PLACEHOLDERS),
    (Plugins::V8INTRINSIC, Plugins::PLACEHOLDERS),
    (Plugins::DECORATORS, Plugins::DECORATORS_LEGACY),
];

impl Plugins {
    pub fn from_plugin_name(name: &str) -> Option<Self> {
        Some(match name {
            "jsx" => Plugins::JSX,
            "typescript" => Plugins::TYPESCRIPT,
            "flow" => Plugins::FLOW,
            "decorators" => Plugins::DECORATORS,
            "decorators-legacy" => Plugins::DECORATORS_LEGACY,
            "placeholders" => Plugins::PLACEHOLDERS,
            "estree" => Plugins::ESTREE,
            "v8intrinsic" => Plugins::V8INTRINSIC,
            _ => return None,
        })
    }

    /// The plugin name of a single flag.
    pub fn name(self) -> &'static str {
        match self {
            Plugins::JSX => "jsx",
            Plugins::TYPESCRIPT => "typescript",
            Plugins::FLOW => "flow",
            Plugins::DECORATORS => "decorators",
            Plugins::DECORATORS_LEGACY => "decorators-legacy",
            Plugins::PLACEHOLDERS => "placeholders",
            Plugins::ESTREE => "estree",
            Plugins::V8INTRINSIC => "v8intrinsic",
            _ => "unknown",
        }
    }
}

/// One entry of the `plugins` option: a bare name or `[name, options]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PluginEntry {
    Name(String),
    WithOptions(String, Value),
}

impl PluginEntry {
    pub fn name(&self) -> &str {
        match self {
            PluginEntry::Name(name) | PluginEntry::WithOptions(name, _) => name,
        }
    }
}

impl From<&str> for PluginEntry {
    fn from(name: &str) -> Self {
        PluginEntry::Name(name.to_string())
    }
}

impl From<String> for PluginEntry {
    fn from(name: String) -> Self {
        PluginEntry::Name(name)
    }
}

/// Validated plugin selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PluginSet {
    pub plugins: Plugins,
    /// TypeScript declaration file: every statement is ambient.
    pub dts: bool,
}

impl PluginSet {
    #[inline]
    pub fn has(&self, plugin: Plugins) -> bool {
        self.plugins.contains(plugin)
    }

    #[inline]
    pub fn has_decorators(&self) -> bool {
        self.plugins.intersects(Plugins::DECORATORS | Plugins::DECORATORS_LEGACY)
    }
}

/// Options accepted by [`crate::parse`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ParserOptions {
    pub source_type: SourceTypeOption,
    pub plugins: Vec<PluginEntry>,
    /// Keep every token and comment in `File::tokens`.
    pub tokens: bool,
    /// Attach comments to nodes in `File::comment_attachments`.
    pub attach_comment: bool,
    pub allow_return_outside_function: bool,
    pub allow_await_outside_function: bool,
    pub allow_import_export_everywhere: bool,
    pub allow_super_outside_method: bool,
    pub allow_undeclared_exports: bool,
    pub allow_new_target_outside_function: bool,
    /// Collect recoverable errors instead of failing on the first one.
    pub error_recovery: bool,
    pub start_line: u32,
    pub start_column: u32,
    pub source_filename: Option<String>,
    /// Force strict mode on or off. Defaults to strict for modules only.
    pub strict_mode: Option<bool>,
    /// Represent parentheses as `ParenthesizedExpression` nodes instead of
    /// an `extra.parenthesized` flag.
    pub create_parenthesized_expressions: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            source_type: SourceTypeOption::Script,
            plugins: Vec::new(),
            tokens: false,
            attach_comment: true,
            allow_return_outside_function: false,
            allow_await_outside_function: false,
            allow_import_export_everywhere: false,
            allow_super_outside_method: false,
            allow_undeclared_exports: false,
            allow_new_target_outside_function: false,
            error_recovery: false,
            start_line: 1,
            start_column: 0,
            source_filename: None,
            strict_mode: None,
            create_parenthesized_expressions: false,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document in Babel's camelCase spelling.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_source_type(mut self, source_type: SourceTypeOption) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn with_plugin(mut self, entry: impl Into<PluginEntry>) -> Self {
        self.plugins.push(entry.into());
        self
    }

    pub fn with_plugins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PluginEntry>,
    {
        self.plugins.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_tokens(mut self, tokens: bool) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_attach_comment(mut self, attach: bool) -> Self {
        self.attach_comment = attach;
        self
    }

    pub fn with_error_recovery(mut self, recover: bool) -> Self {
        self.error_recovery = recover;
        self
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = Some(strict);
        self
    }

    pub fn with_start_position(mut self, line: u32, column: u32) -> Self {
        self.start_line = line;
        self.start_column = column;
        self
    }

    pub fn with_source_filename(mut self, name: impl Into<String>) -> Self {
        self.source_filename = Some(name.into());
        self
    }

    pub fn with_create_parenthesized_expressions(mut self, create: bool) -> Self {
        self.create_parenthesized_expressions = create;
        self
    }

    /// Validate the plugin list: every name must be known, plugin options
    /// must be understood, and no incompatible pair may be enabled.
    pub fn resolve_plugins(&self) -> Result<PluginSet, ConfigError> {
        let mut set = PluginSet::default();
        for entry in &self.plugins {
            let plugin =
                Plugins::from_plugin_name(entry.name()).ok_or_else(|| ConfigError::UnknownPlugin(entry.name().to_string()))?;
            if let PluginEntry::WithOptions(name, options) = entry {
                apply_plugin_options(&mut set, plugin, name, options)?;
            }
            set.plugins |= plugin;
        }
        for (first, second) in INCOMPATIBLE {
            if set.plugins.contains(first | second) {
                return Err(ConfigError::IncompatiblePlugins {
                    first: first.name(),
                    second: second.name(),
                });
            }
        }
        Ok(set)
    }
}

fn apply_plugin_options(set: &mut PluginSet, plugin: Plugins, name: &str, options: &Value) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidOption {
        plugin: name.to_string(),
        message,
    };
    let Some(object) = options.as_object() else {
        return Err(invalid("plugin options must be an object".to_string()));
    };
    for (key, value) in object {
        match (plugin, key.as_str()) {
            (Plugins::TYPESCRIPT, "dts") => {
                set.dts = value.as_bool().ok_or_else(|| invalid("'dts' must be a boolean".to_string()))?;
            }
            (Plugins::DECORATORS, "decoratorsBeforeExport") => {
                return Err(invalid(
                    "'decoratorsBeforeExport' is not supported; decorators are accepted on either side of 'export'"
                        .to_string(),
                ));
            }
            _ => return Err(invalid(format!("unknown option '{}'", key))),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.source_type, SourceTypeOption::Script);
        assert!(options.attach_comment);
        assert_eq!(options.start_line, 1);
        assert!(options.resolve_plugins().unwrap().plugins.is_empty());
    }

    #[test]
    fn test_from_json_camel_case() {
        let options = ParserOptions::from_json(
            r#"{ "sourceType": "module", "plugins": ["jsx", ["typescript", { "dts": true }]], "errorRecovery": true }"#,
        )
        .unwrap();
        assert_eq!(options.source_type, SourceTypeOption::Module);
        assert!(options.error_recovery);
        let set = options.resolve_plugins().unwrap();
        assert!(set.has(Plugins::JSX | Plugins::TYPESCRIPT));
        assert!(set.dts);
    }

    #[test]
    fn test_plugin_names_are_lowercase() {
        assert_eq!(Plugins::from_plugin_name("jsx"), Some(Plugins::JSX));
        assert_eq!(Plugins::from_plugin_name("decorators-legacy"), Some(Plugins::DECORATORS_LEGACY));
        assert_eq!(Plugins::from_plugin_name("JSX"), None);
        let resolved = ParserOptions::new().with_plugins(["jsx", "v8intrinsic"]).resolve_plugins().unwrap();
        assert!(resolved.plugins.contains(Plugins::JSX | Plugins::V8INTRINSIC));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(matches!(ParserOptions::from_json(r#"{ "sourceKind": "module" }"#), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_incompatible_plugins() {
        let err = ParserOptions::new().with_plugins(["typescript", "flow"]).resolve_plugins().unwrap_err();
        assert!(matches!(err, ConfigError::IncompatiblePlugins { first: "flow", second: "typescript" }));
        let err = ParserOptions::new().with_plugins(["decorators", "decorators-legacy"]).resolve_plugins().unwrap_err();
        assert!(matches!(err, ConfigError::IncompatiblePlugins { .. }));
    }

    #[test]
    fn test_unknown_plugin_and_option() {
        let err = ParserOptions::new().with_plugin("pipelineOperator").resolve_plugins().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlugin(ref name) if name == "pipelineOperator"));
        let options = ParserOptions::from_json(r#"{ "plugins": [["jsx", { "throwIfNamespace": false }]] }"#).unwrap();
        assert!(matches!(options.resolve_plugins(), Err(ConfigError::InvalidOption { .. })));
    }
}
