//! esparse_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every error the scanner or parser can raise is declared once in
//! [`messages`] as a static [`DiagnosticMessage`]. A raised [`Diagnostic`]
//! keeps a reference to its descriptor plus the argument strings, and renders
//! the human-readable text only when asked for it.

use esparse_core::text::Position;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Broad class of an error, which decides how the reporting policy treats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed tokens. No resynchronization point exists mid-token.
    Lexical,
    /// Grammar errors. Recoverable in error-recovery mode.
    Syntax,
    /// Redeclarations, invalid targets, unresolved private names.
    Binding,
    /// A construct requires a plugin that was not enabled.
    Capability,
    /// Raised before parsing starts.
    Configuration,
}

impl ErrorKind {
    /// Lexical and capability errors stop the parse even in recovery mode.
    #[inline]
    pub fn is_always_fatal(self) -> bool {
        matches!(self, ErrorKind::Lexical | ErrorKind::Capability)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical"),
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Binding => write!(f, "binding"),
            ErrorKind::Capability => write!(f, "capability"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}

/// Coarse machine-readable error code shared by many reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SyntaxError,
    /// The construct is valid only when parsing as a module.
    SourceTypeModuleError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::SyntaxError => "ESPARSE_SYNTAX_ERROR",
            ErrorCode::SourceTypeModuleError => "ESPARSE_SOURCETYPE_MODULE_REQUIRED",
        }
    }
}

/// A diagnostic message template with a reason code and kind.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage {
    /// Stable identifier of this error, e.g. `UnexpectedToken`.
    pub reason_code: &'static str,
    pub code: ErrorCode,
    pub kind: ErrorKind,
    /// The message template. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
    /// The plugin whose grammar owns this error, if any.
    pub syntax_plugin: Option<&'static str>,
}

impl PartialEq for DiagnosticMessage {
    fn eq(&self, other: &Self) -> bool {
        self.reason_code == other.reason_code && self.message == other.message
    }
}

impl Eq for DiagnosticMessage {}

/// A raised error: descriptor, arguments and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: &'static DiagnosticMessage,
    pub args: Vec<String>,
    pub loc: Position,
    /// Source file name, when the caller supplied one.
    pub file: Option<String>,
    /// Plugins that would make the construct legal, for capability errors.
    pub missing_plugins: Vec<&'static str>,
}

impl Diagnostic {
    pub fn new(message: &'static DiagnosticMessage, loc: Position, args: &[&str]) -> Self {
        Self {
            message,
            args: args.iter().map(|a| a.to_string()).collect(),
            loc,
            file: None,
            missing_plugins: Vec::new(),
        }
    }

    /// A capability error naming the plugins that would satisfy it.
    pub fn missing_plugins(loc: Position, plugins: &[&'static str]) -> Self {
        let list = plugins
            .iter()
            .map(|p| format!("\"{}\"", p))
            .collect::<Vec<_>>()
            .join(", ");
        let message = if plugins.len() == 1 {
            &messages::MISSING_PLUGIN
        } else {
            &messages::MISSING_ONE_OF_PLUGINS
        };
        let mut diag = Self::new(message, loc, &[&list]);
        diag.missing_plugins = plugins.to_vec();
        diag
    }

    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    #[inline]
    pub fn reason_code(&self) -> &'static str {
        self.message.reason_code
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.message.code
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.message.kind
    }

    /// Render the message text without the location suffix.
    pub fn message_text(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        format_message(self.message.message, &args)
    }

    /// Whether this diagnostic came from the given descriptor.
    #[inline]
    pub fn is(&self, message: &DiagnosticMessage) -> bool {
        self.message == message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}: ", file)?;
        }
        write!(f, "{} ({})", self.message_text(), self.loc)
    }
}

impl std::error::Error for Diagnostic {}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Diagnostic", 7)?;
        state.serialize_field("code", self.code().as_str())?;
        state.serialize_field("reasonCode", self.reason_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("loc", &self.loc)?;
        state.serialize_field("args", &self.args)?;
        state.serialize_field("syntaxPlugin", &self.message.syntax_plugin)?;
        state.serialize_field("missingPlugins", &self.missing_plugins)?;
        state.end()
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($kind:ident, $reason:expr, $msg:expr) => {
            DiagnosticMessage {
                reason_code: $reason,
                code: ErrorCode::SyntaxError,
                kind: ErrorKind::$kind,
                message: $msg,
                syntax_plugin: None,
            }
        };
        ($kind:ident, $reason:expr, $msg:expr, module) => {
            DiagnosticMessage {
                reason_code: $reason,
                code: ErrorCode::SourceTypeModuleError,
                kind: ErrorKind::$kind,
                message: $msg,
                syntax_plugin: None,
            }
        };
        ($kind:ident, $reason:expr, $msg:expr, plugin = $plugin:expr) => {
            DiagnosticMessage {
                reason_code: $reason,
                code: ErrorCode::SyntaxError,
                kind: ErrorKind::$kind,
                message: $msg,
                syntax_plugin: Some($plugin),
            }
        };
    }

    // ========================================================================
    // Tokenizer errors
    // ========================================================================
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(Lexical, "UnterminatedString", "Unterminated string constant.");
    pub const UNTERMINATED_TEMPLATE: DiagnosticMessage = diag!(Lexical, "UnterminatedTemplate", "Unterminated template.");
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(Lexical, "UnterminatedComment", "Unterminated comment.");
    pub const UNTERMINATED_REGEXP: DiagnosticMessage = diag!(Lexical, "UnterminatedRegExp", "Unterminated regular expression.");
    pub const UNTERMINATED_JSX_CONTENT: DiagnosticMessage = diag!(Lexical, "UnterminatedJsxContent", "Unterminated JSX contents.", plugin = "jsx");
    pub const INVALID_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(Syntax, "InvalidEscapeSequence", "Bad character escape sequence.");
    pub const INVALID_ESCAPE_SEQUENCE_TEMPLATE: DiagnosticMessage = diag!(Syntax, "InvalidEscapeSequenceTemplate", "Invalid escape sequence in template.");
    pub const INVALID_CODE_POINT: DiagnosticMessage = diag!(Syntax, "InvalidCodePoint", "Code point out of bounds.");
    pub const INVALID_DIGIT: DiagnosticMessage = diag!(Syntax, "InvalidDigit", "Expected number in radix {0}.");
    pub const INVALID_NUMBER: DiagnosticMessage = diag!(Lexical, "InvalidNumber", "Invalid number.");
    pub const INVALID_OR_MISSING_EXPONENT: DiagnosticMessage = diag!(Syntax, "InvalidOrMissingExponent", "Floating-point numbers require a valid exponent after the 'e'.");
    pub const INVALID_OR_UNEXPECTED_TOKEN: DiagnosticMessage = diag!(Lexical, "InvalidOrUnexpectedToken", "Unexpected character '{0}'.");
    pub const INVALID_BIGINT_LITERAL: DiagnosticMessage = diag!(Syntax, "InvalidBigIntLiteral", "Invalid BigIntLiteral.");
    pub const NUMBER_IDENTIFIER: DiagnosticMessage = diag!(Syntax, "NumberIdentifier", "Identifier directly after number.");
    pub const NUMERIC_SEPARATOR_IN_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(Syntax, "NumericSeparatorInEscapeSequence", "Numeric separators are not allowed inside unicode escape sequences or hex escape sequences.");
    pub const UNEXPECTED_NUMERIC_SEPARATOR: DiagnosticMessage = diag!(Syntax, "UnexpectedNumericSeparator", "A numeric separator is only allowed between two digits.");
    pub const ZERO_DIGIT_NUMERIC_SEPARATOR: DiagnosticMessage = diag!(Syntax, "ZeroDigitNumericSeparator", "Numeric separator can not be used after leading 0.");
    pub const MALFORMED_REGEXP_FLAGS: DiagnosticMessage = diag!(Syntax, "MalformedRegExpFlags", "Invalid regular expression flag.");
    pub const DUPLICATE_REGEXP_FLAGS: DiagnosticMessage = diag!(Syntax, "DuplicateRegExpFlags", "Duplicate regular expression flag.");
    pub const INCOMPATIBLE_REGEXP_UV_FLAGS: DiagnosticMessage = diag!(Syntax, "IncompatibleRegExpUVFlags", "The 'u' and 'v' regular expression flags cannot be enabled at the same time.");
    pub const ESCAPED_CHAR_NOT_AN_IDENTIFIER: DiagnosticMessage = diag!(Syntax, "EscapedCharNotAnIdentifier", "Invalid Unicode escape.");
    pub const MISSING_UNICODE_ESCAPE: DiagnosticMessage = diag!(Syntax, "MissingUnicodeEscape", "Expecting Unicode escape sequence \\uXXXX.");
    pub const UNEXPECTED_DIGIT_AFTER_HASH: DiagnosticMessage = diag!(Lexical, "UnexpectedDigitAfterHash", "Unexpected digit after hash token.");
    pub const STRICT_NUMERIC_ESCAPE: DiagnosticMessage = diag!(Syntax, "StrictNumericEscape", "The only valid numeric escape in strict mode is '\\0'.");
    pub const STRICT_OCTAL_LITERAL: DiagnosticMessage = diag!(Syntax, "StrictOctalLiteral", "Legacy octal literals are not allowed in strict mode.");

    // ========================================================================
    // Grammar errors
    // ========================================================================
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(Syntax, "UnexpectedToken", "Unexpected token.");
    pub const UNEXPECTED_TOKEN_EXPECTED: DiagnosticMessage = diag!(Syntax, "UnexpectedToken", "Unexpected token, expected \"{0}\".");
    pub const MISSING_SEMICOLON: DiagnosticMessage = diag!(Syntax, "MissingSemicolon", "Missing semicolon.");
    pub const UNEXPECTED_KEYWORD: DiagnosticMessage = diag!(Syntax, "UnexpectedKeyword", "Unexpected keyword '{0}'.");
    pub const UNEXPECTED_RESERVED_WORD: DiagnosticMessage = diag!(Syntax, "UnexpectedReservedWord", "Unexpected reserved word '{0}'.");
    pub const INVALID_ESCAPED_RESERVED_WORD: DiagnosticMessage = diag!(Syntax, "InvalidEscapedReservedWord", "Escape sequence in keyword {0}.");
    pub const UNEXPECTED_TOKEN_UNARY_EXPONENTIATION: DiagnosticMessage = diag!(Syntax, "UnexpectedTokenUnaryExponentiation", "Illegal expression. Wrap left hand side or entire exponentiation in parentheses.");
    pub const MIXING_COALESCE_WITH_LOGICAL: DiagnosticMessage = diag!(Syntax, "MixingCoalesceWithLogical", "Nullish coalescing operator(??) requires parens when mixing with logical operators.");
    pub const LINE_TERMINATOR_BEFORE_ARROW: DiagnosticMessage = diag!(Syntax, "LineTerminatorBeforeArrow", "No line break is allowed before '=>'.");
    pub const RECURSION_LIMIT: DiagnosticMessage = diag!(Lexical, "RecursionLimit", "Maximum nesting depth exceeded.");

    // Assignment targets and patterns
    pub const INVALID_LHS: DiagnosticMessage = diag!(Syntax, "InvalidLhs", "Invalid left-hand side in {0}.");
    pub const INVALID_LHS_BINDING: DiagnosticMessage = diag!(Syntax, "InvalidLhsBinding", "Binding invalid left-hand side in {0}.");
    pub const INVALID_PARENTHESIZED_ASSIGNMENT: DiagnosticMessage = diag!(Syntax, "InvalidParenthesizedAssignment", "Invalid parenthesized assignment pattern.");
    pub const INVALID_COVER_INITIALIZED_NAME: DiagnosticMessage = diag!(Syntax, "InvalidCoverInitializedName", "Invalid shorthand property initializer.");
    pub const DUPLICATE_PROTO: DiagnosticMessage = diag!(Syntax, "DuplicateProto", "Redefinition of __proto__ property.");
    pub const INVALID_REST_ASSIGNMENT_PATTERN: DiagnosticMessage = diag!(Syntax, "InvalidRestAssignmentPattern", "Invalid rest operator's argument.");
    pub const REST_TRAILING_COMMA: DiagnosticMessage = diag!(Syntax, "RestTrailingComma", "Unexpected trailing comma after rest element.");
    pub const ELEMENT_AFTER_REST: DiagnosticMessage = diag!(Syntax, "ElementAfterRest", "Rest element must be last element.");
    pub const MISSING_EQ_IN_ASSIGNMENT: DiagnosticMessage = diag!(Syntax, "MissingEqInAssignment", "Only '=' operator can be used for specifying default value.");
    pub const PATTERN_HAS_ACCESSOR: DiagnosticMessage = diag!(Syntax, "PatternHasAccessor", "Object pattern can't contain getter or setter.");
    pub const PATTERN_HAS_METHOD: DiagnosticMessage = diag!(Syntax, "PatternHasMethod", "Object pattern can't contain methods.");
    pub const INVALID_PROPERTY_BINDING_PATTERN: DiagnosticMessage = diag!(Syntax, "InvalidPropertyBindingPattern", "Binding member expression.");
    pub const PARAM_DUPE: DiagnosticMessage = diag!(Binding, "ParamDupe", "Argument name clash.");

    // Private names
    pub const UNEXPECTED_PRIVATE_FIELD: DiagnosticMessage = diag!(Syntax, "UnexpectedPrivateField", "Unexpected private name.");
    pub const PRIVATE_IN_EXPECTED_IN: DiagnosticMessage = diag!(Syntax, "PrivateInExpectedIn", "Private names are only allowed in property accesses (`obj.#{0}`) or in `in` expressions (`#{0} in obj`).");
    pub const DELETE_PRIVATE_FIELD: DiagnosticMessage = diag!(Syntax, "DeletePrivateField", "Deleting a private field is not allowed.");
    pub const SUPER_PRIVATE_FIELD: DiagnosticMessage = diag!(Syntax, "SuperPrivateField", "Private fields can't be accessed on super.");
    pub const INVALID_PRIVATE_FIELD_RESOLUTION: DiagnosticMessage = diag!(Binding, "InvalidPrivateFieldResolution", "Private name #{0} is not defined.");
    pub const PRIVATE_NAME_REDECLARATION: DiagnosticMessage = diag!(Binding, "PrivateNameRedeclaration", "Duplicate private name #{0}.");

    // Strict mode
    pub const STRICT_DELETE: DiagnosticMessage = diag!(Syntax, "StrictDelete", "Deleting local variable in strict mode.");
    pub const STRICT_EVAL_ARGUMENTS: DiagnosticMessage = diag!(Binding, "StrictEvalArguments", "Assigning to '{0}' in strict mode.");
    pub const STRICT_EVAL_ARGUMENTS_BINDING: DiagnosticMessage = diag!(Binding, "StrictEvalArgumentsBinding", "Binding '{0}' in strict mode.");
    pub const STRICT_WITH: DiagnosticMessage = diag!(Syntax, "StrictWith", "'with' in strict mode.");
    pub const STRICT_FUNCTION: DiagnosticMessage = diag!(Syntax, "StrictFunction", "In strict mode code, functions can only be declared at top level or inside a block.");
    pub const SLOPPY_FUNCTION: DiagnosticMessage = diag!(Syntax, "SloppyFunction", "In non-strict mode code, functions can only be declared at top level or inside a block.");
    pub const SLOPPY_FUNCTION_ANNEX_B: DiagnosticMessage = diag!(Syntax, "SloppyFunctionAnnexB", "In non-strict mode code, functions can only be declared at top level, inside a block, or as the body of an if statement.");
    pub const ILLEGAL_LANGUAGE_MODE_DIRECTIVE: DiagnosticMessage = diag!(Syntax, "IllegalLanguageModeDirective", "Illegal 'use strict' directive in function with non-simple parameter list.");

    // Statements
    pub const ASYNC_FUNCTION_IN_SINGLE_STATEMENT_CONTEXT: DiagnosticMessage = diag!(Syntax, "AsyncFunctionInSingleStatementContext", "Async functions can only be declared at the top level or inside a block.");
    pub const GENERATOR_IN_SINGLE_STATEMENT_CONTEXT: DiagnosticMessage = diag!(Syntax, "GeneratorInSingleStatementContext", "Generators can only be declared at the top level or inside a block.");
    pub const UNEXPECTED_LEXICAL_DECLARATION: DiagnosticMessage = diag!(Syntax, "UnexpectedLexicalDeclaration", "Lexical declaration cannot appear in a single-statement context.");
    pub const ILLEGAL_RETURN: DiagnosticMessage = diag!(Syntax, "IllegalReturn", "'return' outside of function.");
    pub const ILLEGAL_BREAK_CONTINUE: DiagnosticMessage = diag!(Syntax, "IllegalBreakContinue", "Unsyntactic {0}.");
    pub const LABEL_REDECLARATION: DiagnosticMessage = diag!(Syntax, "LabelRedeclaration", "Label '{0}' is already declared.");
    pub const MULTIPLE_DEFAULTS_IN_SWITCH: DiagnosticMessage = diag!(Syntax, "MultipleDefaultsInSwitch", "Multiple default clauses.");
    pub const NO_CATCH_OR_FINALLY: DiagnosticMessage = diag!(Syntax, "NoCatchOrFinally", "Missing catch or finally clause.");
    pub const NEWLINE_AFTER_THROW: DiagnosticMessage = diag!(Syntax, "NewlineAfterThrow", "Illegal newline after throw.");
    pub const DECLARATION_MISSING_INITIALIZER: DiagnosticMessage = diag!(Syntax, "DeclarationMissingInitializer", "Missing initializer in {0} declaration.");
    pub const FOR_IN_OF_LOOP_INITIALIZER: DiagnosticMessage = diag!(Syntax, "ForInOfLoopInitializer", "'{0}' loop variable declaration may not have an initializer.");
    pub const INVALID_FOR_IN_OF_DECLARATION_COUNT: DiagnosticMessage = diag!(Syntax, "ForInOfLoopInitializer", "Only a single variable declaration is allowed in a '{0}' statement.");
    pub const FOR_OF_LET: DiagnosticMessage = diag!(Syntax, "ForOfLet", "The left-hand side of a for-of loop may not start with 'let'.");
    pub const FOR_OF_ASYNC: DiagnosticMessage = diag!(Syntax, "ForOfAsync", "The left-hand side of a for-of loop may not be 'async'.");
    pub const LET_IN_LEXICAL_BINDING: DiagnosticMessage = diag!(Syntax, "LetInLexicalBinding", "'let' is not allowed to be used as a name in 'let' or 'const' declarations.");
    pub const VAR_REDECLARATION: DiagnosticMessage = diag!(Binding, "VarRedeclaration", "Identifier '{0}' has already been declared.");

    // Functions, await and yield
    pub const AWAIT_BINDING_IDENTIFIER: DiagnosticMessage = diag!(Syntax, "AwaitBindingIdentifier", "Can not use 'await' as identifier inside an async function.");
    pub const AWAIT_BINDING_IDENTIFIER_IN_STATIC_BLOCK: DiagnosticMessage = diag!(Syntax, "AwaitBindingIdentifierInStaticBlock", "Can not use 'await' as identifier inside a static block.");
    pub const AWAIT_EXPRESSION_FORMAL_PARAMETER: DiagnosticMessage = diag!(Syntax, "AwaitExpressionFormalParameter", "'await' is not allowed in async function parameters.");
    pub const AWAIT_NOT_IN_ASYNC_CONTEXT: DiagnosticMessage = diag!(Syntax, "AwaitNotInAsyncContext", "'await' is only allowed within async functions and at the top levels of modules.");
    pub const AWAIT_NOT_IN_ASYNC_FUNCTION: DiagnosticMessage = diag!(Syntax, "AwaitNotInAsyncFunction", "'await' is only allowed within async functions.");
    pub const YIELD_BINDING_IDENTIFIER: DiagnosticMessage = diag!(Syntax, "YieldBindingIdentifier", "Can not use 'yield' as identifier inside a generator.");
    pub const YIELD_IN_PARAMETER: DiagnosticMessage = diag!(Syntax, "YieldInParameter", "Yield expression is not allowed in formal parameters.");
    pub const ARGUMENTS_IN_CLASS: DiagnosticMessage = diag!(Syntax, "ArgumentsInClass", "'arguments' is only allowed in functions and class methods.");
    pub const BAD_GETTER_ARITY: DiagnosticMessage = diag!(Syntax, "BadGetterArity", "A 'get' accessor must not have any formal parameters.");
    pub const BAD_SETTER_ARITY: DiagnosticMessage = diag!(Syntax, "BadSetterArity", "A 'set' accessor must have exactly one formal parameter.");
    pub const BAD_SETTER_REST_PARAMETER: DiagnosticMessage = diag!(Syntax, "BadSetterRestParameter", "A 'set' accessor function argument must not be a rest parameter.");
    pub const ACCESSOR_IS_GENERATOR: DiagnosticMessage = diag!(Syntax, "AccessorIsGenerator", "A {0}ter cannot be a generator.");

    // super, new.target, import
    pub const UNSUPPORTED_SUPER: DiagnosticMessage = diag!(Syntax, "UnsupportedSuper", "'super' can only be used with function calls (i.e. super()) or in property accesses (i.e. super.prop or super[prop]).");
    pub const SUPER_NOT_ALLOWED: DiagnosticMessage = diag!(Syntax, "SuperNotAllowed", "`super()` is only valid inside a class constructor of a subclass. Maybe a typo in the method name ('constructor') or not extending another class?");
    pub const UNEXPECTED_SUPER: DiagnosticMessage = diag!(Syntax, "UnexpectedSuper", "'super' is only allowed in object methods and classes.");
    pub const UNEXPECTED_NEW_TARGET: DiagnosticMessage = diag!(Syntax, "UnexpectedNewTarget", "`new.target` can only be used in functions or class properties.");
    pub const UNSUPPORTED_META_PROPERTY: DiagnosticMessage = diag!(Syntax, "UnsupportedMetaProperty", "The only valid meta property for {0} is {0}.{1}.");
    pub const IMPORT_META_OUTSIDE_MODULE: DiagnosticMessage = diag!(Syntax, "ImportMetaOutsideModule", "import.meta may appear only with 'sourceType: \"module\"'", module);
    pub const IMPORT_OUTSIDE_MODULE: DiagnosticMessage = diag!(Syntax, "ImportOutsideModule", "'import' and 'export' may appear only with 'sourceType: \"module\"'", module);
    pub const UNEXPECTED_IMPORT_EXPORT: DiagnosticMessage = diag!(Syntax, "UnexpectedImportExport", "'import' and 'export' may only appear at the top level.");
    pub const UNSUPPORTED_IMPORT: DiagnosticMessage = diag!(Syntax, "UnsupportedImport", "`import` can only be used in `import()` or `import.meta`.");
    pub const IMPORT_CALL_ARITY: DiagnosticMessage = diag!(Syntax, "ImportCallArity", "`import()` requires exactly one or two arguments.");
    pub const IMPORT_CALL_SPREAD_ARGUMENT: DiagnosticMessage = diag!(Syntax, "ImportCallSpreadArgument", "`...` is not allowed in `import()`.");
    pub const IMPORT_CALL_NOT_NEW_EXPRESSION: DiagnosticMessage = diag!(Syntax, "ImportCallNotNewExpression", "Cannot use new with import(...).");
    pub const OPTIONAL_CHAINING_NO_NEW: DiagnosticMessage = diag!(Syntax, "OptionalChainingNoNew", "Constructors in/after an Optional Chain are not allowed.");
    pub const OPTIONAL_CHAINING_NO_TEMPLATE: DiagnosticMessage = diag!(Syntax, "OptionalChainingNoTemplate", "Tagged Template Literals are not allowed in optionalChain.");

    // Classes
    pub const DUPLICATE_CONSTRUCTOR: DiagnosticMessage = diag!(Syntax, "DuplicateConstructor", "Duplicate constructor in the same class.");
    pub const CONSTRUCTOR_IS_ACCESSOR: DiagnosticMessage = diag!(Syntax, "ConstructorIsAccessor", "Class constructor may not be an accessor.");
    pub const CONSTRUCTOR_IS_ASYNC: DiagnosticMessage = diag!(Syntax, "ConstructorIsAsync", "Constructor can't be an async function.");
    pub const CONSTRUCTOR_IS_GENERATOR: DiagnosticMessage = diag!(Syntax, "ConstructorIsGenerator", "Constructor can't be a generator.");
    pub const CONSTRUCTOR_CLASS_FIELD: DiagnosticMessage = diag!(Syntax, "ConstructorClassField", "Classes may not have a field named 'constructor'.");
    pub const CONSTRUCTOR_CLASS_PRIVATE_FIELD: DiagnosticMessage = diag!(Syntax, "ConstructorClassPrivateField", "Classes may not have a private field named '#constructor'.");
    pub const STATIC_PROTOTYPE: DiagnosticMessage = diag!(Syntax, "StaticPrototype", "Classes may not have static property named prototype.");
    pub const CLASS_NAME_IS_REQUIRED: DiagnosticMessage = diag!(Syntax, "ClassNameIsRequired", "A class name is required.");

    // Decorators
    pub const DECORATORS_BEFORE_AFTER_EXPORT: DiagnosticMessage = diag!(Syntax, "DecoratorsBeforeAfterExport", "Decorators can be placed *either* before or after the 'export' keyword, but not in both locations at the same time.");
    pub const UNEXPECTED_LEADING_DECORATOR: DiagnosticMessage = diag!(Syntax, "UnexpectedLeadingDecorator", "Leading decorators must be attached to a class declaration.");
    pub const DECORATOR_CONSTRUCTOR: DiagnosticMessage = diag!(Syntax, "DecoratorConstructor", "Decorators can't be used with a constructor. Did you mean '@dec class { ... }'?");
    pub const DECORATOR_STATIC_BLOCK: DiagnosticMessage = diag!(Syntax, "DecoratorStaticBlock", "Decorators can't be used with a static block.");
    pub const TRAILING_DECORATOR: DiagnosticMessage = diag!(Syntax, "TrailingDecorator", "Decorators must be attached to a class element.");
    pub const UNSUPPORTED_PROPERTY_DECORATOR: DiagnosticMessage = diag!(Syntax, "UnsupportedPropertyDecorator", "Decorators cannot be used to decorate object literal properties.");
    pub const UNSUPPORTED_PARAMETER_DECORATOR: DiagnosticMessage = diag!(Syntax, "UnsupportedParameterDecorator", "Decorators cannot be used to decorate parameters.");

    // Modules
    pub const MODULE_EXPORT_UNDEFINED: DiagnosticMessage = diag!(Binding, "ModuleExportUndefined", "Export '{0}' is not defined.");
    pub const DUPLICATE_EXPORT: DiagnosticMessage = diag!(Binding, "DuplicateExport", "`{0}` has already been exported. Exported identifiers must be unique.");
    pub const DUPLICATE_DEFAULT_EXPORT: DiagnosticMessage = diag!(Binding, "DuplicateDefaultExport", "Only one default export allowed per module.");
    pub const EXPORT_BINDING_IS_STRING: DiagnosticMessage = diag!(Syntax, "ExportBindingIsString", "A string literal cannot be used as an exported binding without `from`.\n- Did you mean `export { '{0}' as '{1}' } from 'some-module'`?");
    pub const IMPORT_BINDING_IS_STRING: DiagnosticMessage = diag!(Syntax, "ImportBindingIsString", "A string literal cannot be used as an imported binding.\n- Did you mean `import { \"{0}\" as foo }`?");

    // Capabilities
    pub const MISSING_PLUGIN: DiagnosticMessage = diag!(Capability, "MissingPlugin", "This experimental syntax requires enabling the parser plugin: {0}.");
    pub const MISSING_ONE_OF_PLUGINS: DiagnosticMessage = diag!(Capability, "MissingOneOfPlugins", "This experimental syntax requires enabling one of the following parser plugin(s): {0}.");

    // ========================================================================
    // JSX
    // ========================================================================
    pub const JSX_ATTRIBUTE_IS_EMPTY: DiagnosticMessage = diag!(Syntax, "AttributeIsEmpty", "JSX attributes must only be assigned a non-empty expression.", plugin = "jsx");
    pub const JSX_MISSING_CLOSING_TAG_ELEMENT: DiagnosticMessage = diag!(Syntax, "MissingClosingTagElement", "Expected corresponding JSX closing tag for <{0}>.", plugin = "jsx");
    pub const JSX_MISSING_CLOSING_TAG_FRAGMENT: DiagnosticMessage = diag!(Syntax, "MissingClosingTagFragment", "Expected corresponding JSX closing tag for <>.", plugin = "jsx");
    pub const JSX_UNSUPPORTED_VALUE: DiagnosticMessage = diag!(Syntax, "UnsupportedJsxValue", "JSX value should be either an expression or a quoted JSX text.", plugin = "jsx");
    pub const JSX_UNEXPECTED_TOKEN: DiagnosticMessage = diag!(Syntax, "UnexpectedToken", "Unexpected token `{0}`. Did you mean `{1}`?", plugin = "jsx");
    pub const JSX_UNEXPECTED_SEQUENCE_EXPRESSION: DiagnosticMessage = diag!(Syntax, "UnexpectedSequenceExpression", "Sequence expressions cannot be directly nested inside JSX. Did you mean to wrap it in parentheses (...)?", plugin = "jsx");
    pub const JSX_UNWRAPPED_ADJACENT_ELEMENTS: DiagnosticMessage = diag!(Syntax, "UnwrappedAdjacentJSXElements", "Adjacent JSX elements must be wrapped in an enclosing tag. Did you want a JSX fragment <>...</>?", plugin = "jsx");

    // ========================================================================
    // TypeScript
    // ========================================================================
    pub const TS_ABSTRACT_METHOD_HAS_IMPLEMENTATION: DiagnosticMessage = diag!(Syntax, "AbstractMethodHasImplementation", "Method '{0}' cannot have an implementation because it is marked abstract.", plugin = "typescript");
    pub const TS_ABSTRACT_PROPERTY_HAS_INITIALIZER: DiagnosticMessage = diag!(Syntax, "AbstractPropertyHasInitializer", "Property '{0}' cannot have an initializer because it is marked abstract.", plugin = "typescript");
    pub const TS_CLASS_METHOD_HAS_DECLARE: DiagnosticMessage = diag!(Syntax, "ClassMethodHasDeclare", "Class methods cannot have the 'declare' modifier.", plugin = "typescript");
    pub const TS_CONSTRUCTOR_HAS_TYPE_PARAMETERS: DiagnosticMessage = diag!(Syntax, "ConstructorHasTypeParameters", "Type parameters cannot appear on a constructor declaration.", plugin = "typescript");
    pub const TS_DECLARE_FUNCTION_HAS_IMPLEMENTATION: DiagnosticMessage = diag!(Syntax, "DeclareFunctionHasImplementation", "An implementation cannot be declared in ambient contexts.", plugin = "typescript");
    pub const TS_DUPLICATE_ACCESSIBILITY_MODIFIER: DiagnosticMessage = diag!(Syntax, "DuplicateAccessibilityModifier", "Accessibility modifier already seen.", plugin = "typescript");
    pub const TS_DUPLICATE_MODIFIER: DiagnosticMessage = diag!(Syntax, "DuplicateModifier", "Duplicate modifier: '{0}'.", plugin = "typescript");
    pub const TS_EMPTY_HERITAGE_CLAUSE_TYPE: DiagnosticMessage = diag!(Syntax, "EmptyHeritageClauseType", "'{0}' list cannot be empty.", plugin = "typescript");
    pub const TS_EMPTY_TYPE_ARGUMENTS: DiagnosticMessage = diag!(Syntax, "EmptyTypeArguments", "Type argument list cannot be empty.", plugin = "typescript");
    pub const TS_EMPTY_TYPE_PARAMETERS: DiagnosticMessage = diag!(Syntax, "EmptyTypeParameters", "Type parameter list cannot be empty.", plugin = "typescript");
    pub const TS_INCOMPATIBLE_MODIFIERS: DiagnosticMessage = diag!(Syntax, "IncompatibleModifiers", "'{0}' modifier cannot be used with '{1}' modifier.", plugin = "typescript");
    pub const TS_INITIALIZER_NOT_ALLOWED_IN_AMBIENT_CONTEXT: DiagnosticMessage = diag!(Syntax, "InitializerNotAllowedInAmbientContext", "Initializers are not allowed in ambient contexts.", plugin = "typescript");
    pub const TS_INVALID_MODIFIER_ON_TYPE_MEMBER: DiagnosticMessage = diag!(Syntax, "InvalidModifierOnTypeMember", "'{0}' modifier cannot appear on a type member.", plugin = "typescript");
    pub const TS_INVALID_MODIFIERS_ORDER: DiagnosticMessage = diag!(Syntax, "InvalidModifiersOrder", "'{0}' modifier must precede '{1}' modifier.", plugin = "typescript");
    pub const TS_MISSING_INTERFACE_NAME: DiagnosticMessage = diag!(Syntax, "MissingInterfaceName", "'interface' declarations must be followed by an identifier.", plugin = "typescript");
    pub const TS_NON_ABSTRACT_CLASS_HAS_ABSTRACT_METHOD: DiagnosticMessage = diag!(Syntax, "NonAbstractClassHasAbstractMethod", "Abstract methods can only appear within an abstract class.", plugin = "typescript");
    pub const TS_OPTIONAL_TYPE_BEFORE_REQUIRED: DiagnosticMessage = diag!(Syntax, "OptionalTypeBeforeRequired", "A required element cannot follow an optional element.", plugin = "typescript");
    pub const TS_PATTERN_IS_OPTIONAL: DiagnosticMessage = diag!(Syntax, "PatternIsOptional", "A binding pattern parameter cannot be optional in an implementation signature.", plugin = "typescript");
    pub const TS_PRIVATE_ELEMENT_HAS_ACCESSIBILITY: DiagnosticMessage = diag!(Syntax, "PrivateElementHasAccessibility", "Private elements cannot have an accessibility modifier ('{0}').", plugin = "typescript");
    pub const TS_READONLY_FOR_METHOD_SIGNATURE: DiagnosticMessage = diag!(Syntax, "ReadonlyForMethodSignature", "'readonly' modifier can only appear on a property declaration or index signature.", plugin = "typescript");
    pub const TS_STATIC_BLOCK_CANNOT_HAVE_MODIFIER: DiagnosticMessage = diag!(Syntax, "StaticBlockCannotHaveModifier", "Static class blocks cannot have any modifier.", plugin = "typescript");
    pub const TS_TYPE_ANNOTATION_AFTER_ASSIGN: DiagnosticMessage = diag!(Syntax, "TypeAnnotationAfterAssign", "Type annotations must come before default assignments, e.g. instead of `age = 25: number` use `age: number = 25`.", plugin = "typescript");
    pub const TS_TYPE_IMPORT_CANNOT_SPECIFY_DEFAULT_AND_NAMED: DiagnosticMessage = diag!(Syntax, "TypeImportCannotSpecifyDefaultAndNamed", "A type-only import can specify a default import or named bindings, but not both.", plugin = "typescript");
    pub const TS_UNEXPECTED_PARAMETER_MODIFIER: DiagnosticMessage = diag!(Syntax, "UnexpectedParameterModifier", "A parameter property is only allowed in a constructor implementation.", plugin = "typescript");
    pub const TS_UNEXPECTED_READONLY: DiagnosticMessage = diag!(Syntax, "UnexpectedReadonly", "'readonly' type modifier is only permitted on array and tuple literal types.", plugin = "typescript");
    pub const TS_UNEXPECTED_TYPE_ANNOTATION: DiagnosticMessage = diag!(Syntax, "UnexpectedTypeAnnotation", "Did not expect a type annotation here.", plugin = "typescript");
    pub const TS_UNEXPECTED_TYPE_CAST_IN_PARAMETER: DiagnosticMessage = diag!(Syntax, "UnexpectedTypeCastInParameter", "Unexpected type cast in parameter position.", plugin = "typescript");
    pub const TS_UNSUPPORTED_PARAMETER_PROPERTY_KIND: DiagnosticMessage = diag!(Syntax, "UnsupportedParameterPropertyKind", "A parameter property may not be declared using a binding pattern.", plugin = "typescript");

    // ========================================================================
    // Flow
    // ========================================================================
    pub const FLOW_ASSIGN_RESERVED_TYPE: DiagnosticMessage = diag!(Syntax, "AssignReservedType", "Cannot overwrite reserved type {0}.", plugin = "flow");
    pub const FLOW_EXPLICIT_INEXACT_NOT_LAST: DiagnosticMessage = diag!(Syntax, "UnexpectedExplicitInexactInObject", "Explicit inexact syntax must appear at the end of an inexact object.", plugin = "flow");
    pub const FLOW_INEXACT_INSIDE_EXACT: DiagnosticMessage = diag!(Syntax, "InexactInsideExact", "Explicit inexact syntax cannot appear inside an explicit exact object type.", plugin = "flow");
    pub const FLOW_OPTIONAL_BINDING_PATTERN: DiagnosticMessage = diag!(Syntax, "OptionalBindingPattern", "A binding pattern parameter cannot be optional in an implementation signature.", plugin = "flow");
    pub const FLOW_TYPE_CAST_IN_PATTERN: DiagnosticMessage = diag!(Syntax, "TypeCastInPattern", "The type cast expression is expected to be wrapped with parenthesis.", plugin = "flow");
    pub const FLOW_UNEXPECTED_RESERVED_TYPE: DiagnosticMessage = diag!(Syntax, "UnexpectedReservedType", "Unexpected reserved type {0}.", plugin = "flow");

    // ========================================================================
    // Placeholders
    // ========================================================================
    pub const PLACEHOLDER_UNEXPECTED_SPACE: DiagnosticMessage = diag!(Syntax, "UnexpectedSpace", "Unexpected space in placeholder.", plugin = "placeholders");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32, column: u32, index: u32) -> Position {
        Position::new(line, column, index)
    }

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("Unexpected keyword '{0}'.", &["if"]), "Unexpected keyword 'if'.");
        assert_eq!(
            format_message("The only valid meta property for {0} is {0}.{1}.", &["new", "target"]),
            "The only valid meta property for new is new.target."
        );
    }

    #[test]
    fn test_display_includes_location_and_file() {
        let diag = Diagnostic::new(&messages::VAR_REDECLARATION, at(2, 4, 15), &["x"]);
        assert_eq!(diag.to_string(), "Identifier 'x' has already been declared. (2:4)");
        let diag = diag.with_file(Some("input.js".to_string()));
        assert_eq!(diag.to_string(), "input.js: Identifier 'x' has already been declared. (2:4)");
        assert_eq!(diag.reason_code(), "VarRedeclaration");
        assert_eq!(diag.kind(), ErrorKind::Binding);
    }

    #[test]
    fn test_missing_plugins_lists_every_candidate() {
        let single = Diagnostic::missing_plugins(at(1, 0, 0), &["jsx"]);
        assert!(single.is(&messages::MISSING_PLUGIN));
        assert_eq!(single.message_text(), "This experimental syntax requires enabling the parser plugin: \"jsx\".");

        let many = Diagnostic::missing_plugins(at(1, 0, 0), &["jsx", "flow", "typescript"]);
        assert!(many.is(&messages::MISSING_ONE_OF_PLUGINS));
        assert_eq!(many.missing_plugins, vec!["jsx", "flow", "typescript"]);
        assert!(many.message_text().ends_with("\"jsx\", \"flow\", \"typescript\"."));
        assert!(many.kind().is_always_fatal());
    }

    #[test]
    fn test_module_errors_carry_module_code() {
        let diag = Diagnostic::new(&messages::IMPORT_OUTSIDE_MODULE, at(1, 0, 0), &[]);
        assert_eq!(diag.code(), ErrorCode::SourceTypeModuleError);
        assert_eq!(diag.code().as_str(), "ESPARSE_SOURCETYPE_MODULE_REQUIRED");
    }

    #[test]
    fn test_serialize_shape() {
        let diag = Diagnostic::new(&messages::JSX_MISSING_CLOSING_TAG_ELEMENT, at(1, 5, 5), &["div"]);
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["reasonCode"], "MissingClosingTagElement");
        assert_eq!(json["code"], "ESPARSE_SYNTAX_ERROR");
        assert_eq!(json["syntaxPlugin"], "jsx");
        assert_eq!(json["loc"]["column"], 5);
        assert_eq!(json["message"], "Expected corresponding JSX closing tag for <div>. (1:5)");
    }
}
