//! Node and field kinds for the JavaScript syntax arena.
//!
//! tree-sitter names node kinds and fields with strings. The arena maps the
//! handful the AMD transform inspects onto closed enums so classification is a
//! `match`, not string comparison. Every other kind collapses to `Unknown`.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown = 0,
    Program,
    ExpressionStatement,
    StatementBlock,
    ReturnStatement,
    EmptyStatement,
    CallExpression,
    Arguments,
    Identifier,
    ArrayExpression,
    StringLiteral,
    ParenthesizedExpression,
    FunctionExpression,
    FunctionDeclaration,
    GeneratorFunction,
    GeneratorFunctionDeclaration,
    ArrowFunction,
    MethodDefinition,
    FormalParameters,
    AssignmentPattern,
    RestPattern,
    SpreadElement,
    Comment,
}

impl SyntaxKind {
    /// Map a tree-sitter-javascript node kind onto the arena kind.
    pub fn from_grammar(kind: &str) -> SyntaxKind {
        match kind {
            "program" => SyntaxKind::Program,
            "expression_statement" => SyntaxKind::ExpressionStatement,
            "statement_block" => SyntaxKind::StatementBlock,
            "return_statement" => SyntaxKind::ReturnStatement,
            "empty_statement" => SyntaxKind::EmptyStatement,
            "call_expression" => SyntaxKind::CallExpression,
            "arguments" => SyntaxKind::Arguments,
            "identifier" => SyntaxKind::Identifier,
            "array" => SyntaxKind::ArrayExpression,
            "string" => SyntaxKind::StringLiteral,
            "parenthesized_expression" => SyntaxKind::ParenthesizedExpression,
            // Older grammar releases call function expressions plain `function`.
            "function_expression" | "function" => SyntaxKind::FunctionExpression,
            "function_declaration" => SyntaxKind::FunctionDeclaration,
            "generator_function" => SyntaxKind::GeneratorFunction,
            "generator_function_declaration" => SyntaxKind::GeneratorFunctionDeclaration,
            "arrow_function" => SyntaxKind::ArrowFunction,
            "method_definition" => SyntaxKind::MethodDefinition,
            "formal_parameters" => SyntaxKind::FormalParameters,
            "assignment_pattern" => SyntaxKind::AssignmentPattern,
            "rest_pattern" => SyntaxKind::RestPattern,
            "spread_element" => SyntaxKind::SpreadElement,
            "comment" | "html_comment" => SyntaxKind::Comment,
            _ => SyntaxKind::Unknown,
        }
    }

    /// Anything that opens a new function body (and therefore a new `return` target).
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionExpression
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::GeneratorFunction
                | SyntaxKind::GeneratorFunctionDeclaration
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDefinition
        )
    }

    /// Function shapes accepted as the factory argument of `define`/`require`.
    pub const fn is_factory_function(self) -> bool {
        matches!(self, SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction)
    }

    pub const fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::Comment)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Field role a node plays under its parent (tree-sitter field names).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldName {
    Function,
    Arguments,
    Parameters,
    Parameter,
    Body,
    Left,
    Right,
    Name,
}

impl FieldName {
    pub fn from_grammar(field: &str) -> Option<FieldName> {
        match field {
            "function" => Some(FieldName::Function),
            "arguments" => Some(FieldName::Arguments),
            "parameters" => Some(FieldName::Parameters),
            "parameter" => Some(FieldName::Parameter),
            "body" => Some(FieldName::Body),
            "left" => Some(FieldName::Left),
            "right" => Some(FieldName::Right),
            "name" => Some(FieldName::Name),
            _ => None,
        }
    }
}
