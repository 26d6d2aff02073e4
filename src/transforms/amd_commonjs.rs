//! AMD to CommonJS Module Transform
//!
//! Rewrites AMD module wrappers into CommonJS modules:
//!
//! ```javascript
//! define(["lib/a", "lib/b"], function (a) {
//!     "use strict";
//!     return a.value;
//! });
//! ```
//!
//! Becomes:
//!
//! ```javascript
//! (function () {"use strict";
//! var a = require("lib/a");
//! require("lib/b");
//! module.exports = a.value;}());
//! ```
//!
//! Each module keeps its own function scope, so several rewritten modules can
//! be concatenated into one file without their `var`s colliding.
//!
//! `define` is only recognized outside every function; `require` wrappers
//! are recognized at any depth. Only a `define` factory's own `return`
//! statements become `module.exports` assignments.

use rustc_hash::FxHashMap;
use tracing::{debug, debug_span, trace};

use crate::error::{Result, TransformError};
use crate::parser::{
    FieldName, NodeArena, NodeIndex, NodeList, SyntaxKind, SyntaxTree, TextEdits, TextRange,
    node_flags, parse_source,
};

/// Which AMD entry point a call site uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AmdCallKind {
    Define,
    Require,
}

impl AmdCallKind {
    pub const fn callee_name(self) -> &'static str {
        match self {
            AmdCallKind::Define => "define",
            AmdCallKind::Require => "require",
        }
    }
}

/// A call site whose arguments match a recognized AMD shape.
#[derive(Clone, Debug, PartialEq, Eq)]
struct AmdCall {
    kind: AmdCallKind,
    factory: NodeIndex,
    dependencies: NodeList,
}

/// Counters for a single transform call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// `define`/`require` wrappers replaced by an IIFE.
    pub call_sites_rewritten: usize,
    /// `return` statements turned into `module.exports` assignments.
    pub exports_rewritten: usize,
    /// `define`/`require` calls left alone because their arguments did not
    /// match an AMD shape (e.g. a CommonJS `require("x")`).
    pub call_sites_skipped: usize,
}

/// Rewrite every AMD wrapper in `source`.
///
/// Text outside rewritten spans is preserved byte-for-byte; input without AMD
/// wrappers is returned unchanged.
pub fn transform(source: &str) -> Result<String> {
    AmdTransformer::new().transform(source)
}

#[derive(Debug, Default)]
pub struct AmdTransformer {
    stats: TransformStats,
}

impl AmdTransformer {
    pub fn new() -> Self {
        AmdTransformer::default()
    }

    /// Counters from the most recent successful `transform` call.
    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    pub fn transform(&mut self, source: &str) -> Result<String> {
        let span = debug_span!("amd_transform", bytes = source.len());
        let _guard = span.enter();

        self.stats = TransformStats::default();
        let tree = parse_source(source)?;
        let mut pass = RewritePass::new(&tree);
        pass.run()?;

        debug!(
            call_sites = pass.stats.call_sites_rewritten,
            exports = pass.stats.exports_rewritten,
            skipped = pass.stats.call_sites_skipped,
            "AMD transform complete"
        );
        self.stats = pass.stats;
        Ok(pass.edits.finish())
    }
}

/// Body of a factory function.
enum FactoryBody {
    Statements(Vec<NodeIndex>),
    /// Expression-bodied arrow function (`() => value`).
    Expression(NodeIndex),
}

/// One traversal over one tree. Owns the substitution buffer.
struct RewritePass<'a, 'src> {
    tree: &'a SyntaxTree<'src>,
    edits: TextEdits<'src>,
    amd_calls: FxHashMap<NodeIndex, Option<AmdCall>>,
    stats: TransformStats,
}

impl<'a, 'src> RewritePass<'a, 'src> {
    fn new(tree: &'a SyntaxTree<'src>) -> Self {
        RewritePass {
            tree,
            edits: TextEdits::new(tree.source()),
            amd_calls: FxHashMap::default(),
            stats: TransformStats::default(),
        }
    }

    fn arena(&self) -> &'a NodeArena {
        self.tree.arena()
    }

    /// Visit every node once. Arena order is pre-order, so walking it
    /// backwards reaches every descendant before its ancestors and inner
    /// rewrites are recorded before an enclosing factory reads its body.
    fn run(&mut self) -> Result<()> {
        for raw in (0..self.arena().len() as u32).rev() {
            let index = NodeIndex(raw);
            match self.arena().kind(index) {
                Some(SyntaxKind::CallExpression) => self.visit_call(index)?,
                Some(SyntaxKind::ReturnStatement) => self.visit_return(index)?,
                _ => {}
            }
        }
        Ok(())
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// `define` outside any function, or `require` anywhere.
    fn classify_call(&self, call: NodeIndex) -> Option<AmdCallKind> {
        let arena = self.arena();
        if !arena.is_kind(call, SyntaxKind::CallExpression) {
            return None;
        }
        let callee = arena.child_by_field(call, FieldName::Function);
        if !arena.is_kind(callee, SyntaxKind::Identifier) {
            return None;
        }
        match self.tree.text(callee) {
            "define" if arena.enclosing_function(call).is_none() => Some(AmdCallKind::Define),
            "require" => Some(AmdCallKind::Require),
            _ => None,
        }
    }

    /// Classification plus argument-shape dispatch, cached per call node.
    fn amd_call(&mut self, call: NodeIndex) -> Option<AmdCall> {
        if let Some(cached) = self.amd_calls.get(&call) {
            return cached.clone();
        }
        let resolved = self
            .classify_call(call)
            .and_then(|kind| self.match_shape(call, kind));
        self.amd_calls.insert(call, resolved.clone());
        resolved
    }

    /// `(factory)` or `([deps...], factory)`; anything else is not AMD.
    fn match_shape(&self, call: NodeIndex, kind: AmdCallKind) -> Option<AmdCall> {
        let arena = self.arena();
        let arguments = arena.child_by_field(call, FieldName::Arguments);
        if !arena.is_kind(arguments, SyntaxKind::Arguments) {
            return None;
        }
        let args: Vec<NodeIndex> = arena.significant_children(arguments).collect();
        let first = *args.first()?;

        let (factory, dependencies) = if self.is_factory_function(first) {
            (first, NodeList::new())
        } else if arena.is_kind(first, SyntaxKind::ArrayExpression) {
            let factory = *args.get(1)?;
            if !self.is_factory_function(factory) {
                return None;
            }
            // Dependency `i` must be array element `i`.
            if arena.has_flags(first, node_flags::HAS_ELISION) {
                trace!(callee = kind.callee_name(), "dependency array has a hole");
                return None;
            }
            let dependencies: NodeList = arena.significant_children(first).collect();
            if dependencies
                .iter()
                .any(|&dep| arena.is_kind(dep, SyntaxKind::SpreadElement))
            {
                trace!(callee = kind.callee_name(), "dependency array has a spread");
                return None;
            }
            (factory, dependencies)
        } else {
            return None;
        };

        // The body would end up inside a plain `function`, where `await` is invalid.
        if arena.has_flags(factory, node_flags::ASYNC) {
            trace!(callee = kind.callee_name(), "factory is async");
            return None;
        }

        // `var ...rest = require(...)` is not a declaration.
        if self
            .factory_parameters(factory)
            .iter()
            .any(|&param| arena.is_kind(param, SyntaxKind::RestPattern))
        {
            trace!(callee = kind.callee_name(), "factory has a rest parameter");
            return None;
        }

        Some(AmdCall {
            kind,
            factory,
            dependencies,
        })
    }

    fn is_factory_function(&self, index: NodeIndex) -> bool {
        self.arena()
            .kind(index)
            .is_some_and(SyntaxKind::is_factory_function)
    }

    /// A `return` is a module export when its nearest enclosing function is
    /// the factory of a recognized `define` call.
    fn is_amd_export(&mut self, return_stmt: NodeIndex) -> bool {
        let arena = self.arena();
        let function = arena.enclosing_function(return_stmt);
        if !self.is_factory_function(function) {
            return false;
        }
        let arguments = arena.parent_of(function);
        if !arena.is_kind(arguments, SyntaxKind::Arguments) {
            return false;
        }
        let call = arena.parent_of(arguments);
        matches!(
            self.amd_call(call),
            Some(AmdCall { kind: AmdCallKind::Define, factory, .. }) if factory == function
        )
    }

    // =========================================================================
    // Rewrites
    // =========================================================================

    fn visit_call(&mut self, call: NodeIndex) -> Result<()> {
        let Some(kind) = self.classify_call(call) else {
            return Ok(());
        };
        let Some(amd) = self.amd_call(call) else {
            trace!(
                callee = kind.callee_name(),
                text = self.tree.text(call),
                "call does not match an AMD shape"
            );
            self.stats.call_sites_skipped += 1;
            return Ok(());
        };

        let wrapped = self.transform_factory(&amd)?;

        // A standalone `define(...);` statement disappears entirely; a call
        // inside a larger expression keeps its surroundings.
        let arena = self.arena();
        let parent = arena.parent_of(call);
        let is_statement = arena.is_kind(parent, SyntaxKind::ExpressionStatement)
            && arena.significant_children(parent).eq(std::iter::once(call));
        let (target, text) = if is_statement {
            (parent, format!("{wrapped};"))
        } else {
            (call, wrapped)
        };

        let range = self.node_range(target)?;
        self.edits.replace(range, text)?;
        self.stats.call_sites_rewritten += 1;
        debug!(
            callee = amd.kind.callee_name(),
            dependencies = amd.dependencies.len(),
            statement = is_statement,
            "rewrote AMD call site"
        );
        Ok(())
    }

    fn visit_return(&mut self, return_stmt: NodeIndex) -> Result<()> {
        let Some(argument) = self.arena().significant_children(return_stmt).next() else {
            return Ok(());
        };
        if !self.is_amd_export(return_stmt) {
            return Ok(());
        }
        let value = self.render(argument)?;
        let range = self.node_range(return_stmt)?;
        self.edits
            .replace(range, format!("module.exports = {value};"))?;
        self.stats.exports_rewritten += 1;
        Ok(())
    }

    /// Flatten a factory into `var` bindings, excess `require`s and its body,
    /// wrapped in an immediately-invoked function.
    fn transform_factory(&mut self, amd: &AmdCall) -> Result<String> {
        let params = self.factory_parameters(amd.factory);
        let deps = &amd.dependencies;
        let mut statements: Vec<String> = Vec::with_capacity(params.len() + 2);

        if !params.is_empty() {
            let declarators = params
                .iter()
                .enumerate()
                .map(|(i, &param)| self.declarator(param, deps.get(i).copied()))
                .collect::<Result<Vec<_>>>()?;
            statements.push(format!("var {};", declarators.join(", ")));
        }

        for &dep in deps.iter().skip(params.len()) {
            statements.push(format!("require({});", self.render(dep)?));
        }

        let mut pragma = None;
        match self.factory_body(amd.factory)? {
            FactoryBody::Statements(body) => {
                for stmt in body {
                    let text = self.render(stmt)?;
                    if pragma.is_none() && self.is_use_strict_pragma(stmt) {
                        pragma = Some(text);
                    } else {
                        statements.push(text);
                    }
                }
            }
            FactoryBody::Expression(expr) => {
                let value = self.render(expr)?;
                match amd.kind {
                    AmdCallKind::Define => {
                        statements.push(format!("module.exports = {value};"));
                        self.stats.exports_rewritten += 1;
                    }
                    AmdCallKind::Require => statements.push(format!("{value};")),
                }
            }
        }
        if let Some(pragma) = pragma {
            statements.insert(0, pragma);
        }

        Ok(format!("(function () {{{}}}())", statements.join("\n")))
    }

    /// `name` or `name = require(dep)`. A defaulted parameter keeps its
    /// default only when no dependency binds it.
    fn declarator(&self, param: NodeIndex, dependency: Option<NodeIndex>) -> Result<String> {
        let Some(dep) = dependency else {
            return self.render(param);
        };
        let arena = self.arena();
        let binding = if arena.is_kind(param, SyntaxKind::AssignmentPattern) {
            arena.child_by_field(param, FieldName::Left)
        } else {
            param
        };
        Ok(format!(
            "{} = require({})",
            self.render(binding)?,
            self.render(dep)?
        ))
    }

    fn factory_parameters(&self, factory: NodeIndex) -> Vec<NodeIndex> {
        let arena = self.arena();
        let params = arena.child_by_field(factory, FieldName::Parameters);
        if params.is_some() {
            return arena.significant_children(params).collect();
        }
        // Arrow function with a single bare parameter: `a => ...`.
        let single = arena.child_by_field(factory, FieldName::Parameter);
        if single.is_some() {
            vec![single]
        } else {
            Vec::new()
        }
    }

    fn factory_body(&self, factory: NodeIndex) -> Result<FactoryBody> {
        let arena = self.arena();
        let body = arena.child_by_field(factory, FieldName::Body);
        match arena.kind(body) {
            Some(SyntaxKind::StatementBlock) => Ok(FactoryBody::Statements(
                arena.significant_children(body).collect(),
            )),
            Some(_) if arena.is_kind(factory, SyntaxKind::ArrowFunction) => {
                Ok(FactoryBody::Expression(body))
            }
            _ => Err(TransformError::invariant(format!(
                "factory {factory:?} has no statement body"
            ))),
        }
    }

    /// `"use strict";` or `'use strict';` as a standalone statement.
    fn is_use_strict_pragma(&self, stmt: NodeIndex) -> bool {
        let arena = self.arena();
        if !arena.is_kind(stmt, SyntaxKind::ExpressionStatement) {
            return false;
        }
        let mut children = arena.significant_children(stmt);
        match (children.next(), children.next()) {
            (Some(expr), None) => {
                arena.is_kind(expr, SyntaxKind::StringLiteral)
                    && matches!(self.tree.text(expr), "\"use strict\"" | "'use strict'")
            }
            _ => false,
        }
    }

    // =========================================================================
    // Text
    // =========================================================================

    fn node_range(&self, index: NodeIndex) -> Result<TextRange> {
        self.arena()
            .range(index)
            .ok_or_else(|| TransformError::invariant(format!("node {index:?} is not in the arena")))
    }

    /// Current text of a node, with rewrites already recorded inside it.
    fn render(&self, index: NodeIndex) -> Result<String> {
        Ok(self.edits.render(self.node_range(index)?))
    }
}
