//! Which members of a node hold its children.

use crate::{Error, Result, tree::AstValue};
use std::collections::HashMap;

/// What to do with a node whose type has no entry in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fallback {
    /// Treat every member except `type` as a potential child.
    #[default]
    Iteration,
    /// Fail the traversal rather than guess.
    Strict,
}

/// A table from node type to the ordered names of its child members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorKeys {
    table: HashMap<String, Vec<String>>,
    fallback: Fallback,
}

impl Default for VisitorKeys {
    fn default() -> Self {
        Self::estree()
    }
}

impl VisitorKeys {
    /// An empty table. Every node goes through the fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
            fallback: Fallback::default(),
        }
    }

    /// The standard ESTree table.
    #[must_use]
    pub fn estree() -> Self {
        let table = ESTREE_KEYS
            .iter()
            .map(|(kind, keys)| {
                (
                    (*kind).to_string(),
                    keys.iter().map(|key| (*key).to_string()).collect(),
                )
            })
            .collect();

        Self {
            table,
            fallback: Fallback::default(),
        }
    }

    /// Adds or replaces the child members of `node_type`.
    #[must_use]
    pub fn with_keys<I, S>(mut self, node_type: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .insert(node_type.to_string(), keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// The table entry for `node_type`, if any.
    #[must_use]
    pub fn get(&self, node_type: &str) -> Option<&[String]> {
        self.table.get(node_type).map(Vec::as_slice)
    }

    /// The child members of `node`, in visiting order.
    ///
    /// # Errors
    ///
    /// With [`Fallback::Strict`], a node type missing from the table is an
    /// [`Error::Traversal`].
    pub fn keys_for<'a, V: AstValue>(&'a self, node: &'a V) -> Result<Vec<&'a str>> {
        let node_type = node.node_type().unwrap_or_default();
        if let Some(keys) = self.table.get(node_type) {
            return Ok(keys.iter().map(String::as_str).collect());
        }

        match self.fallback {
            Fallback::Iteration => {
                log::trace!("no visitor keys for '{node_type}', iterating its members");
                Ok(node
                    .member_names()
                    .into_iter()
                    .filter(|&key| key != "type")
                    .collect())
            }
            Fallback::Strict => Err(Error::Traversal {
                node_type: node_type.to_string(),
                reason: "no visitor keys for this node type".to_string(),
            }),
        }
    }
}

const ESTREE_KEYS: &[(&str, &[&str])] = &[
    ("AssignmentExpression", &["left", "right"]),
    ("AssignmentPattern", &["left", "right"]),
    ("ArrayExpression", &["elements"]),
    ("ArrayPattern", &["elements"]),
    ("ArrowFunctionExpression", &["params", "body"]),
    ("AwaitExpression", &["argument"]),
    ("BlockStatement", &["body"]),
    ("BinaryExpression", &["left", "right"]),
    ("BreakStatement", &["label"]),
    ("CallExpression", &["callee", "arguments"]),
    ("CatchClause", &["param", "body"]),
    ("ChainExpression", &["expression"]),
    ("ClassBody", &["body"]),
    ("ClassDeclaration", &["id", "superClass", "body"]),
    ("ClassExpression", &["id", "superClass", "body"]),
    ("ComprehensionBlock", &["left", "right"]),
    ("ComprehensionExpression", &["blocks", "filter", "body"]),
    ("ConditionalExpression", &["test", "consequent", "alternate"]),
    ("ContinueStatement", &["label"]),
    ("DebuggerStatement", &[]),
    ("DirectiveStatement", &[]),
    ("DoWhileStatement", &["body", "test"]),
    ("EmptyStatement", &[]),
    ("ExportAllDeclaration", &["source"]),
    ("ExportDefaultDeclaration", &["declaration"]),
    ("ExportNamedDeclaration", &["declaration", "specifiers", "source"]),
    ("ExportSpecifier", &["exported", "local"]),
    ("ExpressionStatement", &["expression"]),
    ("ForStatement", &["init", "test", "update", "body"]),
    ("ForInStatement", &["left", "right", "body"]),
    ("ForOfStatement", &["left", "right", "body"]),
    ("FunctionDeclaration", &["id", "params", "body"]),
    ("FunctionExpression", &["id", "params", "body"]),
    ("GeneratorExpression", &["blocks", "filter", "body"]),
    ("Identifier", &[]),
    ("IfStatement", &["test", "consequent", "alternate"]),
    ("ImportExpression", &["source"]),
    ("ImportDeclaration", &["specifiers", "source"]),
    ("ImportDefaultSpecifier", &["local"]),
    ("ImportNamespaceSpecifier", &["local"]),
    ("ImportSpecifier", &["imported", "local"]),
    ("Literal", &[]),
    ("LabeledStatement", &["label", "body"]),
    ("LogicalExpression", &["left", "right"]),
    ("MemberExpression", &["object", "property"]),
    ("MetaProperty", &["meta", "property"]),
    ("MethodDefinition", &["key", "value"]),
    ("ModuleSpecifier", &[]),
    ("NewExpression", &["callee", "arguments"]),
    ("ObjectExpression", &["properties"]),
    ("ObjectPattern", &["properties"]),
    ("PrivateIdentifier", &[]),
    ("Program", &["body"]),
    ("Property", &["key", "value"]),
    ("PropertyDefinition", &["key", "value"]),
    ("RestElement", &["argument"]),
    ("ReturnStatement", &["argument"]),
    ("SequenceExpression", &["expressions"]),
    ("SpreadElement", &["argument"]),
    ("Super", &[]),
    ("SwitchStatement", &["discriminant", "cases"]),
    ("SwitchCase", &["test", "consequent"]),
    ("TaggedTemplateExpression", &["tag", "quasi"]),
    ("TemplateElement", &[]),
    ("TemplateLiteral", &["quasis", "expressions"]),
    ("ThisExpression", &[]),
    ("ThrowStatement", &["argument"]),
    ("TryStatement", &["block", "handler", "finalizer"]),
    ("UnaryExpression", &["argument"]),
    ("UpdateExpression", &["argument"]),
    ("VariableDeclaration", &["declarations"]),
    ("VariableDeclarator", &["id", "init"]),
    ("WhileStatement", &["test", "body"]),
    ("WithStatement", &["object", "body"]),
    ("YieldExpression", &["argument"]),
];
