//! Depth-first walk over the nodes of a tree.

use crate::{Error, Options, Result, tree::AstValue};

/// What the walk should do after a visitor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitAction {
    #[default]
    Continue,
    /// Do not descend into the node just entered. Its `leave` is still
    /// called.
    Skip,
    /// Stop the walk.
    Break,
}

/// Callbacks for [`traverse`]. Both receive the node and its parent node, if
/// any.
pub trait Visitor<'a, V: AstValue> {
    fn enter(&mut self, node: &'a V, parent: Option<&'a V>) -> Result<VisitAction>;

    fn leave(&mut self, node: &'a V, parent: Option<&'a V>) -> Result<VisitAction> {
        let _ = (node, parent);
        Ok(VisitAction::Continue)
    }
}

enum Step<'a, V> {
    Enter {
        node: &'a V,
        parent: Option<&'a V>,
        depth: usize,
    },
    Leave {
        node: &'a V,
        parent: Option<&'a V>,
    },
}

/// Visits every node reachable from `root`, parents before children.
///
/// Children are found with `options.keys` and visited in key order, and in
/// element order within lists. Values that are not nodes are never visited,
/// so a `root` that is not a node visits nothing.
///
/// The walk keeps its own work list, so tree depth does not consume call
/// stack.
pub fn traverse<'a, V, T>(root: &'a V, options: &Options, visitor: &mut T) -> Result<()>
where
    V: AstValue,
    T: Visitor<'a, V> + ?Sized,
{
    if !root.is_node() {
        return Ok(());
    }

    let mut stack = vec![Step::Enter {
        node: root,
        parent: None,
        depth: 0,
    }];
    let mut children = Vec::new();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter {
                node,
                parent,
                depth,
            } => {
                if let Some(max_depth) = options.max_depth
                    && depth > max_depth
                {
                    return Err(Error::Traversal {
                        node_type: node.node_type().unwrap_or_default().to_string(),
                        reason: format!("tree is deeper than the limit of {max_depth}"),
                    });
                }

                match visitor.enter(node, parent)? {
                    VisitAction::Break => return Ok(()),
                    VisitAction::Skip => stack.push(Step::Leave { node, parent }),
                    VisitAction::Continue => {
                        stack.push(Step::Leave { node, parent });
                        collect_children(node, options, &mut children)?;
                        stack.extend(children.drain(..).rev().map(|child| Step::Enter {
                            node: child,
                            parent: Some(node),
                            depth: depth + 1,
                        }));
                    }
                }
            }
            Step::Leave { node, parent } => {
                if visitor.leave(node, parent)? == VisitAction::Break {
                    return Ok(());
                }
            }
        }
    }

    Ok(())
}

/// Appends the child nodes of `node` to `out`, in visiting order.
fn collect_children<'a, V: AstValue>(
    node: &'a V,
    options: &Options,
    out: &mut Vec<&'a V>,
) -> Result<()> {
    for key in options.keys.keys_for(node)? {
        let Some(child) = node.member(key) else {
            continue;
        };
        match child.elements() {
            Some(elements) => out.extend(elements.iter().filter(|element| element.is_node())),
            None if child.is_node() => out.push(child),
            None => {}
        }
    }
    Ok(())
}
