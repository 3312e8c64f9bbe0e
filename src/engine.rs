use super::{
    Error, Options, Result,
    ast::{Attribute, ClassName, CombinatorKind, Operator, Selector, Value},
    traverse::{VisitAction, Visitor, traverse},
    tree::{AstValue, same},
};
use coerce::Primitive;
use std::collections::VecDeque;

mod coerce;
mod property;

/// Tests whether `node` is matched by `selector`, given the strict ancestors
/// of `node`, nearest first.
///
/// A missing selector matches everything and a missing node matches nothing.
pub fn matches<'a, V: AstValue>(
    node: Option<&'a V>,
    selector: Option<&Selector>,
    ancestry: &[&'a V],
    options: &Options,
) -> Result<bool> {
    let Some(selector) = selector else {
        return Ok(true);
    };
    let Some(node) = node else {
        return Ok(false);
    };
    match_node(node, selector, ancestry, options)
}

impl Selector {
    /// Tests whether `node`, with the given ancestors (nearest first), is
    /// matched by this selector.
    pub fn matches<'a, V: AstValue>(
        &self,
        node: &'a V,
        ancestry: &[&'a V],
        options: &Options,
    ) -> Result<bool> {
        match_node(node, self, ancestry, options)
    }
}

/// Where a positional pseudo-class counts from.
#[derive(Clone, Copy)]
enum Position {
    First(usize),
    Last(usize),
}

/// Which siblings of a node a combinator looks at.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

pub(crate) fn match_node<'a, V: AstValue>(
    node: &'a V,
    selector: &Selector,
    ancestry: &[&'a V],
    options: &Options,
) -> Result<bool> {
    match selector {
        Selector::Wildcard => Ok(true),
        Selector::Identifier(name) => Ok(node
            .node_type()
            .is_some_and(|node_type| node_type.to_lowercase() == name.to_lowercase())),
        Selector::Field(path) => Ok(path
            .len()
            .checked_sub(1)
            .and_then(|up| ancestry.get(up))
            .is_some_and(|&ancestor| in_path(node, ancestor, path))),
        Selector::Attribute(attribute) => match_attribute(node, attribute),
        Selector::Not(selectors) => Ok(!match_any(node, selectors, ancestry, options)?),
        Selector::Matches(selectors) => match_any(node, selectors, ancestry, options),
        Selector::Has(selectors) => match_has(node, selectors, options),
        Selector::Compound(parts) => {
            for part in parts {
                if !match_node(node, part, ancestry, options)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Selector::Subject(inner) => match_node(node, inner, ancestry, options),
        Selector::Combinator { kind, left, right } => {
            match_combinator(node, *kind, left, right, ancestry, options)
        }
        Selector::NthChild(n) => nth_child(node, ancestry, Position::First(*n), options),
        Selector::NthLastChild(n) => nth_child(node, ancestry, Position::Last(*n), options),
        Selector::Class(class) => Ok(match_class(node, *class, ancestry)),
    }
}

fn match_any<'a, V: AstValue>(
    node: &'a V,
    selectors: &[Selector],
    ancestry: &[&'a V],
    options: &Options,
) -> Result<bool> {
    for selector in selectors {
        if match_node(node, selector, ancestry, options)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether `node` is reached by following `path` from `ancestor`. Lists met
/// along the way are searched element by element.
fn in_path<V: AstValue>(node: &V, ancestor: &V, path: &[String]) -> bool {
    let mut current = ancestor;
    for (i, key) in path.iter().enumerate() {
        let Some(field) = property::lookup(current, key) else {
            return false;
        };
        if let Some(elements) = field.elements() {
            return elements
                .iter()
                .any(|element| in_path(node, element, &path[i + 1..]));
        }
        current = field;
    }
    same(node, current)
}

fn match_attribute<V: AstValue>(node: &V, attribute: &Attribute) -> Result<bool> {
    let prop = property::resolve(node, &attribute.path);
    let Some((operator, value)) = &attribute.test else {
        return Ok(!prop.is_nullish());
    };

    let equal = match (operator, value) {
        (Operator::Eq, Value::Regex(regex)) => {
            return Ok(prop.as_str().is_some_and(|s| regex.is_match(s)));
        }
        (Operator::NotEq, Value::Regex(regex)) => {
            return Ok(!regex.is_match(&Primitive::from_prop(prop).to_js_string()));
        }
        (Operator::Eq | Operator::NotEq, Value::Literal(literal)) => {
            Primitive::from_prop(prop).to_js_string()
                == Primitive::from_literal(literal).to_js_string()
        }
        (Operator::Eq | Operator::NotEq, Value::Type(name)) => coerce::type_of(prop) == name,
        (_, Value::Literal(literal)) => {
            let ordering = coerce::relational(
                &Primitive::from_prop(prop),
                &Primitive::from_literal(literal),
            );
            return Ok(ordering.is_some_and(|ordering| match operator {
                Operator::Lt => ordering.is_lt(),
                Operator::Le => ordering.is_le(),
                Operator::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }));
        }
        (_, Value::Regex(_) | Value::Type(_)) => {
            return Err(Error::UnknownConstruct {
                construct: "attribute comparison",
                name: format!("{}{value}", operator.as_str()),
            });
        }
    };

    Ok(equal == (*operator == Operator::Eq))
}

struct HasVisitor<'a, 's, V> {
    selectors: &'s [Selector],
    options: &'s Options,
    ancestry: VecDeque<&'a V>,
    found: bool,
}

impl<'a, V: AstValue> Visitor<'a, V> for HasVisitor<'a, '_, V> {
    fn enter(&mut self, node: &'a V, parent: Option<&'a V>) -> Result<VisitAction> {
        if let Some(parent) = parent {
            self.ancestry.push_front(parent);
        }
        let ancestry: &[&'a V] = self.ancestry.make_contiguous();
        if match_any(node, self.selectors, ancestry, self.options)? {
            self.found = true;
            return Ok(VisitAction::Break);
        }
        Ok(VisitAction::Continue)
    }

    fn leave(&mut self, _node: &'a V, parent: Option<&'a V>) -> Result<VisitAction> {
        if parent.is_some() {
            self.ancestry.pop_front();
        }
        Ok(VisitAction::Continue)
    }
}

/// Searches the subtree of `node`, `node` included, on its own: the outer
/// ancestors of `node` are not visible to `selectors`.
fn match_has<V: AstValue>(node: &V, selectors: &[Selector], options: &Options) -> Result<bool> {
    let mut visitor = HasVisitor {
        selectors,
        options,
        ancestry: VecDeque::new(),
        found: false,
    };
    traverse(node, options, &mut visitor)?;
    Ok(visitor.found)
}

fn match_combinator<'a, V: AstValue>(
    node: &'a V,
    kind: CombinatorKind,
    left: &Selector,
    right: &Selector,
    ancestry: &[&'a V],
    options: &Options,
) -> Result<bool> {
    match kind {
        CombinatorKind::Child => {
            let Some((&parent, rest)) = ancestry.split_first() else {
                return Ok(false);
            };
            Ok(match_node(node, right, ancestry, options)?
                && match_node(parent, left, rest, options)?)
        }
        CombinatorKind::Descendant => {
            if !match_node(node, right, ancestry, options)? {
                return Ok(false);
            }
            for (i, &ancestor) in ancestry.iter().enumerate() {
                if match_node(ancestor, left, &ancestry[i + 1..], options)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        CombinatorKind::Sibling | CombinatorKind::Adjacent => {
            let adjacent = kind == CombinatorKind::Adjacent;
            if match_node(node, right, ancestry, options)?
                && sibling(node, left, ancestry, Side::Before, adjacent, options)?
            {
                return Ok(true);
            }
            // A subject on the left is reported from the left node, so the
            // relation is also tried from that end.
            Ok(left.is_subject()
                && match_node(node, left, ancestry, options)?
                && sibling(node, right, ancestry, Side::After, adjacent, options)?)
        }
    }
}

/// Whether a sibling of `node` on the given side, in any list of the
/// parent that holds `node`, matches `selector`. `adjacent` limits the
/// search to the nearest element.
fn sibling<'a, V: AstValue>(
    node: &'a V,
    selector: &Selector,
    ancestry: &[&'a V],
    side: Side,
    adjacent: bool,
    options: &Options,
) -> Result<bool> {
    let Some(&parent) = ancestry.first() else {
        return Ok(false);
    };

    for key in options.keys.keys_for(parent)? {
        let Some(elements) = parent.member(key).and_then(AstValue::elements) else {
            continue;
        };
        let Some(index) = elements.iter().position(|element| same(element, node)) else {
            continue;
        };

        let candidates = match (side, adjacent) {
            (Side::Before, false) => &elements[..index],
            (Side::After, false) => &elements[index + 1..],
            (Side::Before, true) => &elements[index.saturating_sub(1)..index],
            (Side::After, true) => elements.get(index + 1..index + 2).unwrap_or_default(),
        };
        for candidate in candidates {
            if candidate.is_node() && match_node(candidate, selector, ancestry, options)? {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

fn nth_child<'a, V: AstValue>(
    node: &'a V,
    ancestry: &[&'a V],
    position: Position,
    options: &Options,
) -> Result<bool> {
    let (Position::First(n) | Position::Last(n)) = position;
    if n == 0 {
        return Ok(false);
    }
    let Some(&parent) = ancestry.first() else {
        return Ok(false);
    };

    for key in options.keys.keys_for(parent)? {
        let Some(elements) = parent.member(key).and_then(AstValue::elements) else {
            continue;
        };
        let index = match position {
            Position::First(n) => Some(n - 1),
            Position::Last(n) => elements.len().checked_sub(n),
        };
        if index
            .and_then(|index| elements.get(index))
            .is_some_and(|child| same(child, node))
        {
            return Ok(true);
        }
    }

    Ok(false)
}

fn match_class<V: AstValue>(node: &V, class: ClassName, ancestry: &[&V]) -> bool {
    let node_type = node.node_type().unwrap_or_default();
    match class {
        // Every declaration is a statement.
        ClassName::Statement => {
            node_type.ends_with("Statement") || node_type.ends_with("Declaration")
        }
        ClassName::Declaration => node_type.ends_with("Declaration"),
        // Every expression can be a pattern.
        ClassName::Pattern => node_type.ends_with("Pattern") || is_expression(node_type, ancestry),
        ClassName::Expression => is_expression(node_type, ancestry),
        ClassName::Function => matches!(
            node_type,
            "FunctionDeclaration" | "FunctionExpression" | "ArrowFunctionExpression"
        ),
    }
}

fn is_expression<V: AstValue>(node_type: &str, ancestry: &[&V]) -> bool {
    node_type.ends_with("Expression")
        || node_type.ends_with("Literal")
        || (node_type == "Identifier"
            && ancestry
                .first()
                .is_none_or(|parent| parent.node_type() != Some("MetaProperty")))
        || node_type == "MetaProperty"
}
