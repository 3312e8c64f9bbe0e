//! Running selectors over whole trees.

use super::{
    Options, Result,
    ast::Selector,
    cache::SelectorCache,
    engine::match_node,
    parser::parse,
    traverse::{VisitAction, Visitor, traverse},
    tree::AstValue,
};
use std::collections::{HashSet, VecDeque};

/// Finds every node in `root` matched by the selector text, in document
/// order, each node once.
pub fn query<'a, V: AstValue>(root: &'a V, selector: &str) -> Result<Vec<&'a V>> {
    query_with(root, selector, &Options::default())
}

/// [`query`] with explicit options.
pub fn query_with<'a, V: AstValue>(
    root: &'a V,
    selector: &str,
    options: &Options,
) -> Result<Vec<&'a V>> {
    log::debug!("query {selector:?}");
    let selector = parse(selector)?;
    match_selector(root, &selector, options)
}

/// [`query_with`], parsing the selector text through `cache`.
pub fn query_cached<'a, V: AstValue>(
    root: &'a V,
    selector: &str,
    cache: &SelectorCache,
    options: &Options,
) -> Result<Vec<&'a V>> {
    let selector = cache.get_or_parse(selector)?;
    match_selector(root, &selector, options)
}

/// Finds every node in `root` matched by a parsed selector, in document
/// order, each node once.
pub fn match_selector<'a, V: AstValue>(
    root: &'a V,
    selector: &Selector,
    options: &Options,
) -> Result<Vec<&'a V>> {
    let mut seen = HashSet::new();
    let mut results = Vec::new();
    for_each_match(root, selector, options, |node, _, _| {
        if seen.insert(std::ptr::from_ref(node)) {
            results.push(node);
        }
    })?;
    log::debug!("{} nodes matched {selector}", results.len());
    Ok(results)
}

/// Calls `callback` for every match of `selector` in `root`, with the
/// matched node, its parent, and its ancestors, nearest first.
///
/// Each top-level alternative is matched on its own, with its own subjects,
/// so `A, B` reports what `A` and `B` report separately. Matches are
/// reported as they are found. A node can be reported more than once when
/// several alternatives or subjects pick it.
pub fn for_each_match<'a, V, F>(
    root: &'a V,
    selector: &Selector,
    options: &Options,
    callback: F,
) -> Result<()>
where
    V: AstValue,
    F: FnMut(&'a V, Option<&'a V>, &[&'a V]),
{
    let mut driver = Driver {
        alternatives: alternatives(selector)
            .into_iter()
            .map(|alternative| (alternative, subjects(alternative)))
            .collect(),
        options,
        ancestry: VecDeque::new(),
        callback,
    };
    traverse(root, options, &mut driver)
}

/// The selectors whose matches are reported in place of the rightmost node:
/// for each `!`-marked part, the smallest enclosing fragment that places it
/// in the tree.
///
/// The left operand of a combinator is matched against the ancestors or
/// siblings of the right one, so a subject inside it only needs that
/// operand to hold.
#[must_use]
pub fn subjects(selector: &Selector) -> Vec<&Selector> {
    let mut found = Vec::new();
    collect_subjects(selector, selector, &mut found);
    found
}

/// The top-level alternatives of `selector`, with nested lists flattened.
fn alternatives(selector: &Selector) -> Vec<&Selector> {
    match selector {
        Selector::Matches(selectors) => selectors.iter().flat_map(alternatives).collect(),
        _ => vec![selector],
    }
}

fn collect_subjects<'s>(
    selector: &'s Selector,
    fragment: &'s Selector,
    found: &mut Vec<&'s Selector>,
) {
    match selector {
        Selector::Subject(inner) => {
            found.push(fragment);
            collect_subjects(inner, fragment, found);
        }
        Selector::Not(selectors)
        | Selector::Matches(selectors)
        | Selector::Has(selectors)
        | Selector::Compound(selectors) => {
            for selector in selectors {
                collect_subjects(selector, fragment, found);
            }
        }
        Selector::Combinator { left, right, .. } => {
            collect_subjects(left, left, found);
            collect_subjects(right, fragment, found);
        }
        Selector::Wildcard
        | Selector::Identifier(_)
        | Selector::Field(_)
        | Selector::Attribute(_)
        | Selector::NthChild(_)
        | Selector::NthLastChild(_)
        | Selector::Class(_) => {}
    }
}

struct Driver<'a, 's, V, F> {
    alternatives: Vec<(&'s Selector, Vec<&'s Selector>)>,
    options: &'s Options,
    ancestry: VecDeque<&'a V>,
    callback: F,
}

impl<'a, V, F> Visitor<'a, V> for Driver<'a, '_, V, F>
where
    V: AstValue,
    F: FnMut(&'a V, Option<&'a V>, &[&'a V]),
{
    fn enter(&mut self, node: &'a V, parent: Option<&'a V>) -> Result<VisitAction> {
        if let Some(parent) = parent {
            self.ancestry.push_front(parent);
        }
        let ancestry: &[&'a V] = self.ancestry.make_contiguous();

        for (alternative, subjects) in &self.alternatives {
            if !match_node(node, alternative, ancestry, self.options)? {
                continue;
            }

            if subjects.is_empty() {
                (self.callback)(node, parent, ancestry);
                continue;
            }

            for subject in subjects {
                if match_node(node, subject, ancestry, self.options)? {
                    (self.callback)(node, parent, ancestry);
                }
                for (i, &ancestor) in ancestry.iter().enumerate() {
                    let above = &ancestry[i + 1..];
                    if match_node(ancestor, subject, above, self.options)? {
                        (self.callback)(ancestor, above.first().copied(), above);
                    }
                }
            }
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
