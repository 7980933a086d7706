//! Headless tree dump of the browsed graph (`objscope dump`)

use crate::browser::{same_object, Browser, DisplayOptions, Element, ObjectRef};
use anyhow::Result;
use std::io::Write;

/// Write the graph under the browser's roots as an indented tree
///
/// Descends at most `max_depth` levels below the roots. Objects already on the
/// current branch are printed but not expanded again.
pub fn write_tree(
    browser: &Browser,
    options: DisplayOptions,
    max_depth: usize,
    out: &mut impl Write,
) -> Result<()> {
    let root = browser.root_element();
    writeln!(out, "{}", root.label())?;
    if let Some(roots) = root.object() {
        let mut branch = vec![roots.clone()];
        write_children(browser, roots, options, 1, max_depth, &mut branch, out)?;
    }
    Ok(())
}

fn write_children(
    browser: &Browser,
    parent: &ObjectRef,
    options: DisplayOptions,
    depth: usize,
    max_depth: usize,
    branch: &mut Vec<ObjectRef>,
    out: &mut impl Write,
) -> Result<()> {
    let handler = browser.handler_for(Some(parent));
    let rows: Vec<Element> = handler.children(parent, options)?.collect();
    let indent = "  ".repeat(depth);

    for row in rows {
        if row.is_header() {
            writeln!(out, "{}[{}]", indent, row.label())?;
            continue;
        }
        let Some(child) = row.object() else {
            writeln!(out, "{}{}: null", indent, row.label())?;
            continue;
        };
        let child_handler = browser.handler_for(Some(child));
        writeln!(
            out,
            "{}{}: {}",
            indent,
            row.label(),
            child_handler.string_value(child)
        )?;

        let on_branch = branch.iter().any(|seen| same_object(seen, child));
        if child_handler.is_leaf(child) || on_branch || depth >= max_depth {
            continue;
        }
        branch.push(child.clone());
        write_children(browser, child, options, depth + 1, max_depth, branch, out)?;
        branch.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{obj, ObjectList};

    fn render(browser: &Browser, depth: usize) -> String {
        let mut out = Vec::new();
        write_tree(browser, DisplayOptions::default(), depth, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn dumps_nested_lists() {
        let browser = Browser::new();
        let inner = ObjectList::new();
        inner.push(Some(obj(7_i32)));
        inner.push(None);
        browser.add(obj(inner));
        browser.add(obj("label"));

        assert_eq!(
            render(&browser, 3),
            "Objects\n  0: ObjectList[2]\n    0: 7\n    1: null\n  1: label\n"
        );
        assert_eq!(render(&browser, 1), "Objects\n  0: ObjectList[2]\n  1: label\n");
    }

    #[test]
    fn cycles_are_not_expanded_twice() {
        let browser = Browser::new();
        let list = std::rc::Rc::new(ObjectList::new());
        list.push(Some(list.clone()));
        browser.add(list.clone());

        let text = render(&browser, 10);
        assert_eq!(
            text,
            "Objects\n  0: ObjectList[1]\n    0: ObjectList[1]\n"
        );
        // Break the cycle so the list is freed
        list.retain(|_| false);
    }
}
