//! Describe an element, rebuild or mutate the page, and resolve it again.

use elements::{ButtonHandler, ElementHandler, SelectorDescriptor};
use pagedom::{Document, Element, MemoryDom, NodeId};

fn toolbar(labels: &[&str]) -> (MemoryDom, Vec<NodeId>) {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    let bar = dom.append(body, Element::new("div").class("toolbar"));
    let buttons = labels
        .iter()
        .map(|l| dom.append(bar, Element::new("button").class("btn").text(l)))
        .collect();
    (dom, buttons)
}

#[test]
fn every_button_resolves_to_itself() {
    let (mut dom, mut buttons) = toolbar(&["Save", "Cancel", "Help"]);
    let body = dom.body();
    buttons.push(dom.append(
        body,
        Element::new("form").child(
            Element::new("input")
                .attr("type", "submit")
                .attr("name", "go"),
        ),
    ));
    if let Some(input) = dom.children(buttons[3]).first().copied() {
        buttons[3] = input;
    }
    buttons.push(dom.append(body, Element::new("a").id("3rd:link").class("btn")));

    let h = ButtonHandler::default();
    for b in buttons {
        let d = h.describe(&dom, b);
        assert_eq!(h.find_element(&dom, &d), Some(b), "{d:?}");
    }
}

#[test]
fn resolves_on_a_rebuilt_page() {
    let h = ButtonHandler::default();
    let (dom, buttons) = toolbar(&["Save", "Cancel"]);
    let d = h.describe(&dom, buttons[1]);

    let (fresh, fresh_buttons) = toolbar(&["Save", "Cancel"]);
    assert_eq!(h.find_element(&fresh, &d), Some(fresh_buttons[1]));
}

#[test]
fn index_survives_identical_sibling_added_after() {
    let h = ButtonHandler::default();
    let (mut dom, buttons) = toolbar(&["Save", "Save"]);
    let d = h.describe(&dom, buttons[1]);
    assert_eq!(d.index, Some(1));

    let bar = dom.parent_element(buttons[1]).expect("parent");
    dom.append(bar, Element::new("button").class("btn").text("Save"));
    assert_eq!(h.find_element(&dom, &d), Some(buttons[1]));
}

#[test]
fn reordered_matches_resolve_by_position() {
    let h = ButtonHandler::default();
    let (dom, buttons) = toolbar(&["Save", "Cancel"]);
    let d = h.describe(&dom, buttons[1]);
    assert_eq!(d.index, Some(1));

    // Position wins over text: the second button now reads "Save".
    let (fresh, fresh_buttons) = toolbar(&["Cancel", "Save"]);
    assert_eq!(h.find_element(&fresh, &d), Some(fresh_buttons[1]));
}

#[test]
fn text_disambiguates_when_index_is_out_of_range() {
    let h = ButtonHandler::default();
    let (dom, buttons) = toolbar(&["Save", "Cancel"]);
    let d = SelectorDescriptor {
        css_path: "div.toolbar > button.btn".into(),
        xpath: "/html/body/div/button[9]".into(),
        text_content: "Cancel".into(),
        index: Some(7),
    };
    assert_eq!(h.find_element(&dom, &d), Some(buttons[1]));

    let no_text = SelectorDescriptor {
        text_content: "Missing".into(),
        ..d
    };
    assert_eq!(h.find_element(&dom, &no_text), Some(buttons[0]));
}

#[test]
fn xpath_covers_a_stale_css_path() {
    let h = ButtonHandler::default();
    let (mut dom, buttons) = toolbar(&["Save", "Cancel"]);
    let d = h.describe(&dom, buttons[1]);
    assert_eq!(d.xpath, "/html/body/div/button[2]");

    dom.set_attribute(buttons[0], "class", "button-v2");
    dom.set_attribute(buttons[1], "class", "button-v2");
    assert_eq!(h.find_element(&dom, &d), Some(buttons[1]));
}

#[test]
fn unreachable_element_is_none() {
    let h = ButtonHandler::default();
    let (mut dom, buttons) = toolbar(&["Save"]);
    let d = h.describe(&dom, buttons[0]);
    dom.remove(buttons[0]);
    assert_eq!(h.find_element(&dom, &d), None);

    let garbage = SelectorDescriptor {
        css_path: "button:nth-child(2)".into(),
        xpath: "not an xpath".into(),
        ..SelectorDescriptor::default()
    };
    assert_eq!(h.find_element(&dom, &garbage), None);
}
