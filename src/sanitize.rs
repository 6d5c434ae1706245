//! Allow-list HTML sanitizer for author content placed inside a rendered map.

use scraper::{ElementRef, Html, Node};

use crate::escape::encode_strict;

/// Allowed tags and their tag-specific attributes
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "rel"]),
    ("abbr", &[]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("code", &[]),
    ("div", &[]),
    ("em", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "width", "height"]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("span", &[]),
    ("strong", &[]),
    ("u", &[]),
    ("ul", &[]),
];

/// Attributes allowed on every allowed tag, besides `data-*`
const GLOBAL_ATTRIBUTES: &[&str] = &["class", "id", "title", "lang", "dir"];

/// Elements dropped together with their content
const DROPPED_TAGS: &[&str] = &["script", "style", "iframe", "object", "embed", "noscript", "template"];

const VOID_TAGS: &[&str] = &["br", "img"];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite"];

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Keep allowed markup, unwrap disallowed elements and drop executable ones.
/// Text and attribute values are re-escaped on output.
pub fn sanitize_post_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    write_children(fragment.root_element(), &mut out);
    out
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&encode_strict(text)),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    write_element(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if DROPPED_TAGS.contains(&name) {
        return;
    }
    let Some((_, tag_attributes)) = ALLOWED_TAGS.iter().find(|(tag, _)| *tag == name) else {
        write_children(element, out);
        return;
    };

    // Attributes are written sorted by name so output does not depend on parser order
    let mut attributes: Vec<(&str, &str)> = element
        .value()
        .attrs()
        .filter(|(attribute, value)| {
            is_allowed_attribute(attribute, tag_attributes) && is_safe_value(attribute, value)
        })
        .collect();
    attributes.sort_by_key(|(attribute, _)| *attribute);

    out.push('<');
    out.push_str(name);
    for (attribute, value) in attributes {
        out.push_str(&format!(" {}=\"{}\"", attribute, encode_strict(value)));
    }
    out.push('>');

    if VOID_TAGS.contains(&name) {
        return;
    }
    write_children(element, out);
    out.push_str(&format!("</{}>", name));
}

fn is_allowed_attribute(attribute: &str, tag_attributes: &[&str]) -> bool {
    tag_attributes.contains(&attribute)
        || GLOBAL_ATTRIBUTES.contains(&attribute)
        || (attribute.starts_with("data-") && attribute.len() > 5)
}

fn is_safe_value(attribute: &str, value: &str) -> bool {
    if !URL_ATTRIBUTES.contains(&attribute) {
        return true;
    }
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    !UNSAFE_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme))
}
