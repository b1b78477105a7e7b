//! Owned XML element tree for `.projitems` manifests.
//!
//! The parser resolves namespaces, so a namespaced element's tag is stored in
//! Clark notation (`{namespace-uri}localname`). [`Element::strip_namespaces`]
//! rewrites the whole tree back to bare local names before serialization,
//! which keeps the output in the manifest's convention: the default namespace
//! declared once on the root, every element tag unprefixed.

use anyhow::{Context, Result, bail};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::fs;
use std::path::Path;

/// A single XML element: tag, attributes in document order, optional text
/// content, and child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Looks up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Depth-first, first-match lookup among descendants. The element itself
    /// is not a candidate.
    pub fn find_descendant_mut(&mut self, tag: &str) -> Option<&mut Element> {
        for child in &mut self.children {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Rewrites `{namespace-uri}local` tags to bare `local` names, here and
    /// in every descendant.
    ///
    /// Precondition: the document uses a single namespace, declared as the
    /// default on the root. Stripped elements then still resolve to that
    /// namespace when the output is re-parsed. A multi-namespace document
    /// would lose information here.
    pub fn strip_namespaces(&mut self) {
        if let Some(pos) = self.tag.find('}') {
            self.tag = self.tag[pos + 1..].to_string();
        }
        for child in &mut self.children {
            child.strip_namespaces();
        }
    }
}

/// An XML document with a single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Reads and parses an XML file.
    pub fn load(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&xml).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parses XML text into an owned element tree, resolving namespaces into
    /// Clark-notation tags. Malformed input is an error.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_resolved_event()? {
                (ns, Event::Start(e)) => {
                    stack.push(element_from_start(&ns, &e)?);
                }
                (ns, Event::Empty(e)) => {
                    let element = element_from_start(&ns, &e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::End(_)) => {
                    // Tag balance is checked by the reader.
                    let element = stack.pop().context("Unbalanced closing tag")?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::Text(t)) => {
                    let text = t.unescape()?;
                    if let Some(parent) = stack.last_mut() {
                        parent.text = Some(text.into_owned());
                    } else if !text.trim().is_empty() {
                        bail!("Text content outside of the root element");
                    }
                }
                (_, Event::CData(t)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text = Some(String::from_utf8_lossy(&t).into_owned());
                    }
                }
                (_, Event::Eof) => break,
                // Declaration, comments, processing instructions, doctype.
                _ => {}
            }
        }

        let root = root.context("Document has no root element")?;
        Ok(Document { root })
    }

    /// Serializes with an XML declaration, two-space indentation and
    /// self-closing empty elements.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        write_element(&mut out, &self.root, 0);
        out
    }

    /// Writes the serialized document to `path`, replacing whatever is there.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_xml())
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn element_from_start(ns: &ResolveResult, e: &BytesStart) -> Result<Element> {
    let local = String::from_utf8_lossy(e.local_name().into_inner()).into_owned();
    let tag = match ns {
        ResolveResult::Bound(uri) => {
            format!("{{{}}}{}", String::from_utf8_lossy(uri.0), local)
        }
        _ => local,
    };

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        tag,
        attributes,
        text: None,
        children: Vec::new(),
    })
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        bail!("Document has more than one root element");
    }
    Ok(())
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.tag);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    match (&element.text, element.children.is_empty()) {
        (None, true) => out.push_str(" />\n"),
        (Some(text), true) => {
            out.push('>');
            out.push_str(&escape(text.as_str()));
            out.push_str("</");
            out.push_str(&element.tag);
            out.push_str(">\n");
        }
        (text, false) => {
            out.push_str(">\n");
            if let Some(text) = text {
                out.push_str(&"  ".repeat(depth + 1));
                out.push_str(&escape(text.as_str()));
                out.push('\n');
            }
            for child in &element.children {
                write_element(out, child, depth + 1);
            }
            out.push_str(&indent);
            out.push_str("</");
            out.push_str(&element.tag);
            out.push_str(">\n");
        }
    }
}
