/*
[INPUT]:  Raw XML response bodies
[OUTPUT]: Element trees and their decoded response Tree form
[POS]:    Data layer - XML wire format decoding
[UPDATE]: When changing XML parsing or the attribute/child folding rules
*/

use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::Reader;

use crate::http::{HapiError, Result};

use super::node::{Node, Tree};

/// A parsed XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated character data directly inside this element
    pub text: Option<String>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given tag
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// No attributes and no child elements
    pub fn is_leaf(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    fn push_text(&mut self, chunk: &str) {
        self.text.get_or_insert_with(String::new).push_str(chunk);
    }
}

fn xml_error(err: impl std::fmt::Display) -> HapiError {
    HapiError::Xml(err.to_string())
}

/// Parse a complete document and return its root element
pub fn parse_document(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| HapiError::Xml("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text.decode().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&data.decode().map_err(xml_error)?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&resolve_reference(&reference)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(HapiError::Xml("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| HapiError::Xml("document has no root element".to_string()))
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element {
        tag: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        ..Element::default()
    };

    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attribute.unescape_value().map_err(xml_error)?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(HapiError::Xml("multiple root elements".to_string()));
    }
    *root = Some(element);
    Ok(())
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(xml_error)? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(xml_error)?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| HapiError::Xml(format!("unknown entity &{name};")))
}

/// Character data that carries content, not just indentation
fn meaningful_text(element: &Element) -> Option<&str> {
    element
        .text
        .as_deref()
        .filter(|text| !text.trim().is_empty())
}

impl Tree {
    /// Decode one element into a tree
    pub fn from_xml(element: &Element) -> Self {
        Self::from_xml_nodes(std::slice::from_ref(element))
    }

    /// Decode a run of sibling elements into a single tree.
    ///
    /// Attributes become flat fields. Leaf children store their text under
    /// their tag, other children decode recursively, and repeated tags
    /// collapse into a list.
    pub fn from_xml_nodes(elements: &[Element]) -> Self {
        let mut tree = Tree::new();
        for element in elements {
            for (key, value) in &element.attributes {
                tree.insert(key.as_str(), value.as_str());
            }

            for child in &element.children {
                let value = if child.is_leaf() {
                    Node::Text(child.text.clone().unwrap_or_default())
                } else {
                    Node::Tree(Tree::from_xml(child))
                };
                tree.push_repeated(child.tag.as_str(), value);
            }

            if element.is_leaf() {
                tree.insert(
                    element.tag.as_str(),
                    element.text.clone().unwrap_or_default(),
                );
            } else if let Some(text) = meaningful_text(element) {
                tree.insert("text", text);
            }
        }
        tree
    }
}
