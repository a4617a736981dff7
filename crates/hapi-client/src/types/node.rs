/*
[INPUT]:  Decoded XML elements or JSON objects
[OUTPUT]: Ordered response tree with explicit and lenient accessors
[POS]:    Data layer - generic response tree shared by every hAPI call
[UPDATE]: When changing tree storage, access sugar or diagnostic rendering
*/

use std::fmt;
use std::ops::Index;

/// Returned by lenient lookups when a key is absent
static EMPTY: Node = Node::Text(String::new());

/// One value in a response tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Scalar leaf (attribute value or element text)
    Text(String),
    /// Repeated sibling tags, in document order
    List(Vec<Node>),
    /// Nested element with named fields
    Tree(Tree),
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Node::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field when this node is a tree
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_tree().and_then(|tree| tree.get(key))
    }

    /// Iterate a value that may be a single node or a list of them.
    ///
    /// A tag seen once decodes to a single node while a repeated tag decodes
    /// to a list; this walks both shapes the same way.
    pub fn items(&self) -> std::slice::Iter<'_, Node> {
        match self {
            Node::List(items) => items.iter(),
            single => std::slice::from_ref(single).iter(),
        }
    }

    /// Text content of this node, or `""` for trees and lists
    pub fn text(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Node::Text(text) => writeln!(f, "{:indent$}\"{text}\"", ""),
            Node::Tree(tree) => tree.render(f, indent),
            Node::List(items) => {
                writeln!(f, "{:indent$}[", "")?;
                for item in items {
                    item.render(f, indent + 2)?;
                }
                writeln!(f, "{:indent$}]", "")
            }
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Text(String::new())
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<Tree> for Node {
    fn from(value: Tree) -> Self {
        Node::Tree(value)
    }
}

impl Index<&str> for Node {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        self.get(key).unwrap_or(&EMPTY)
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        self.items().nth(index).unwrap_or(&EMPTY)
    }
}

impl PartialEq<str> for Node {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Text prints bare; trees and lists use the indented diagnostic layout.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => f.write_str(text),
            other => other.render(f, 0),
        }
    }
}

/// Insertion-ordered mapping from field name to node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    fields: Vec<(String, Node)>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| name == key)
    }

    /// Explicit lookup: `None` when the key is absent
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.position(key).map(|index| &self.fields[index].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.position(key).map(move |index| &mut self.fields[index].1)
    }

    /// Lenient lookup: absent keys read as empty text
    pub fn get_or_empty(&self, key: &str) -> &Node {
        self.get(key).unwrap_or(&EMPTY)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Set a field, replacing any previous value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(index) => Some(std::mem::replace(&mut self.fields[index].1, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Add a value for a tag that may repeat.
    ///
    /// First occurrence is stored as-is, the second turns the slot into a
    /// two-element list, later ones append to that list.
    pub fn push_repeated(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        let key = key.into();
        let value = value.into();
        let Some(index) = self.position(&key) else {
            self.fields.push((key, value));
            return;
        };

        let slot = &mut self.fields[index].1;
        match slot {
            Node::List(items) => items.push(value),
            _ => {
                let first = std::mem::take(slot);
                *slot = Node::List(vec![first, value]);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.position(key).map(|index| self.fields.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{{", "")?;
        let inner = indent + 2;
        for (key, value) in &self.fields {
            match value {
                Node::Text(text) => writeln!(f, "{:inner$}{key} = \"{text}\"", "")?,
                Node::Tree(tree) => {
                    writeln!(f, "{:inner$}{key} =", "")?;
                    tree.render(f, inner + 2)?;
                }
                Node::List(items) => {
                    writeln!(f, "{:inner$}{key} = [", "")?;
                    for item in items {
                        item.render(f, inner + 2)?;
                    }
                    writeln!(f, "{:inner$}]", "")?;
                }
            }
        }
        writeln!(f, "{:indent$}}}", "")
    }
}

impl Index<&str> for Tree {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        self.get_or_empty(key)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl FromIterator<(String, Node)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}
