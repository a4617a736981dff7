/*
[INPUT]:  Already-parsed JSON values (serde_json)
[OUTPUT]: Response Tree built from JSON objects
[POS]:    Data layer - alternate decode path for JSON payloads
[UPDATE]: When changing how JSON scalars or arrays map onto Node
*/

use serde_json::{Map, Value};

use super::node::{Node, Tree};

impl Tree {
    /// Build a tree from a JSON object, keeping the source key order
    pub fn from_json(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .map(|(key, value)| (key.clone(), Node::from_json(value)))
            .collect()
    }
}

impl Node {
    /// Objects become trees, arrays become lists, scalars become text
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(object) => Node::Tree(Tree::from_json(object)),
            Value::Array(items) => Node::List(items.iter().map(Node::from_json).collect()),
            Value::String(text) => Node::Text(text.clone()),
            Value::Null => Node::Text(String::new()),
            Value::Bool(flag) => Node::Text(flag.to_string()),
            Value::Number(number) => Node::Text(number.to_string()),
        }
    }
}
