/*
[INPUT]:  Raw XML bodies or parsed JSON objects
[OUTPUT]: Generic ordered response trees
[POS]:    Data layer - response tree model and decoders
[UPDATE]: When the tree model or a decode path changes
*/

pub mod json;
pub mod node;
pub mod xml;

pub use node::{Node, Tree};
pub use xml::{parse_document, Element};
