//! HTML解析和处理模块
//!
//! - `dom`: 标记解析、节点查找与文本读写
//! - `serializer`: 文档与节点序列化

pub mod dom;
pub mod serializer;

pub use dom::{
    find_nodes, get_body, get_child_node_by_name, get_node_name, get_text_content, html_to_dom,
    markup_to_body, set_text_content, text_cell,
};
pub use serializer::{encode_html, inner_html, outer_html, serialize_document};
