//! # 解析器模块
//!
//! - `html` - HTML 文档解析、节点查找、文本读写与序列化

pub mod html;

pub use html::{html_to_dom, markup_to_body, serialize_document};
