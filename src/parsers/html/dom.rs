use std::cell::RefCell;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> RcDom {
    let s: String = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => {
            let (string, _, _) = encoding.decode(data);
            string.to_string()
        }
        None => String::from_utf8_lossy(data).to_string(),
    };

    parse_document(RcDom::default(), Default::default()).one(s)
}

/// 将标记字符串解析为文档，并返回其 `<body>` 节点
///
/// 与浏览器的 `DOMParser` 一致：缺失的 `<html>`/`<body>` 会由解析器补全，
/// 因此对任何输入都能得到一个 body 节点。
///
/// 返回的 body 已从文档中摘下：`RcDom` 被释放时会清空所有后代的子节点，
/// 仍挂在文档上的 body 会变成空节点。
pub fn markup_to_body(markup: &str) -> Option<Handle> {
    let dom = parse_document(RcDom::default(), Default::default()).one(markup);
    let html = get_child_node_by_name(&dom.document, "html")?;
    let body = get_child_node_by_name(&html, "body")?;

    html.children
        .borrow_mut()
        .retain(|child| !Rc::ptr_eq(child, &body));
    body.parent.set(None);

    Some(body)
}

/// 获取文档的 `<body>` 节点
pub fn get_body(dom: &RcDom) -> Option<Handle> {
    let html = get_child_node_by_name(&dom.document, "html")?;
    get_child_node_by_name(&html, "body")
}

/// 查找指定名称的所有元素节点（文档顺序）
pub fn find_nodes(node: &Handle, node_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    if get_node_name(node) == Some(node_name) {
        found_nodes.push(node.clone());
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, node_name));
    }

    found_nodes
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取文本节点的内容单元，非文本节点返回 `None`
pub fn text_cell(node: &Handle) -> Option<&RefCell<StrTendril>> {
    match &node.data {
        NodeData::Text { contents } => Some(contents),
        _ => None,
    }
}

/// 递归拼接节点下所有文本（等价于 `textContent` 读取）
pub fn get_text_content(node: &Handle) -> String {
    if let Some(contents) = text_cell(node) {
        return contents.borrow().to_string();
    }

    node.children
        .borrow()
        .iter()
        .map(get_text_content)
        .collect()
}

/// 覆写文本节点内容，返回是否发生写入
pub fn set_text_content(node: &Handle, text: &str) -> bool {
    match text_cell(node) {
        Some(contents) => {
            *contents.borrow_mut() = StrTendril::from_slice(text);
            true
        }
        // Containers never carry a translation payload
        None => false,
    }
}
