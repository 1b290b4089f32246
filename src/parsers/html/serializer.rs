use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};

/// 序列化文档
pub fn serialize_document(dom: RcDom, document_encoding: &str) -> std::io::Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.into();
    serialize(&mut buf, &serializable, SerializeOpts::default())?;

    Ok(encode_html(&String::from_utf8_lossy(&buf), document_encoding))
}

/// 按文档编码输出已序列化的标记；未知编码时保持 UTF-8
pub fn encode_html(html: &str, document_encoding: &str) -> Vec<u8> {
    match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) if !document_encoding.is_empty() => {
            let (data, _, _) = encoding.encode(html);
            data.into_owned()
        }
        _ => html.as_bytes().to_vec(),
    }
}

/// 序列化节点本身及其子树（outerHTML）
pub fn outer_html(node: &Handle) -> std::io::Result<String> {
    serialize_node(node, TraversalScope::IncludeNode)
}

/// 仅序列化子节点（innerHTML）
pub fn inner_html(node: &Handle) -> std::io::Result<String> {
    serialize_node(node, TraversalScope::ChildrenOnly(None))
}

fn serialize_node(node: &Handle, traversal_scope: TraversalScope) -> std::io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    let serializable: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    serialize(&mut buf, &serializable, opts)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
