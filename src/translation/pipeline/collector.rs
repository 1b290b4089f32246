//! 文本收集器模块
//!
//! 深度优先遍历DOM，把可翻译文本节点按规范化文本分组，得到翻译单元映射

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use html5ever::tendril::StrTendril;
use markup5ever_rcdom::{Handle, NodeData};

use crate::translation::config::constants;

/// 翻译单元映射：规范化文本 -> 产生该文本的节点（文档顺序）
pub type TranslationUnitMap = HashMap<String, Vec<Handle>>;

/// 节点分类
#[derive(Debug)]
pub enum NodeKind<'a> {
    /// 可覆写的文本单元
    Text(&'a RefCell<StrTendril>),
    /// 容器节点；`ignorable` 为真时整棵子树都不参与翻译
    Container { ignorable: bool },
}

/// 规范化文本：去掉首尾空白，去掉换行后为空则返回 `None`
///
/// 返回的键是去掉首尾空白后的文本，而不是去掉换行后的文本。
pub fn normalize_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.replace('\n', "").is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// 收集统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub nodes_visited: usize,
    pub text_nodes_found: usize,
    pub blank_texts: usize,
    pub ignored_subtrees: usize,
    pub duplicate_texts: usize,
    pub unique_texts: usize,
}

impl CollectionStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// DOM文本收集器
#[derive(Debug, Clone)]
pub struct TextCollector {
    ignored_elements: HashSet<String>,
    stats: CollectionStats,
}

impl Default for TextCollector {
    fn default() -> Self {
        Self::new(constants::IGNORED_ELEMENTS.iter().copied())
    }
}

impl TextCollector {
    /// 使用给定的忽略元素集合创建收集器（大小写不敏感）
    pub fn new<I, S>(ignored_elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignored_elements: ignored_elements
                .into_iter()
                .map(|tag| tag.as_ref().to_lowercase())
                .collect(),
            stats: CollectionStats::default(),
        }
    }

    /// 对单个节点进行分类
    ///
    /// 文档节点与元素是容器；注释、doctype、处理指令没有可翻译内容，
    /// 按可忽略容器处理。
    pub fn classify<'a>(&self, node: &'a Handle) -> NodeKind<'a> {
        match node.data {
            NodeData::Text { ref contents } => NodeKind::Text(contents),
            NodeData::Element { ref name, .. } => NodeKind::Container {
                ignorable: self.is_ignored_element(name.local.as_ref()),
            },
            NodeData::Document => NodeKind::Container { ignorable: false },
            NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => NodeKind::Container { ignorable: true },
        }
    }

    /// 收集翻译单元
    pub fn collect_translation_units(&mut self, root: &Handle) -> TranslationUnitMap {
        let mut units = TranslationUnitMap::new();

        self.stats.reset();
        self.collect_recursive(root, &mut units);
        self.stats.unique_texts = units.len();

        tracing::debug!(
            "文本收集完成: 访问 {} 个节点, {} 个文本节点, {} 个唯一文本, {} 个重复, 跳过 {} 个子树",
            self.stats.nodes_visited,
            self.stats.text_nodes_found,
            self.stats.unique_texts,
            self.stats.duplicate_texts,
            self.stats.ignored_subtrees
        );

        units
    }

    /// 递归收集文本
    fn collect_recursive(&mut self, node: &Handle, units: &mut TranslationUnitMap) {
        self.stats.nodes_visited += 1;

        match self.classify(node) {
            NodeKind::Text(contents) => {
                self.stats.text_nodes_found += 1;

                let raw = contents.borrow();
                let Some(key) = normalize_text(&raw) else {
                    self.stats.blank_texts += 1;
                    return;
                };

                match units.get_mut(key) {
                    Some(nodes) => {
                        nodes.push(node.clone());
                        self.stats.duplicate_texts += 1;
                    }
                    None => {
                        units.insert(key.to_string(), vec![node.clone()]);
                    }
                }
            }
            NodeKind::Container { ignorable: true } => {
                self.stats.ignored_subtrees += 1;
            }
            NodeKind::Container { ignorable: false } => {
                for child in node.children.borrow().iter() {
                    self.collect_recursive(child, units);
                }
            }
        }
    }

    /// 检查是否应该跳过元素
    pub fn is_ignored_element(&self, tag_name: &str) -> bool {
        self.ignored_elements.contains(&tag_name.to_lowercase())
    }

    /// 获取收集统计信息
    pub fn get_stats(&self) -> &CollectionStats {
        &self.stats
    }
}

/// 使用默认忽略集合收集翻译单元
pub fn collect_translation_units(root: &Handle) -> TranslationUnitMap {
    TextCollector::default().collect_translation_units(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{find_nodes, markup_to_body};
    use std::rc::Rc;

    #[test]
    fn normalize_trims_but_keeps_inner_whitespace() {
        assert_eq!(normalize_text("  Hello world \n"), Some("Hello world"));
        assert_eq!(normalize_text("a\nb"), Some("a\nb"));
        assert_eq!(normalize_text(" \n\t\n "), None);
        assert_eq!(normalize_text("\n\n"), None);
        assert_eq!(normalize_text(""), None);
    }

    #[test]
    fn identical_texts_share_one_key_in_document_order() {
        let body = markup_to_body("<div><p> Hello </p><span>Hello</span><em>Bye</em></div>")
            .unwrap();
        let mut collector = TextCollector::default();
        let units = collector.collect_translation_units(&body);

        assert_eq!(units.len(), 2);
        let hello = &units["Hello"];
        assert_eq!(hello.len(), 2);

        let p_text = find_nodes(&body, "p")[0].children.borrow()[0].clone();
        let span_text = find_nodes(&body, "span")[0].children.borrow()[0].clone();
        assert!(Rc::ptr_eq(&hello[0], &p_text));
        assert!(Rc::ptr_eq(&hello[1], &span_text));

        assert_eq!(collector.get_stats().duplicate_texts, 1);
        assert_eq!(collector.get_stats().unique_texts, 2);
    }

    #[test]
    fn script_and_style_subtrees_are_skipped() {
        let body = markup_to_body(
            "<p>Visible</p><script>var x = 'Visible';</script><style>p { color: red }</style>",
        )
        .unwrap();
        let mut collector = TextCollector::default();
        let units = collector.collect_translation_units(&body);

        assert_eq!(units.keys().collect::<Vec<_>>(), vec!["Visible"]);
        assert_eq!(units["Visible"].len(), 1);
        assert_eq!(collector.get_stats().ignored_subtrees, 2);
    }

    #[test]
    fn custom_ignored_elements_are_case_insensitive() {
        let body = markup_to_body("<code>fn main()</code><p>Text</p>").unwrap();
        let units = TextCollector::new(["CODE"]).collect_translation_units(&body);

        assert!(units.contains_key("Text"));
        assert!(!units.contains_key("fn main()"));
    }

    #[test]
    fn ignored_container_drops_its_whole_subtree() {
        let body = markup_to_body(
            "<section><div><span><b>Deep</b></span><p>Deeper <i>still</i></p></div></section>\
             <p>Top</p>",
        )
        .unwrap();
        let mut collector = TextCollector::new(["section"]);
        let units = collector.collect_translation_units(&body);

        assert_eq!(units.keys().collect::<Vec<_>>(), vec!["Top"]);
        assert_eq!(collector.get_stats().ignored_subtrees, 1);
        assert_eq!(collector.get_stats().text_nodes_found, 1);
    }

    #[test]
    fn comments_are_never_collected() {
        let body = markup_to_body("<!-- Hello --><p>World</p>").unwrap();
        let units = collect_translation_units(&body);
        assert_eq!(units.len(), 1);
        assert!(units.contains_key("World"));
    }

    #[test]
    fn whitespace_only_tree_yields_empty_map() {
        let body = markup_to_body("<b>  \n  </b>").unwrap();
        let mut collector = TextCollector::default();
        let units = collector.collect_translation_units(&body);

        assert!(units.is_empty());
        assert_eq!(collector.get_stats().blank_texts, 1);
    }

    #[test]
    fn classify_distinguishes_text_and_containers() {
        let body = markup_to_body("<p>Hi</p><script>x</script>").unwrap();
        let collector = TextCollector::default();

        assert!(matches!(
            collector.classify(&body),
            NodeKind::Container { ignorable: false }
        ));
        let script = find_nodes(&body, "script").remove(0);
        assert!(matches!(
            collector.classify(&script),
            NodeKind::Container { ignorable: true }
        ));
        let text = find_nodes(&body, "p")[0].children.borrow()[0].clone();
        assert!(matches!(collector.classify(&text), NodeKind::Text(_)));
    }
}
