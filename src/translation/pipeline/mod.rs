//! 翻译管道：从DOM中收集并去重可翻译文本

pub mod collector;

pub use collector::{
    collect_translation_units, normalize_text, CollectionStats, NodeKind, TextCollector,
    TranslationUnitMap,
};
