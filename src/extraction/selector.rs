//! 选择器引擎
//!
//! 按标签名、class 和 id 三类条件（取并集）定位需要提取文本的元素。
//! 结果顺序固定：先是所有标签匹配（文档顺序），然后是尚未产出的 class 匹配，
//! 最后是尚未产出的 id 匹配。同一元素只会出现一次，去重依据是节点身份而不是文本。

use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use markup5ever_rcdom::{Handle, Node};
use serde::{Deserialize, Serialize};

use crate::error::{Diagnostics, LookupMiss};
use crate::parsers::html::{for_each_element, get_node_attr, get_node_name, split_class_list};

/// 选择器配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSpec {
    /// 标签名
    pub tags: BTreeSet<String>,
    /// CSS class
    pub classes: BTreeSet<String>,
    /// 元素 id
    pub ids: BTreeSet<String>,
}

impl SelectorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// 报告模板使用的默认选择器
    pub fn report_defaults() -> Self {
        Self::new()
            .with_tags(["h1", "h2", "h3", "h4", "h5", "h6", "p", "th", "li"])
            .with_classes(["metadata"])
            .with_ids(["main-title", "section-header"])
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .extend(tags.into_iter().map(|tag| tag.into().to_ascii_lowercase()));
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// 没有任何条件时为配置错误
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.classes.is_empty() && self.ids.is_empty()
    }

    fn matches_tag(&self, node: &Handle) -> bool {
        get_node_name(node)
            .map(|name| self.tags.iter().any(|tag| tag.eq_ignore_ascii_case(name)))
            .unwrap_or(false)
    }

    fn matches_class(&self, node: &Handle) -> bool {
        get_node_attr(node, "class")
            .map(|value| split_class_list(&value).any(|class| self.classes.contains(class)))
            .unwrap_or(false)
    }
}

/// 查找与选择器匹配的元素
///
/// id 条件采用宽松查找：某个 id 在文档中不存在时只记录一次查找失败，
/// 因为不同报告模板包含的区块并不一致。
pub fn select_elements(
    document: &Handle,
    spec: &SelectorSpec,
    diagnostics: &mut Diagnostics,
) -> Vec<Handle> {
    let mut selected: Vec<Handle> = Vec::new();
    let mut seen: HashSet<*const Node> = HashSet::new();

    let mut push_unique = |node: &Handle, selected: &mut Vec<Handle>| {
        if seen.insert(Rc::as_ptr(node)) {
            selected.push(node.clone());
        }
    };

    if !spec.tags.is_empty() {
        for_each_element(document, &mut |node| {
            if spec.matches_tag(node) {
                push_unique(node, &mut selected);
            }
        });
    }

    if !spec.classes.is_empty() {
        for_each_element(document, &mut |node| {
            if spec.matches_class(node) {
                push_unique(node, &mut selected);
            }
        });
    }

    if !spec.ids.is_empty() {
        let mut found_ids: HashSet<String> = HashSet::new();
        for_each_element(document, &mut |node| {
            if let Some(id) = get_node_attr(node, "id") {
                // 只取每个 id 的第一个元素
                if spec.ids.contains(&id) && found_ids.insert(id) {
                    push_unique(node, &mut selected);
                }
            }
        });

        for id in spec.ids.iter().filter(|id| !found_ids.contains(*id)) {
            diagnostics.record(LookupMiss::SelectorTargetMissing { id: id.clone() });
        }
    }

    tracing::debug!("选择器命中 {} 个元素", selected.len());

    selected
}
