//! 标识符分配器
//!
//! 为每个非空文本的选中元素生成唯一标识符，写回元素属性，并记录 `{id, content}`。

use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Diagnostics, LocalizerError, LocalizerResult, LookupMiss};
use crate::parsers::html::{get_node_name, has_element_children, set_node_attr, text_content};

use super::{ExtractOptions, MixedContentPolicy};

/// 提取出的文本单元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedUnit {
    pub id: String,
    pub content: String,
}

/// 标识符来源
pub trait IdentifierSource {
    fn next_id(&mut self) -> String;
}

/// 随机 UUID v4（默认）
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUuids;

impl IdentifierSource for RandomUuids {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// 可复现的 UUID：由种子派生命名空间，再按序号生成 v5 UUID
///
/// 只在调用方显式要求可复现时使用，相同种子的两次运行会得到相同的标识符。
#[derive(Debug, Clone)]
pub struct SeededUuids {
    namespace: Uuid,
    counter: u64,
}

impl SeededUuids {
    pub fn new(seed: &str) -> Self {
        Self {
            namespace: Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()),
            counter: 0,
        }
    }
}

impl IdentifierSource for SeededUuids {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        Uuid::new_v5(&self.namespace, &self.counter.to_be_bytes()).to_string()
    }
}

/// 顺序标识符（`u1`, `u2`, ...），用于测试
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("u")
    }
}

impl IdentifierSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// 为选中的元素分配标识符
///
/// 文本（去除首尾空白）为空的元素既不打标也不导出。元素上已有的标识符属性会被覆盖，
/// 所以对已打标的文档再次提取会得到一组全新的标识符。
///
/// 在修改任何节点之前先检查混合内容，`Reject` 策略下出错时树保持原样。
pub fn assign_identifiers(
    selected: &[Handle],
    options: &ExtractOptions,
    source: &mut dyn IdentifierSource,
    diagnostics: &mut Diagnostics,
) -> LocalizerResult<Vec<ExtractedUnit>> {
    let mut targets: Vec<(&Handle, String)> = Vec::with_capacity(selected.len());

    for node in selected {
        let text = text_content(node);
        let content = text.trim();
        let tag = get_node_name(node).unwrap_or_default();

        if content.is_empty() {
            tracing::debug!("跳过空文本元素 <{}>", tag);
            continue;
        }

        if has_element_children(node) {
            match options.mixed_content {
                MixedContentPolicy::Reject => {
                    return Err(LocalizerError::MixedContent {
                        tag: tag.to_string(),
                        text: content.to_string(),
                    });
                }
                MixedContentPolicy::Skip => {
                    diagnostics.record(LookupMiss::MixedContentSkipped {
                        tag: tag.to_string(),
                    });
                    continue;
                }
            }
        }

        targets.push((node, content.to_string()));
    }

    let units = targets
        .into_iter()
        .map(|(node, content)| {
            let id = source.next_id();
            set_node_attr(node, &options.id_attribute, &id);
            ExtractedUnit { id, content }
        })
        .collect();

    Ok(units)
}
