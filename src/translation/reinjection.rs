//! 译文回填引擎
//!
//! 每种语言都从标记文档文本重新解析出一棵独立的树，替换带标识符元素的文本后再序列化。
//! 树基于 `Rc`，不能跨线程共享；并行回填时每个工作线程只持有自己的树，
//! 线程之间传递的只有文本和译文映射。

use std::collections::HashMap;

use markup5ever_rcdom::Handle;
use rayon::prelude::*;

use crate::config::constants;
use crate::error::{helpers, Diagnostics, LocalizerResult, LookupMiss, PipelineStage};
use crate::parsers::html::{
    for_each_element, get_node_attr, html_to_dom, replace_text_content, serialize_document,
    text_content,
};

use super::table::{LanguageTranslations, TranslationTable};

/// 回填选项
#[derive(Debug, Clone)]
pub struct ReinjectOptions {
    /// 承载标识符的属性名，需与提取时一致
    pub id_attribute: String,
    /// 加载翻译表时额外视为“无译文”的单元格值
    pub missing_markers: Vec<String>,
    /// 并行工作线程数，`None` 时使用 rayon 全局线程池
    pub workers: Option<usize>,
}

impl Default for ReinjectOptions {
    fn default() -> Self {
        Self {
            id_attribute: constants::DEFAULT_ID_ATTRIBUTE.to_string(),
            missing_markers: Vec::new(),
            workers: None,
        }
    }
}

/// 单一语言的本地化文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedDocument {
    pub language: String,
    pub html: String,
}

/// 建立 标识符 → 元素 的索引，重复的标识符只保留文档中第一个
fn index_elements(document: &Handle, id_attribute: &str) -> HashMap<String, Handle> {
    let mut index: HashMap<String, Handle> = HashMap::new();

    for_each_element(document, &mut |node| {
        if let Some(id) = get_node_attr(node, id_attribute) {
            if !id.is_empty() {
                index.entry(id).or_insert_with(|| node.clone());
            }
        }
    });

    index
}

/// 将一种语言的译文回填到标记文档
pub fn reinject(
    tagged_html: &str,
    translations: &LanguageTranslations,
    options: &ReinjectOptions,
    diagnostics: &mut Diagnostics,
) -> LocalizerResult<String> {
    let dom = html_to_dom(
        tagged_html.as_bytes(),
        constants::DEFAULT_ENCODING,
        PipelineStage::Reinject,
    )?;
    let index = index_elements(&dom.document, &options.id_attribute);
    let language = translations.language.as_str();
    let mut replaced = 0usize;

    // 同一标识符出现多行时以最后一行为准
    for entry in translations.latest_entries() {
        let Some(node) = index.get(&entry.id) else {
            diagnostics.record(LookupMiss::ElementMissing {
                language: language.to_string(),
                id: entry.id.clone(),
            });
            continue;
        };

        match entry.text.as_deref() {
            Some(text) => {
                // 译文与原文相同时不动节点，保证空操作回填得到完全一致的文档
                if text_content(node).trim() != text {
                    replace_text_content(node, text);
                }
                replaced += 1;
            }
            None => diagnostics.record(LookupMiss::TranslationMissing {
                language: language.to_string(),
                id: entry.id.clone(),
            }),
        }
    }

    tracing::debug!(
        "[{}] 回填 {}/{} 条译文",
        language,
        replaced,
        translations.len()
    );

    serialize_document(&dom, PipelineStage::Reinject)
}

/// 为翻译表中的每种语言生成本地化文档
///
/// 各语言相互独立，在 rayon 线程池中并行执行；结果与诊断信息按表中语言顺序返回。
/// 任一语言出现致命错误时返回第一个错误。
pub fn reinject_all(
    tagged_html: &str,
    table: &TranslationTable,
    options: &ReinjectOptions,
) -> LocalizerResult<(Vec<LocalizedDocument>, Diagnostics)> {
    let run = || {
        table
            .languages()
            .par_iter()
            .map(|translations| {
                let mut diagnostics = Diagnostics::new();
                let html = reinject(tagged_html, translations, options, &mut diagnostics)?;
                Ok((
                    LocalizedDocument {
                        language: translations.language.clone(),
                        html,
                    },
                    diagnostics,
                ))
            })
            .collect::<LocalizerResult<Vec<_>>>()
    };

    let results = match options.workers {
        Some(workers) => rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| helpers::config_error(format!("无法创建回填线程池: {e}")))?
            .install(run)?,
        None => run()?,
    };

    let mut documents = Vec::with_capacity(results.len());
    let mut diagnostics = Diagnostics::new();
    for (document, language_diagnostics) in results {
        documents.push(document);
        diagnostics.merge(language_diagnostics);
    }

    Ok((documents, diagnostics))
}
