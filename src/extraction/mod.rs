//! # 文本提取模块
//!
//! - `selector` - 选择器引擎，按标签/class/id 定位元素
//! - `identifier` - 标识符分配器，为元素打标并记录 `{id, content}`
//! - `exporter` - 以 CSV 导出提取结果
//!
//! 一次提取是单遍的：解析 → 选择 → 打标 → 序列化标记文档。

pub mod exporter;
pub mod identifier;
pub mod selector;

use serde::{Deserialize, Serialize};

use crate::config::constants;
use crate::error::{helpers, Diagnostics, LocalizerResult, PipelineStage};
use crate::parsers::html::{declare_utf8_charset, html_to_dom, serialize_document};

pub use exporter::{export_units, write_units};
pub use identifier::{
    assign_identifiers, ExtractedUnit, IdentifierSource, RandomUuids, SeededUuids, SequentialIds,
};
pub use selector::{select_elements, SelectorSpec};

/// 混合内容（选中元素含子元素）的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixedContentPolicy {
    /// 视为配置错误
    #[default]
    Reject,
    /// 跳过该元素并记录警告
    Skip,
}

/// 提取选项
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// 承载标识符的属性名
    pub id_attribute: String,
    /// 源文档字符集
    pub encoding: String,
    pub mixed_content: MixedContentPolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            id_attribute: constants::DEFAULT_ID_ATTRIBUTE.to_string(),
            encoding: constants::DEFAULT_ENCODING.to_string(),
            mixed_content: MixedContentPolicy::default(),
        }
    }
}

/// 一次提取的结果
#[derive(Debug, Clone)]
pub struct Extraction {
    pub units: Vec<ExtractedUnit>,
    /// 打标后的文档，后续阶段以它为准
    pub tagged_html: String,
    pub diagnostics: Diagnostics,
}

/// 检查提取参数，在读取任何文件之前调用
pub fn validate_inputs(spec: &SelectorSpec, options: &ExtractOptions) -> LocalizerResult<()> {
    if spec.is_empty() {
        return Err(helpers::config_error("至少需要一个选择器条件（标签、class 或 id）"));
    }
    if options.id_attribute.trim().is_empty() {
        return Err(helpers::config_error("标识符属性名不能为空"));
    }
    Ok(())
}

/// 从报告中提取可翻译文本并生成标记文档
pub fn extract(
    html: &[u8],
    spec: &SelectorSpec,
    options: &ExtractOptions,
    source: &mut dyn IdentifierSource,
) -> LocalizerResult<Extraction> {
    validate_inputs(spec, options)?;

    let dom = html_to_dom(html, &options.encoding, PipelineStage::Extract)?;
    let mut diagnostics = Diagnostics::new();

    let selected = select_elements(&dom.document, spec, &mut diagnostics);
    let units = assign_identifiers(&selected, options, source, &mut diagnostics)?;

    // 标记文档及其后的所有产物都以 UTF-8 写出
    if declare_utf8_charset(&dom.document) > 0 {
        tracing::debug!("已将文档声明的字符集 {} 改为 utf-8", options.encoding);
    }
    let tagged_html = serialize_document(&dom, PipelineStage::Extract)?;

    tracing::info!(
        "提取完成: 选中 {} 个元素，导出 {} 条文本",
        selected.len(),
        units.len()
    );

    Ok(Extraction {
        units,
        tagged_html,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocalizerError;

    #[test]
    fn test_extract_requires_selectors() {
        let result = extract(
            b"<p>Hello</p>",
            &SelectorSpec::new(),
            &ExtractOptions::default(),
            &mut SequentialIds::default(),
        );

        assert!(matches!(result, Err(LocalizerError::Config(_))));
    }

    #[test]
    fn test_extract_tags_document() {
        let extraction = extract(
            b"<p id=\"\">Hello</p><p id=\"\">Hello</p>",
            &SelectorSpec::new().with_tags(["p"]),
            &ExtractOptions::default(),
            &mut SequentialIds::default(),
        )
        .unwrap();

        assert_eq!(extraction.units.len(), 2);
        assert!(extraction
            .tagged_html
            .contains("<p id=\"u1\">Hello</p><p id=\"u2\">Hello</p>"));
    }

    #[test]
    fn test_legacy_charset_is_redeclared_as_utf8() {
        let options = ExtractOptions {
            encoding: "windows-1252".to_string(),
            ..ExtractOptions::default()
        };
        let extraction = extract(
            b"<html><head><meta charset=\"windows-1252\"></head><body><p>caf\xe9</p></body></html>",
            &SelectorSpec::new().with_tags(["p"]),
            &options,
            &mut SequentialIds::default(),
        )
        .unwrap();

        assert_eq!(extraction.units[0].content, "café");
        assert!(extraction.tagged_html.contains("<meta charset=\"utf-8\">"));
        assert!(!extraction.tagged_html.contains("windows-1252"));
    }

    #[test]
    fn test_custom_id_attribute() {
        let options = ExtractOptions {
            id_attribute: "data-l10n-id".to_string(),
            ..ExtractOptions::default()
        };
        let extraction = extract(
            b"<p id=\"intro\">Hello</p>",
            &SelectorSpec::new().with_tags(["p"]),
            &options,
            &mut SequentialIds::default(),
        )
        .unwrap();

        assert!(extraction
            .tagged_html
            .contains("<p id=\"intro\" data-l10n-id=\"u1\">Hello</p>"));
    }
}
