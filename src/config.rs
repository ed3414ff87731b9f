//! 配置管理模块
//!
//! 从 TOML 文件加载选择器、目标语言和输出设置。库函数本身只接受显式参数，
//! 配置文件只由命令行入口读取。
//!
//! ```toml
//! languages = ["French", "Swedish"]
//! id_attribute = "id"
//! output_template = "%language%_report.html"
//! missing_markers = ["NaN"]
//!
//! [selectors]
//! tags = ["h1", "h2", "p", "li"]
//! classes = ["metadata"]
//! ids = ["main-title"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{helpers, LocalizerResult, PipelineStage};
use crate::extraction::{ExtractOptions, MixedContentPolicy, SelectorSpec};
use crate::translation::ReinjectOptions;

/// 配置常量
pub mod constants {
    pub const DEFAULT_ID_ATTRIBUTE: &str = "id";
    pub const DEFAULT_ENCODING: &str = "utf-8";
    pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%language%_report.html";
    pub const LANGUAGE_PLACEHOLDER: &str = "%language%";

    /// 表格工具导出空单元格时常见的占位值，需显式启用才视为“无译文”
    pub const DEFAULT_MISSING_MARKERS: &[&str] = &["NaN", "nan", "N/A", "#N/A", "NULL", "null"];

    pub const ID_COLUMN: &str = "id";
    pub const CONTENT_COLUMN: &str = "content";
}

/// 本地化配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizerConfig {
    pub selectors: SelectorSpec,
    pub languages: Vec<String>,
    pub id_attribute: String,
    pub output_template: String,
    pub encoding: String,
    pub mixed_content: MixedContentPolicy,
    /// 翻译表中额外视为“无译文”的单元格值，默认只有空白单元格
    pub missing_markers: Vec<String>,
    /// 回填工作线程数，`None` 时由 rayon 决定
    pub workers: Option<usize>,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            selectors: SelectorSpec::default(),
            languages: Vec::new(),
            id_attribute: constants::DEFAULT_ID_ATTRIBUTE.to_string(),
            output_template: constants::DEFAULT_OUTPUT_TEMPLATE.to_string(),
            encoding: constants::DEFAULT_ENCODING.to_string(),
            mixed_content: MixedContentPolicy::default(),
            missing_markers: Vec::new(),
            workers: None,
        }
    }
}

impl LocalizerConfig {
    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> LocalizerResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 从文件加载
    pub fn from_file(path: &Path) -> LocalizerResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| helpers::io_error(PipelineStage::Extract, path, e))?;
        let config = Self::from_toml_str(&content)?;

        tracing::debug!("已加载配置文件: {}", path.display());

        Ok(config)
    }

    /// 提取阶段所需的配置检查
    pub fn validate_for_extraction(&self) -> LocalizerResult<()> {
        if self.selectors.is_empty() {
            return Err(helpers::config_error("至少需要一个选择器条件（标签、class 或 id）"));
        }
        self.validate_common()
    }

    /// 回填阶段所需的配置检查
    pub fn validate_for_reinjection(&self) -> LocalizerResult<()> {
        if self.languages.is_empty() {
            return Err(helpers::config_error("至少需要一个目标语言"));
        }
        if !self
            .output_template
            .contains(constants::LANGUAGE_PLACEHOLDER)
        {
            return Err(helpers::config_error(format!(
                "输出文件模板必须包含 {}",
                constants::LANGUAGE_PLACEHOLDER
            )));
        }
        if self.workers == Some(0) {
            return Err(helpers::config_error("工作线程数必须大于0"));
        }
        self.validate_common()
    }

    fn validate_common(&self) -> LocalizerResult<()> {
        if self.id_attribute.trim().is_empty() {
            return Err(helpers::config_error("标识符属性名不能为空"));
        }
        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            id_attribute: self.id_attribute.clone(),
            encoding: self.encoding.clone(),
            mixed_content: self.mixed_content,
        }
    }

    pub fn reinject_options(&self) -> ReinjectOptions {
        ReinjectOptions {
            id_attribute: self.id_attribute.clone(),
            missing_markers: self.missing_markers.clone(),
            workers: self.workers,
        }
    }
}
