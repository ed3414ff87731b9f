//! 统一错误处理
//!
//! 致命错误（配置、解析、IO）通过 `LocalizerError` 返回并中止当前阶段；
//! 查找失败（选择器未命中、语言列缺失、元素缺失、译文缺失）不是错误，
//! 记录在 `Diagnostics` 中并以 warn 级别输出日志，处理继续进行。

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// 解析源文档并分配标识符
    Extract,
    /// 导出提取结果表
    Export,
    /// 加载翻译表
    Load,
    /// 回填译文
    Reinject,
    /// 写出本地化文档
    Write,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Extract => "extract",
            PipelineStage::Export => "export",
            PipelineStage::Load => "load",
            PipelineStage::Reinject => "reinject",
            PipelineStage::Write => "write",
        };
        f.write_str(name)
    }
}

/// 本地化流水线错误类型
#[derive(Error, Debug)]
pub enum LocalizerError {
    /// 配置错误（在任何 IO 之前检测）
    #[error("配置错误: {0}")]
    Config(String),

    /// 被选中的元素包含子元素，无法安全地整体替换文本
    #[error("配置错误: <{tag}> 元素包含子元素，不能作为提取目标 (文本: {text:?})")]
    MixedContent { tag: String, text: String },

    /// 文档或表格解析错误
    #[error("[{stage}] 解析错误: {message}")]
    Parse {
        stage: PipelineStage,
        message: String,
    },

    /// CSV 读写错误
    #[error("[{stage}] CSV错误: {source}")]
    Csv {
        stage: PipelineStage,
        #[source]
        source: csv::Error,
    },

    /// 配置文件解析错误
    #[error("TOML解析错误: {0}")]
    Toml(#[from] toml::de::Error),

    /// 文件读写错误
    #[error("[{stage}] IO错误 ({}): {source}", .path.display())]
    Io {
        stage: PipelineStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Parsing,
    Io,
}

impl LocalizerError {
    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            LocalizerError::Config(_) | LocalizerError::MixedContent { .. } => {
                ErrorCategory::Configuration
            }
            LocalizerError::Parse { .. } | LocalizerError::Toml(_) => ErrorCategory::Parsing,
            LocalizerError::Csv { source, .. } => {
                if source.is_io_error() {
                    ErrorCategory::Io
                } else {
                    ErrorCategory::Parsing
                }
            }
            LocalizerError::Io { .. } => ErrorCategory::Io,
        }
    }

    /// 获取出错的阶段（如果已知）
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            LocalizerError::Parse { stage, .. }
            | LocalizerError::Csv { stage, .. }
            | LocalizerError::Io { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// 错误结果类型别名
pub type LocalizerResult<T> = Result<T, LocalizerError>;

/// 错误处理助手函数
pub mod helpers {
    use std::fmt;
    use std::path::Path;

    use super::*;

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> LocalizerError {
        LocalizerError::Config(msg.to_string())
    }

    /// 创建解析错误
    pub fn parse_error<T: fmt::Display>(stage: PipelineStage, msg: T) -> LocalizerError {
        LocalizerError::Parse {
            stage,
            message: msg.to_string(),
        }
    }

    /// 包装 IO 错误
    pub fn io_error(stage: PipelineStage, path: &Path, source: std::io::Error) -> LocalizerError {
        LocalizerError::Io {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }

    /// 包装 CSV 错误
    pub fn csv_error(stage: PipelineStage, source: csv::Error) -> LocalizerError {
        LocalizerError::Csv { stage, source }
    }
}

/// 非致命的查找失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
    /// 按 id 选择的目标在文档中不存在
    SelectorTargetMissing { id: String },
    /// 请求的语言不在翻译表表头中
    LanguageMissing { language: String },
    /// 回填时找不到带该标识符的元素
    ElementMissing { language: String, id: String },
    /// 翻译表中该标识符的译文为空
    TranslationMissing { language: String, id: String },
    /// 按策略跳过的混合内容元素
    MixedContentSkipped { tag: String },
    /// 两种语言生成了同一个输出文件名，后者被跳过
    OutputPathClash { language: String, path: String },
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMiss::SelectorTargetMissing { id } => {
                write!(f, "选择器目标 id={id} 不存在，已跳过")
            }
            LookupMiss::LanguageMissing { language } => {
                write!(f, "翻译表中没有 {language} 列，已跳过该语言")
            }
            LookupMiss::ElementMissing { language, id } => {
                write!(f, "[{language}] 文档中找不到 id={id} 的元素")
            }
            LookupMiss::TranslationMissing { language, id } => {
                write!(f, "[{language}] id={id} 没有可用译文，保留原文")
            }
            LookupMiss::MixedContentSkipped { tag } => {
                write!(f, "<{tag}> 元素包含子元素，已跳过")
            }
            LookupMiss::OutputPathClash { language, path } => {
                write!(f, "[{language}] 输出文件 {path} 已被其他语言占用，已跳过")
            }
        }
    }
}

/// 一个阶段内收集的查找失败
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    misses: Vec<LookupMiss>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录查找失败并输出警告日志
    pub fn record(&mut self, miss: LookupMiss) {
        tracing::warn!("{}", miss);
        self.misses.push(miss);
    }

    /// 合并另一个阶段（或另一个工作线程）的记录，不重复输出日志
    pub fn merge(&mut self, other: Diagnostics) {
        self.misses.extend(other.misses);
    }

    pub fn misses(&self) -> &[LookupMiss] {
        &self.misses
    }

    pub fn len(&self) -> usize {
        self.misses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.misses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            helpers::config_error("no selectors").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            helpers::parse_error(PipelineStage::Load, "bad header").category(),
            ErrorCategory::Parsing
        );

        let io = helpers::io_error(
            PipelineStage::Write,
            std::path::Path::new("/tmp/x.html"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(io.category(), ErrorCategory::Io);
        assert_eq!(io.stage(), Some(PipelineStage::Write));
    }

    #[test]
    fn test_error_display_includes_stage() {
        let error = helpers::parse_error(PipelineStage::Load, "missing header row");
        assert_eq!(error.to_string(), "[load] 解析错误: missing header row");
    }

    #[test]
    fn test_diagnostics_merge() {
        let mut first = Diagnostics::new();
        first.record(LookupMiss::LanguageMissing {
            language: "Klingon".to_string(),
        });

        let mut second = Diagnostics::new();
        second.record(LookupMiss::ElementMissing {
            language: "French".to_string(),
            id: "u9".to_string(),
        });

        first.merge(second);
        assert_eq!(first.len(), 2);
        assert!(matches!(
            first.misses()[1],
            LookupMiss::ElementMissing { .. }
        ));
    }
}
