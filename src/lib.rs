//! # Report Localizer Library
//!
//! 从生成好的 HTML 报告中提取可翻译文本，交给外部翻译服务，
//! 再把各语言译文回填到原文档的副本中，每种目标语言生成一份结构完全一致的文档。
//!
//! ## 模块组织
//!
//! - `core` - 流水线入口：读取报告、保存中间产物、写出本地化文档
//! - `extraction` - 选择器、标识符分配、CSV导出
//! - `translation` - 翻译表加载与译文回填
//! - `parsers` - HTML 解析与序列化
//! - `config` - TOML 配置文件
//! - `env` - 环境变量
//! - `error` - 错误类型与查找失败记录
//!
//! ## 使用示例
//!
//! ```rust
//! use report_localizer::extraction::{extract, ExtractOptions, SelectorSpec, SequentialIds};
//! use report_localizer::translation::{reinject, ReinjectOptions, TranslationTable};
//! use report_localizer::error::Diagnostics;
//!
//! let extraction = extract(
//!     b"<h1>Weekly Report</h1>",
//!     &SelectorSpec::new().with_tags(["h1"]),
//!     &ExtractOptions::default(),
//!     &mut SequentialIds::default(),
//! )
//! .unwrap();
//!
//! let mut diagnostics = Diagnostics::new();
//! let table = TranslationTable::from_reader(
//!     "id,French\nu1,Rapport hebdomadaire\n".as_bytes(),
//!     &["French"],
//!     &mut diagnostics,
//! )
//! .unwrap();
//!
//! let french = reinject(
//!     &extraction.tagged_html,
//!     &table.languages()[0],
//!     &ReinjectOptions::default(),
//!     &mut diagnostics,
//! )
//! .unwrap();
//! assert!(french.contains("<h1 id=\"u1\">Rapport hebdomadaire</h1>"));
//! ```

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod extraction;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use crate::core::{
    create_translated_documents, extract_report, format_output_path, save_extraction,
    LocalizationReport, ReportSource,
};
pub use error::{Diagnostics, LocalizerError, LocalizerResult, LookupMiss, PipelineStage};
