//! # 译文处理模块
//!
//! - `table` - 加载翻译服务返回的多语言 CSV
//! - `reinjection` - 把译文回填到标记文档，每种语言生成一份文档

pub mod reinjection;
pub mod table;

pub use reinjection::{reinject, reinject_all, LocalizedDocument, ReinjectOptions};
pub use table::{LanguageTranslations, TranslationEntry, TranslationTable};
