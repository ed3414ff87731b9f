//! 翻译表加载
//!
//! 翻译服务返回的 CSV 以 `id` 列开头，其余每列对应一种目标语言。
//! 空单元格记为“无译文”（`None`），不会被当作空字符串回填。
//! `NaN`、`N/A` 之类的值默认按普通译文处理，只有显式配置为缺失标记时才视为无译文。

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use crate::config::constants;
use crate::error::{helpers, Diagnostics, LocalizerResult, LookupMiss, PipelineStage};

/// 一条译文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub id: String,
    pub text: Option<String>,
}

/// 单一语言的译文映射，保持表中行的顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTranslations {
    pub language: String,
    pub entries: Vec<TranslationEntry>,
}

impl LanguageTranslations {
    /// 查找标识符对应的译文；外层 `None` 表示表中没有该标识符
    pub fn get(&self, id: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.id == id)
            .map(|entry| entry.text.as_deref())
    }

    /// 每个标识符只保留表中最后一行，顺序为该行在表中的位置
    pub fn latest_entries(&self) -> Vec<&TranslationEntry> {
        let last_row: HashMap<&str, usize> = self
            .entries
            .iter()
            .enumerate()
            .map(|(row, entry)| (entry.id.as_str(), row))
            .collect();

        self.entries
            .iter()
            .enumerate()
            .filter(|(row, entry)| last_row.get(entry.id.as_str()) == Some(row))
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 按请求语言顺序排列的翻译表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    languages: Vec<LanguageTranslations>,
}

impl TranslationTable {
    /// 从 CSV 文件加载，只有空白单元格视为无译文
    pub fn from_path<S: AsRef<str>>(
        path: &Path,
        languages: &[S],
        diagnostics: &mut Diagnostics,
    ) -> LocalizerResult<Self> {
        Self::from_path_with_markers(path, languages, &[], diagnostics)
    }

    /// 从 CSV 文件加载，`missing_markers` 中的值也视为无译文
    pub fn from_path_with_markers<S: AsRef<str>>(
        path: &Path,
        languages: &[S],
        missing_markers: &[String],
        diagnostics: &mut Diagnostics,
    ) -> LocalizerResult<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| helpers::io_error(PipelineStage::Load, path, e))?;
        let table = Self::from_reader_with_markers(file, languages, missing_markers, diagnostics)?;

        tracing::info!(
            "已从 {} 加载 {} 种语言的译文",
            path.display(),
            table.languages.len()
        );

        Ok(table)
    }

    /// 从任意 reader 加载
    ///
    /// 表头中存在但未请求的语言被忽略；请求了但表头中没有的语言记录一次查找失败并跳过。
    pub fn from_reader<R: Read, S: AsRef<str>>(
        reader: R,
        languages: &[S],
        diagnostics: &mut Diagnostics,
    ) -> LocalizerResult<Self> {
        Self::from_reader_with_markers(reader, languages, &[], diagnostics)
    }

    pub fn from_reader_with_markers<R: Read, S: AsRef<str>>(
        reader: R,
        languages: &[S],
        missing_markers: &[String],
        diagnostics: &mut Diagnostics,
    ) -> LocalizerResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| helpers::csv_error(PipelineStage::Load, e))?
            .iter()
            .enumerate()
            .map(|(i, header)| {
                if i == 0 {
                    header.trim_start_matches('\u{feff}').to_string()
                } else {
                    header.to_string()
                }
            })
            .collect();

        if headers.iter().all(|header| header.trim().is_empty()) {
            return Err(helpers::parse_error(PipelineStage::Load, "翻译表缺少表头"));
        }

        let id_column = match headers.iter().position(|h| h == constants::ID_COLUMN) {
            Some(position) => position,
            None => {
                tracing::debug!("翻译表没有 id 列，使用第一列 {:?} 作为标识符", headers[0]);
                0
            }
        };

        let mut requested: HashSet<&str> = HashSet::new();
        let mut columns: Vec<(usize, LanguageTranslations)> = Vec::new();

        for language in languages.iter().map(AsRef::as_ref) {
            if !requested.insert(language) {
                continue;
            }

            let position = headers
                .iter()
                .enumerate()
                .find(|(i, header)| *i != id_column && header.as_str() == language)
                .map(|(i, _)| i);

            match position {
                Some(position) => columns.push((
                    position,
                    LanguageTranslations {
                        language: language.to_string(),
                        entries: Vec::new(),
                    },
                )),
                None => diagnostics.record(LookupMiss::LanguageMissing {
                    language: language.to_string(),
                }),
            }
        }

        for (row, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| helpers::csv_error(PipelineStage::Load, e))?;

            let id = record.get(id_column).map(str::trim).unwrap_or_default();
            if id.is_empty() {
                // 表头之后的行号从 2 开始
                tracing::debug!("翻译表第 {} 行没有标识符，已忽略", row + 2);
                continue;
            }

            for (position, translations) in columns.iter_mut() {
                let text = record
                    .get(*position)
                    .filter(|cell| !is_missing(cell, missing_markers))
                    .map(str::to_string);

                translations.entries.push(TranslationEntry {
                    id: id.to_string(),
                    text,
                });
            }
        }

        Ok(Self {
            languages: columns.into_iter().map(|(_, t)| t).collect(),
        })
    }

    pub fn languages(&self) -> &[LanguageTranslations] {
        &self.languages
    }

    pub fn language(&self, name: &str) -> Option<&LanguageTranslations> {
        self.languages.iter().find(|t| t.language == name)
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// 单元格是否表示“无译文”
fn is_missing(cell: &str, missing_markers: &[String]) -> bool {
    let cell = cell.trim();
    cell.is_empty() || missing_markers.iter().any(|marker| marker == cell)
}
