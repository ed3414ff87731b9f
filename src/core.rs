use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::config::constants;
use crate::error::{helpers, Diagnostics, LocalizerResult, LookupMiss, PipelineStage};
use crate::extraction::{
    export_units, extract, validate_inputs, ExtractOptions, Extraction, IdentifierSource,
    SelectorSpec,
};
use crate::translation::{reinject_all, ReinjectOptions, TranslationTable};

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Where the source report comes from
#[derive(Debug, Clone)]
pub enum ReportSource {
    /// A report file on disk, decoded with the configured charset
    File(PathBuf),
    /// An in-memory report produced by the rendering step
    Html(String),
}

impl ReportSource {
    fn read(&self) -> LocalizerResult<Cow<'_, [u8]>> {
        match self {
            ReportSource::File(path) => fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| helpers::io_error(PipelineStage::Extract, path, e)),
            ReportSource::Html(html) => Ok(Cow::Borrowed(html.as_bytes())),
        }
    }
}

/// Outcome of writing localized documents
#[derive(Debug, Clone, Default)]
pub struct LocalizationReport {
    /// One path per successfully matched language, in requested order
    pub paths: Vec<PathBuf>,
    /// Lookup misses from both loading and reinjection
    pub diagnostics: Diagnostics,
}

/// Extracts translatable text from a report and tags it
///
/// Selectors and options are validated before the source is read.
///
/// # Arguments
///
/// * `source` - The report file or HTML string
/// * `spec` - Selector criteria
/// * `options` - Identifier attribute, charset and mixed-content policy
/// * `id_source` - Identifier generator
pub fn extract_report(
    source: &ReportSource,
    spec: &SelectorSpec,
    options: &ExtractOptions,
    id_source: &mut dyn IdentifierSource,
) -> LocalizerResult<Extraction> {
    validate_inputs(spec, options)?;

    let data = source.read()?;
    extract(&data, spec, options, id_source)
}

/// Persists the two durable artifacts of an extraction
///
/// The tagged document is written first; together with the export file it is
/// all that is needed to resume from the translation-loading step.
pub fn save_extraction(
    extraction: &Extraction,
    export_path: &Path,
    tagged_path: &Path,
) -> LocalizerResult<()> {
    fs::write(tagged_path, &extraction.tagged_html)
        .map_err(|e| helpers::io_error(PipelineStage::Export, tagged_path, e))?;
    tracing::info!("标记文档已保存到 {}", tagged_path.display());

    export_units(export_path, &extraction.units)
}

/// Creates one localized document per requested language
///
/// Languages missing from the translation table are skipped with a warning,
/// so the number of written files may be smaller than `languages.len()`.
/// A language whose file name was already produced by an earlier language is
/// skipped with a warning as well; the earlier file is kept.
///
/// # Arguments
///
/// * `tagged_path` - The tagged document saved by the extraction run
/// * `translations_path` - CSV returned by the translation service
/// * `output_dir` - Directory for the localized documents (created if missing)
/// * `languages` - Requested target languages, matched exactly against the CSV header
/// * `output_template` - File name template containing `%language%`
/// * `options` - Identifier attribute, missing-cell markers and worker count
pub fn create_translated_documents<S: AsRef<str>>(
    tagged_path: &Path,
    translations_path: &Path,
    output_dir: &Path,
    languages: &[S],
    output_template: &str,
    options: &ReinjectOptions,
) -> LocalizerResult<LocalizationReport> {
    if languages.is_empty() {
        return Err(helpers::config_error("至少需要一个目标语言"));
    }
    if !output_template.contains(constants::LANGUAGE_PLACEHOLDER) {
        return Err(helpers::config_error(format!(
            "输出文件模板必须包含 {}",
            constants::LANGUAGE_PLACEHOLDER
        )));
    }

    let tagged_html = fs::read_to_string(tagged_path)
        .map_err(|e| helpers::io_error(PipelineStage::Reinject, tagged_path, e))?;

    let mut diagnostics = Diagnostics::new();
    let table = TranslationTable::from_path_with_markers(
        translations_path,
        languages,
        &options.missing_markers,
        &mut diagnostics,
    )?;

    let (documents, reinject_diagnostics) = reinject_all(&tagged_html, &table, options)?;
    diagnostics.merge(reinject_diagnostics);

    fs::create_dir_all(output_dir)
        .map_err(|e| helpers::io_error(PipelineStage::Write, output_dir, e))?;

    let mut paths = Vec::with_capacity(documents.len());
    let mut written: HashSet<PathBuf> = HashSet::new();
    for document in &documents {
        let path = output_dir.join(format_output_path(output_template, &document.language));
        if !written.insert(path.clone()) {
            diagnostics.record(LookupMiss::OutputPathClash {
                language: document.language.clone(),
                path: path.display().to_string(),
            });
            continue;
        }

        fs::write(&path, &document.html)
            .map_err(|e| helpers::io_error(PipelineStage::Write, &path, e))?;

        tracing::info!("{} 版本已保存到 {}", document.language, path.display());
        paths.push(path);
    }

    Ok(LocalizationReport { paths, diagnostics })
}

/// Turns a language name into a file name component
pub fn language_file_stem(language: &str) -> String {
    language
        .trim()
        .replace(' ', "_")
        .to_lowercase()
        .replace(['/', '\\'], "_")
        .replace(['<', '>', ':', '"', '|', '?', '*'], "")
        .trim_start_matches('.')
        .to_string()
}

/// Expands an output file name template
///
/// `%language%` becomes the lower-cased language with spaces replaced,
/// `%timestamp%` becomes the current UTC time.
pub fn format_output_path(template: &str, language: &str) -> String {
    let datetime: &str = &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    template
        .replace("%timestamp%", &datetime.replace(':', "_"))
        .replace(constants::LANGUAGE_PLACEHOLDER, &language_file_stem(language))
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str, use_color: bool) {
    if use_color {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocalizerError;
    use crate::extraction::SequentialIds;

    #[test]
    fn test_language_file_stem() {
        assert_eq!(language_file_stem("French"), "french");
        assert_eq!(language_file_stem("Brazilian Portuguese"), "brazilian_portuguese");
        assert_eq!(language_file_stem("../Chinese/Simplified"), "_chinese_simplified");
    }

    #[test]
    fn test_extract_report_validates_before_reading() {
        let result = extract_report(
            &ReportSource::File(PathBuf::from("/definitely/not/here.html")),
            &SelectorSpec::new(),
            &ExtractOptions::default(),
            &mut SequentialIds::default(),
        );

        assert!(matches!(result, Err(LocalizerError::Config(_))));
    }

    #[test]
    fn test_extract_report_missing_file_is_io_error() {
        let result = extract_report(
            &ReportSource::File(PathBuf::from("/definitely/not/here.html")),
            &SelectorSpec::new().with_tags(["p"]),
            &ExtractOptions::default(),
            &mut SequentialIds::default(),
        );

        assert!(matches!(
            result,
            Err(LocalizerError::Io {
                stage: PipelineStage::Extract,
                ..
            })
        ));
    }

    #[test]
    fn test_clashing_output_names_keep_first_language() {
        let dir = tempfile::tempdir().unwrap();
        let tagged_path = dir.path().join("tagged.html");
        let translations_path = dir.path().join("table.csv");
        fs::write(&tagged_path, "<p id=\"u1\">Hello</p>").unwrap();
        fs::write(
            &translations_path,
            "id,Chinese Simplified,chinese_simplified\nu1,你好,哈喽\n",
        )
        .unwrap();

        let report = create_translated_documents(
            &tagged_path,
            &translations_path,
            &dir.path().join("out"),
            &["Chinese Simplified", "chinese_simplified"],
            constants::DEFAULT_OUTPUT_TEMPLATE,
            &ReinjectOptions::default(),
        )
        .unwrap();

        assert_eq!(report.paths.len(), 1);
        assert!(matches!(
            report.diagnostics.misses(),
            [LookupMiss::OutputPathClash { language, .. }] if language == "chinese_simplified"
        ));
        let written = fs::read_to_string(&report.paths[0]).unwrap();
        assert!(written.contains("你好"));
    }

    #[test]
    fn test_create_translated_documents_requires_languages() {
        let languages: [&str; 0] = [];
        let result = create_translated_documents(
            Path::new("tagged.html"),
            Path::new("table.csv"),
            Path::new("out"),
            &languages,
            constants::DEFAULT_OUTPUT_TEMPLATE,
            &ReinjectOptions::default(),
        );

        assert!(matches!(result, Err(LocalizerError::Config(_))));
    }
}
