//! 提取结果导出
//!
//! 以 CSV（表头 `id,content`）写出提取单元，交给外部翻译服务。

use std::io::Write;
use std::path::Path;

use crate::config::constants;
use crate::error::{helpers, LocalizerResult, PipelineStage};

use super::identifier::ExtractedUnit;

/// 写出提取单元到任意 writer
pub fn write_units<W: Write>(writer: W, units: &[ExtractedUnit]) -> LocalizerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    // 没有单元时 serialize 不会写表头，这里显式写出
    csv_writer
        .write_record([constants::ID_COLUMN, constants::CONTENT_COLUMN])
        .map_err(|e| helpers::csv_error(PipelineStage::Export, e))?;

    for unit in units {
        csv_writer
            .write_record([unit.id.as_str(), unit.content.as_str()])
            .map_err(|e| helpers::csv_error(PipelineStage::Export, e))?;
    }

    csv_writer
        .flush()
        .map_err(|e| helpers::csv_error(PipelineStage::Export, e.into()))
}

/// 写出提取单元到文件
pub fn export_units(path: &Path, units: &[ExtractedUnit]) -> LocalizerResult<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| helpers::io_error(PipelineStage::Export, path, e))?;

    write_units(file, units)?;

    tracing::info!("已导出 {} 条文本到 {}", units.len(), path.display());

    Ok(())
}
