use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use crate::error::{helpers, LocalizerResult, PipelineStage};

/// 序列化文档
///
/// 输出始终为 UTF-8 文本：标记文档会被重新解析，本地化文档直接写盘。
pub fn serialize_document(dom: &RcDom, stage: PipelineStage) -> LocalizerResult<String> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())
        .map_err(|e| helpers::parse_error(stage, format!("无法序列化DOM: {e}")))?;

    String::from_utf8(buf)
        .map_err(|e| helpers::parse_error(stage, format!("序列化结果不是有效的UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::dom::html_to_dom;

    #[test]
    fn test_serialize_is_stable_after_reparse() {
        let dom = html_to_dom(
            b"<!DOCTYPE html><html><head><title>R</title></head><body><p id=\"a\">x &amp; y</p></body></html>",
            "utf-8",
            PipelineStage::Extract,
        )
        .unwrap();
        let first = serialize_document(&dom, PipelineStage::Extract).unwrap();

        let reparsed = html_to_dom(first.as_bytes(), "utf-8", PipelineStage::Reinject).unwrap();
        let second = serialize_document(&reparsed, PipelineStage::Reinject).unwrap();

        assert_eq!(first, second);
        assert!(first.contains("<p id=\"a\">x &amp; y</p>"));
    }
}
