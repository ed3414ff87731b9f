use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

use crate::error::{helpers, LocalizerResult, PipelineStage};

/// 将 HTML 字节转换为 DOM
///
/// 按 `document_encoding` 指定的字符集解码；无法识别的字符集按 UTF-8（有损）处理。
/// 每次调用都会得到一棵独立的树，回填时每种语言各自调用一次。
pub fn html_to_dom(
    data: &[u8],
    document_encoding: &str,
    stage: PipelineStage,
) -> LocalizerResult<RcDom> {
    let s: String = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => {
            let (string, _, had_errors) = encoding.decode(data);
            if had_errors {
                tracing::debug!("文档包含无法用 {} 解码的字节", encoding.name());
            }
            string.into_owned()
        }
        None => String::from_utf8_lossy(data).into_owned(),
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(|e| helpers::parse_error(stage, format!("无法解析HTML文档: {e}")))
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 设置节点属性
///
/// 已存在的同名属性原位覆盖（保持属性顺序），否则追加到末尾。
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: &str) {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::{namespace_url, ns, LocalName};

    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs_mut = attrs.borrow_mut();
        let mut found_existing_attr = false;

        for attr in attrs_mut.iter_mut() {
            if &*attr.name.local == attr_name {
                found_existing_attr = true;
                attr.value = StrTendril::from_slice(attr_value);
            }
        }

        if !found_existing_attr {
            attrs_mut.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                value: StrTendril::from_slice(attr_value),
            });
        }
    }
}

/// 把 `<meta>` 中声明的字符集改为 UTF-8，返回改动的元素数
///
/// 序列化结果总是 UTF-8 文本，声明必须与之一致。已声明 UTF-8 的元素保持原样。
pub fn declare_utf8_charset(document: &Handle) -> usize {
    let mut rewritten = 0;

    for_each_element(document, &mut |node| {
        if get_node_name(node) != Some("meta") {
            return;
        }

        if let Some(charset) = get_node_attr(node, "charset") {
            if !is_utf8_label(&charset) {
                set_node_attr(node, "charset", "utf-8");
                rewritten += 1;
            }
            return;
        }

        let is_content_type = get_node_attr(node, "http-equiv")
            .map(|value| value.trim().eq_ignore_ascii_case("content-type"))
            .unwrap_or(false);
        if !is_content_type {
            return;
        }

        if let Some(content) = get_node_attr(node, "content") {
            let lowered = content.to_ascii_lowercase();
            let declared = lowered
                .find("charset=")
                .map(|start| &lowered[start + "charset=".len()..])
                .map(|rest| rest.split(';').next().unwrap_or_default())
                .map(|label| label.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace()));

            if let Some(label) = declared {
                if !is_utf8_label(label) {
                    set_node_attr(node, "content", "text/html; charset=utf-8");
                    rewritten += 1;
                }
            }
        }
    });

    rewritten
}

fn is_utf8_label(label: &str) -> bool {
    Encoding::for_label(label.trim().as_bytes()) == Some(encoding_rs::UTF_8)
}

/// 按文档顺序（先序）访问所有元素节点
pub fn for_each_element<F>(node: &Handle, visit: &mut F)
where
    F: FnMut(&Handle),
{
    if let NodeData::Element { .. } = node.data {
        visit(node);
    }

    for child_node in node.children.borrow().iter() {
        for_each_element(child_node, visit);
    }
}

/// 拼接节点下所有文本节点的内容
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, buf: &mut String) {
    match &node.data {
        NodeData::Text { contents } => buf.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child_node in node.children.borrow().iter() {
                collect_text(child_node, buf);
            }
        }
        _ => {}
    }
}

/// 检查节点是否有元素类型的子节点
pub fn has_element_children(node: &Handle) -> bool {
    node.children
        .borrow()
        .iter()
        .any(|child| matches!(child.data, NodeData::Element { .. }))
}

/// 用单个文本节点替换元素的全部子节点，元素自身的属性保持不变
pub fn replace_text_content(node: &Handle, text: &str) {
    let text_node = Node::new(NodeData::Text {
        contents: std::cell::RefCell::new(StrTendril::from_slice(text)),
    });
    text_node.parent.set(Some(Rc::downgrade(node)));

    let mut children = node.children.borrow_mut();
    for old_child in children.iter() {
        old_child.parent.set(None);
    }
    children.clear();
    children.push(text_node);
}
