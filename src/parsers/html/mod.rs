//! HTML解析和处理模块
//!
//! - `utils`: 基础工具函数和常量
//! - `dom`: 基础DOM操作（解析、属性、文本读写、遍历）
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;
pub mod utils;

pub use dom::{
    declare_utf8_charset, for_each_element, get_node_attr, get_node_name, has_element_children, html_to_dom,
    replace_text_content, set_node_attr, text_content,
};
pub use serializer::serialize_document;
pub use utils::{split_class_list, WHITESPACES};
