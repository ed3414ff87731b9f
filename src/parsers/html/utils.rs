/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 拆分 class 属性值
pub fn split_class_list(class_attr: &str) -> impl Iterator<Item = &str> {
    class_attr
        .split(|c: char| WHITESPACES.contains(&c))
        .filter(|class_name| !class_name.is_empty())
}
