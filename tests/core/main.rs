//! 输出文件命名测试

mod format_output_path;
