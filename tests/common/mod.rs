// 集成测试公共模块
//
// 提供测试报告、临时目录和翻译表构造工具

use std::fs;
use std::path::{Path, PathBuf};

use report_localizer::extraction::{ExtractedUnit, SelectorSpec};
use tempfile::TempDir;

/// 测试环境：每个测试独立的临时目录
pub struct TestEnvironment {
    pub dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("Failed to read test file")
    }
}

/// HTML测试工具
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    /// 与报告生成器输出结构相同的周报
    pub fn create_weekly_report() -> String {
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Report for Week 27</title>
    <style>h1 { color: #6CABDD; }</style>
</head>
<body>
    <h1 id="main-title">Sample Report for Week 27</h1>
    <div class="metadata">Han Nguyen - 2024-07-08</div>
    <h2 id="section-header">Weekly Active Users</h2>
    <div class="chart"><svg width="10" height="10"><rect width="10" height="10"></rect></svg></div>
    <ul>
        <li>Engagement peaked in week 24, after the release.</li>
        <li>Retention is "stable" overall.</li>
    </ul>
    <table>
        <tr><th>Metric</th><th>Mean</th></tr>
        <tr><td>Active users</td><td>1,204</td></tr>
    </table>
    <p>   </p>
    <p>The table below summarises the key engagement metrics.</p>
    <script>var labels = ["week", "active_users"];</script>
</body>
</html>"##
            .to_string()
    }

    /// 报告模板使用的选择器
    pub fn report_selectors() -> SelectorSpec {
        SelectorSpec::report_defaults()
    }
}

/// 翻译表构造工具
pub struct TranslationTableBuilder {
    languages: Vec<String>,
    rows: Vec<(String, Vec<Option<String>>)>,
}

impl TranslationTableBuilder {
    pub fn new(languages: &[&str]) -> Self {
        Self {
            languages: languages.iter().map(|l| l.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, id: &str, cells: &[Option<&str>]) -> Self {
        self.rows.push((
            id.to_string(),
            cells.iter().map(|c| c.map(str::to_string)).collect(),
        ));
        self
    }

    /// 每个单元用同一个函数生成所有语言的译文
    pub fn from_units<F>(languages: &[&str], units: &[ExtractedUnit], translate: F) -> Self
    where
        F: Fn(&str, &ExtractedUnit) -> Option<String>,
    {
        let mut builder = Self::new(languages);
        for unit in units {
            let cells = languages.iter().map(|l| translate(l, unit)).collect();
            builder.rows.push((unit.id.clone(), cells));
        }
        builder
    }

    pub fn to_csv(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["id".to_string()];
        header.extend(self.languages.iter().cloned());
        writer.write_record(&header).unwrap();

        for (id, cells) in &self.rows {
            let mut record = vec![id.clone()];
            record.extend(cells.iter().map(|c| c.clone().unwrap_or_default()));
            writer.write_record(&record).unwrap();
        }

        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }
}
