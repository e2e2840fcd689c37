//! Export of tab content and the example template
//!
//! Two artifact formats are supported:
//! - `Sql`: the canonical marker text
//! - `Xml`: the same sections wrapped in elements, bodies as CDATA

use crate::error::ExportError;
use crate::model::template::{EXAMPLE_FILE_NAME, EXAMPLE_TEMPLATE};
use crate::model::{CommandType, SqlTemplate, TabContentController};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root element of the XML artifact
const XML_ROOT: &str = "SqlTemplate";

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xml,
    Sql,
}

impl ExportFormat {
    pub fn all() -> [ExportFormat; 2] {
        [ExportFormat::Xml, ExportFormat::Sql]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "xml",
            ExportFormat::Sql => "sql",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "XML",
            ExportFormat::Sql => "SQL",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "Sections as XML elements with CDATA bodies",
            ExportFormat::Sql => "Canonical marker script (--#PreSQL ...)",
        }
    }
}

/// Render a parsed template as XML
pub fn render_xml(
    command_type: CommandType,
    source_file_name: &str,
    template: &SqlTemplate,
) -> Result<String, ExportError> {
    let mut writer = Writer::new(Vec::new());
    let line_ending = template.line_ending().as_str();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Text(BytesText::new("\n")))?;

    let mut root = BytesStart::new(XML_ROOT);
    root.push_attribute(("type", command_type.tag()));
    root.push_attribute(("source", source_file_name));
    writer.write_event(Event::Start(root))?;

    for (name, body) in template.sections() {
        writer.write_event(Event::Text(BytesText::new("\n  ")))?;
        writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
        let body = body.replace('\n', line_ending);
        for chunk in cdata_chunks(&body) {
            writer.write_event(Event::CData(BytesCData::new(chunk)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }

    writer.write_event(Event::Text(BytesText::new("\n")))?;
    writer.write_event(Event::End(BytesEnd::new(XML_ROOT)))?;
    writer.write_event(Event::Text(BytesText::new("\n")))?;

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Split a body so no CDATA block contains `]]>`
fn cdata_chunks(body: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (index, _) in body.match_indices("]]>") {
        chunks.push(&body[start..index + 2]);
        start = index + 2;
    }
    chunks.push(&body[start..]);
    chunks
}

/// Render the content of a tab in the given format
pub fn render(controller: &TabContentController, format: ExportFormat) -> Result<String, ExportError> {
    let template = controller.sections();
    match format {
        ExportFormat::Sql => Ok(template.to_sql()),
        ExportFormat::Xml => render_xml(
            controller.command_type(),
            controller.source_file_name(),
            &template,
        ),
    }
}

/// File name of an exported tab, e.g. `orders_dml.xml`
pub fn export_file_name(controller: &TabContentController, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        controller.export_stem(),
        controller.command_type().tag().to_lowercase(),
        format.extension()
    )
}

/// Export a tab into `dir`.
///
/// Returns `Ok(None)` without writing when the tab has nothing to export.
pub fn export_tab(
    controller: &TabContentController,
    format: ExportFormat,
    dir: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    if !controller.download_enabled() {
        tracing::debug!(tab = %controller.command_type(), "export skipped, no content");
        return Ok(None);
    }
    let content = render(controller, format)?;
    let path = dir.join(export_file_name(controller, format));
    write_file(&path, &content)?;
    tracing::info!(
        tab = %controller.command_type(),
        path = %path.display(),
        format = format.label(),
        "exported"
    );
    Ok(Some(path))
}

/// Write the example template to `path`, or to `example.sql` inside `dir`
pub fn write_example(path: Option<&Path>, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(EXAMPLE_FILE_NAME));
    write_file(&path, EXAMPLE_TEMPLATE)?;
    tracing::info!(path = %path.display(), "example template written");
    Ok(path)
}

/// Write `content` to `path`, creating missing parent directories
pub fn write_file(path: &Path, content: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, content).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionName;
    use pretty_assertions::assert_eq;

    fn controller(text: &str) -> TabContentController {
        TabContentController::new(CommandType::Dml, text.to_string(), "orders.sql".to_string())
    }

    #[test]
    fn test_render_xml() {
        let c = controller("--#MainSQL\n/*--!*/\nUPDATE t SET a = 1 WHERE b < 2;\n--#PreSQL\nBEGIN;");
        let xml = render(&c, ExportFormat::Xml).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <SqlTemplate type=\"DML\" source=\"orders.sql\">\n  \
             <PreSQL><![CDATA[BEGIN;]]></PreSQL>\n  \
             <MainSQL><![CDATA[UPDATE t SET a = 1 WHERE b < 2;]]></MainSQL>\n\
             </SqlTemplate>\n"
        );
    }

    #[test]
    fn test_render_xml_crlf_bodies() {
        let template = SqlTemplate::parse("--#SelectSQL\r\nSELECT *\r\nFROM t");
        let xml = render_xml(CommandType::Ddl, "s.sql", &template).unwrap();
        assert!(xml.contains("<SelectSQL><![CDATA[SELECT *\r\nFROM t]]></SelectSQL>"));
        assert!(xml.contains("type=\"DDL\""));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        assert_eq!(cdata_chunks("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_chunks("plain"), vec!["plain"]);
        assert_eq!(cdata_chunks(""), vec![""]);

        let mut template = SqlTemplate::default();
        template.set(SectionName::MainSql, "x = ']]>'");
        let xml = render_xml(CommandType::Dml, "a.sql", &template).unwrap();
        assert!(xml.contains("<MainSQL><![CDATA[x = ']]]]><![CDATA[>']]></MainSQL>"));
    }

    #[test]
    fn test_render_sql_is_canonical() {
        let c = controller("--#PostSQL\nCOMMIT;\n--#PreSQL\nBEGIN;");
        assert_eq!(
            render(&c, ExportFormat::Sql).unwrap(),
            "--#PreSQL\n/*--!*/\nBEGIN;\n\n--#PostSQL\n/*--!*/\nCOMMIT;"
        );
    }

    #[test]
    fn test_export_tab_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let c = controller("--#MainSQL\nSELECT 1;");

        let path = export_tab(&c, ExportFormat::Sql, dir.path()).unwrap().unwrap();
        assert_eq!(path, dir.path().join("orders_dml.sql"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "--#MainSQL\n/*--!*/\nSELECT 1;"
        );
    }

    #[test]
    fn test_export_tab_without_content_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let c = controller("   ");
        assert_eq!(export_tab(&c, ExportFormat::Xml, dir.path()).unwrap(), None);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_example(None, &dir.path().join("out")).unwrap();
        assert_eq!(path, dir.path().join("out").join("example.sql"));
        assert_eq!(fs::read_to_string(&path).unwrap(), EXAMPLE_TEMPLATE);
    }
}
