//! Example template offered to users as a starting point

/// Default file name for the example template
pub const EXAMPLE_FILE_NAME: &str = "example.sql";

/// The example template: every section with its placeholder and a hint
/// comment, CRLF separated, no trailing newline.
pub const EXAMPLE_TEMPLATE: &str = "--#PreSQL\r\n\
/*--!*/\r\n\
--請放置前置語法\r\n\
\r\n\
--#PreProdSQL\r\n\
/*--!*/\r\n\
--請放置正式環境前置語法\r\n\
\r\n\
--#CountSQL\r\n\
/*--!*/\r\n\
--請放置Count語法\r\n\
\r\n\
--#SelectSQL\r\n\
/*--!*/\r\n\
--請放置異動前/後語法\r\n\
\r\n\
--#MainSQL\r\n\
/*--!*/\r\n\
--請放置異動語法\r\n\
\r\n\
--#PostSQL\r\n\
/*--!*/\r\n\
--請放置後置語法";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::{LineEnding, SectionName, SqlTemplate};
    use pretty_assertions::assert_eq;

    fn example_template() -> SqlTemplate {
        let mut template = SqlTemplate::new(LineEnding::Crlf);
        for name in SectionName::all() {
            template.set(name, name.hint());
        }
        template
    }

    #[test]
    fn test_example_parses_into_six_sections() {
        let template = SqlTemplate::parse(EXAMPLE_TEMPLATE);
        assert_eq!(template.names(), SectionName::all().to_vec());
        for name in SectionName::all() {
            assert_eq!(template.get(name), Some(name.hint()));
        }
    }

    #[test]
    fn test_example_matches_generated_text() {
        assert_eq!(example_template().to_sql(), EXAMPLE_TEMPLATE);
    }

    #[test]
    fn test_example_has_no_trailing_newline() {
        assert!(!EXAMPLE_TEMPLATE.ends_with('\n'));
        assert!(EXAMPLE_TEMPLATE.starts_with("--#PreSQL\r\n/*--!*/\r\n"));
    }
}
