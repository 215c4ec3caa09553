use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{OutputError, Position, RenderedResult, ResultIdentifier};

/// Indented XML document rooted at `<Results>`, one `<Result>` per interface.
pub(super) fn render(results: &[RenderedResult]) -> Result<String, OutputError> {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    start(&mut writer, "Results")?;
    for result in results {
        start(&mut writer, "Result")?;
        write_identifier(&mut writer, "Interface", &result.interface)?;
        for implementer in &result.implementers {
            write_identifier(&mut writer, "Implementers", implementer)?;
        }
        end(&mut writer, "Result")?;
    }
    end(&mut writer, "Results")?;

    let mut output = String::from_utf8(buffer.into_inner())
        .map_err(|e| OutputError::Xml(e.to_string()))?;
    output.push('\n');
    Ok(output)
}

fn write_identifier<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    identifier: &ResultIdentifier,
) -> Result<(), OutputError> {
    start(writer, tag)?;
    text_element(writer, "Name", &identifier.name)?;
    write_position(writer, &identifier.pos)?;
    end(writer, tag)
}

fn write_position<W: std::io::Write>(writer: &mut Writer<W>, pos: &Position) -> Result<(), OutputError> {
    start(writer, "Pos")?;
    text_element(writer, "Filename", &pos.filename)?;
    text_element(writer, "Line", &pos.line.to_string())?;
    text_element(writer, "Column", &pos.column.to_string())?;
    end(writer, "Pos")
}

fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), OutputError> {
    start(writer, tag)?;
    write(writer, Event::Text(BytesText::new(text)))?;
    end(writer, tag)
}

fn start<W: std::io::Write>(writer: &mut Writer<W>, tag: &str) -> Result<(), OutputError> {
    write(writer, Event::Start(BytesStart::new(tag)))
}

fn end<W: std::io::Write>(writer: &mut Writer<W>, tag: &str) -> Result<(), OutputError> {
    write(writer, Event::End(BytesEnd::new(tag)))
}

fn write<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), OutputError> {
    writer
        .write_event(event)
        .map_err(|e| OutputError::Xml(format!("write error: {e}")))
}
