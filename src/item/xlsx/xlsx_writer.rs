use std::io::{Cursor, Write};

use log::debug;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::BatchError;

const MAX_SHEET_NAME_LENGTH: usize = 31;
const FORBIDDEN_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Style index of the bold header cells in [`STYLES`].
const HEADER_STYLE: &str = "1";

/// Renders one sheet as the bytes of an `.xlsx` workbook.
///
/// The header goes to the first row in bold, every row of `rows` to the
/// following ones. All cells are inline strings. Characters that XML 1.0
/// cannot carry are dropped.
///
/// Fails with [`BatchError::Report`] when `sheet_name` is not a valid sheet
/// name.
///
/// # Examples
///
/// ```
/// use customer_batch::item::xlsx::render_sheet;
///
/// let bytes = render_sheet("People", &["Name", "Age"], &[["Ann", "40"], ["Bob", "31"]]).unwrap();
/// assert_eq!(&bytes[..2], b"PK");
///
/// assert!(render_sheet("a/b", &["Name"], &[["Ann"]]).is_err());
/// ```
pub fn render_sheet<H, R, S>(sheet_name: &str, header: &[H], rows: &[R]) -> Result<Vec<u8>, BatchError>
where
    H: AsRef<str>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    validate_sheet_name(sheet_name)?;

    let workbook = workbook_xml(sheet_name)?;
    let worksheet = worksheet_xml(header, rows)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/styles.xml", STYLES.as_bytes()),
        ("xl/worksheets/sheet1.xml", &worksheet),
    ];

    for (name, content) in parts {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options).map_err(report_error)?;
        zip.write_all(content).map_err(report_error)?;
    }

    let bytes = zip.finish().map_err(report_error)?.into_inner();
    debug!(
        "Rendered sheet {} with {} rows into {} bytes",
        sheet_name,
        rows.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn report_error(err: impl std::fmt::Display) -> BatchError {
    BatchError::Report(err.to_string())
}

fn validate_sheet_name(name: &str) -> Result<(), BatchError> {
    let length = name.chars().count();
    if length == 0 || length > MAX_SHEET_NAME_LENGTH {
        return Err(BatchError::Report(format!(
            "sheet name must have 1 to {} characters, got {}",
            MAX_SHEET_NAME_LENGTH, length
        )));
    }
    if let Some(forbidden) = name.chars().find(|c| FORBIDDEN_SHEET_NAME_CHARS.contains(c)) {
        return Err(BatchError::Report(format!(
            "sheet name '{}' contains '{}'",
            name, forbidden
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(BatchError::Report(format!(
            "sheet name '{}' starts or ends with an apostrophe",
            name
        )));
    }
    Ok(())
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>, BatchError> {
    let mut writer = xml_writer()?;

    let root = BytesStart::new("workbook")
        .with_attributes([("xmlns", SPREADSHEET_NS), ("xmlns:r", RELATIONSHIPS_NS)]);
    let sheet = BytesStart::new("sheet").with_attributes([
        ("name", sheet_name),
        ("sheetId", "1"),
        ("r:id", "rId1"),
    ]);

    for event in [
        Event::Start(root),
        Event::Start(BytesStart::new("sheets")),
        Event::Empty(sheet),
        Event::End(BytesEnd::new("sheets")),
        Event::End(BytesEnd::new("workbook")),
    ] {
        writer.write_event(event).map_err(report_error)?;
    }

    Ok(writer.into_inner().into_inner())
}

fn worksheet_xml<H, R, S>(header: &[H], rows: &[R]) -> Result<Vec<u8>, BatchError>
where
    H: AsRef<str>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut writer = xml_writer()?;

    let root = BytesStart::new("worksheet").with_attributes([("xmlns", SPREADSHEET_NS)]);
    writer.write_event(Event::Start(root)).map_err(report_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("sheetData")))
        .map_err(report_error)?;

    let header: Vec<&str> = header.iter().map(|name| name.as_ref()).collect();
    write_row(&mut writer, 1, &header, Some(HEADER_STYLE))?;

    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<&str> = row.as_ref().iter().map(|cell| cell.as_ref()).collect();
        write_row(&mut writer, index + 2, &cells, None)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("sheetData")))
        .map_err(report_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("worksheet")))
        .map_err(report_error)?;

    Ok(writer.into_inner().into_inner())
}

fn xml_writer() -> Result<Writer<Cursor<Vec<u8>>>, BatchError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(report_error)?;
    Ok(writer)
}

fn write_row(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    number: usize,
    cells: &[&str],
    style: Option<&str>,
) -> Result<(), BatchError> {
    let number = number.to_string();
    let row = BytesStart::new("row").with_attributes([("r", number.as_str())]);
    writer.write_event(Event::Start(row)).map_err(report_error)?;

    for (index, value) in cells.iter().enumerate() {
        let reference = format!("{}{}", column_name(index), number);
        let mut cell =
            BytesStart::new("c").with_attributes([("r", reference.as_str()), ("t", "inlineStr")]);
        if let Some(style) = style {
            cell.push_attribute(("s", style));
        }

        let text = xml_safe(value);
        writer.write_event(Event::Start(cell)).map_err(report_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("is")))
            .map_err(report_error)?;
        writer
            .write_event(Event::Start(
                BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
            ))
            .map_err(report_error)?;
        writer
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(report_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("t")))
            .map_err(report_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("is")))
            .map_err(report_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("c")))
            .map_err(report_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("row")))
        .map_err(report_error)?;
    Ok(())
}

/// Spreadsheet column name of a zero-based index: `A`, ..., `Z`, `AA`, ...
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut index = index + 1;
    while index > 0 {
        let remainder = (index - 1) % 26;
        name.push(b'A' + remainder as u8);
        index = (index - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Drops the characters XML 1.0 does not allow.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || (c >= '\u{20}' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        })
        .collect()
}
