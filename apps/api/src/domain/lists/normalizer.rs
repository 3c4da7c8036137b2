// Contact file normalizer
// Turns an uploaded CSV/XLS/XLSX file into an ordered list of contact records

use std::fmt;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsx};

use super::columns::{ColumnMap, ResolvedColumns};
use super::contact::ContactRecord;
use super::errors::{UploadError, UploadResult};

/// Content types accepted at the upload boundary
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Declared kind of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Comma separated text with a header row (`.csv`)
    Csv,
    /// BIFF workbook (`.xls`)
    LegacySpreadsheet,
    /// Office Open XML workbook (`.xlsx`)
    ModernSpreadsheet,
}

impl FileKind {
    /// Determines the kind from the uploaded file name and declared content type
    ///
    /// The extension decides the kind. A content type, when supplied, must be
    /// one of [`ALLOWED_CONTENT_TYPES`].
    ///
    /// # Example
    /// ```
    /// use agent_lists_api::domain::lists::FileKind;
    ///
    /// let kind = FileKind::detect("leads.XLSX", None).expect("supported");
    /// assert_eq!(kind, FileKind::ModernSpreadsheet);
    /// ```
    pub fn detect(file_name: &str, content_type: Option<&str>) -> UploadResult<Self> {
        if let Some(content_type) = content_type {
            let essence = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
                return Err(UploadError::UnsupportedFormat);
            }
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(FileKind::Csv),
            Some("xls") => Ok(FileKind::LegacySpreadsheet),
            Some("xlsx") => Ok(FileKind::ModernSpreadsheet),
            _ => Err(UploadError::UnsupportedFormat),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Csv => write!(f, "csv"),
            FileKind::LegacySpreadsheet => write!(f, "xls"),
            FileKind::ModernSpreadsheet => write!(f, "xlsx"),
        }
    }
}

/// Parses `bytes` as `kind` and returns the valid contact rows in file order
///
/// Rows without a name or phone are skipped. An empty result is not an error
/// here; callers decide how to report it.
pub fn normalize(bytes: &[u8], kind: FileKind) -> UploadResult<Vec<ContactRecord>> {
    let (records, skipped) = match kind {
        FileKind::Csv => normalize_csv(bytes, &ColumnMap::csv())?,
        FileKind::LegacySpreadsheet => {
            let workbook = Xls::new(Cursor::new(bytes))
                .map_err(|e| UploadError::Parse(format!("Error parsing Excel file: {}", e)))?;
            normalize_workbook(workbook, &ColumnMap::spreadsheet())?
        }
        FileKind::ModernSpreadsheet => {
            let workbook = Xlsx::new(Cursor::new(bytes))
                .map_err(|e| UploadError::Parse(format!("Error parsing Excel file: {}", e)))?;
            normalize_workbook(workbook, &ColumnMap::spreadsheet())?
        }
    };

    tracing::debug!(%kind, accepted = records.len(), skipped, "Normalized contact file");

    Ok(records)
}

fn normalize_csv(bytes: &[u8], columns: &ColumnMap) -> UploadResult<(Vec<ContactRecord>, usize)> {
    let content = decode_text(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| UploadError::Parse(e.to_string()))?
        .clone();
    let resolved = columns.resolve(&headers.iter().collect::<Vec<_>>());

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in reader.records() {
        let row = result.map_err(|e| UploadError::Parse(e.to_string()))?;
        match build_record(&resolved, |idx| row.get(idx)) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    Ok((records, skipped))
}

fn normalize_workbook<RS, R>(
    mut workbook: R,
    columns: &ColumnMap,
) -> UploadResult<(Vec<ContactRecord>, usize)>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: fmt::Display,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| UploadError::Parse("Workbook contains no sheets".to_string()))?;

    let range: Range<Data> = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| UploadError::Parse(format!("Error reading sheet {}: {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        None => return Ok((Vec::new(), 0)),
    };
    let resolved = columns.resolve(&headers);

    let mut records = Vec::new();
    let mut skipped = 0;

    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        match build_record(&resolved, |idx| cells.get(idx).map(String::as_str)) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    Ok((records, skipped))
}

fn build_record<'a, F>(resolved: &ResolvedColumns, cell: F) -> Option<ContactRecord>
where
    F: Fn(usize) -> Option<&'a str> + Copy,
{
    let name = ResolvedColumns::pick(&resolved.name, cell);
    let phone = ResolvedColumns::pick(&resolved.phone, cell);
    let notes = ResolvedColumns::pick(&resolved.notes, cell);

    ContactRecord::new(name, phone, notes).ok()
}

/// Renders a spreadsheet cell the way it reads in the sheet
///
/// Integral floats lose their fractional part so phone numbers stored as
/// numbers come out as plain digits.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Decodes text as UTF-8, falling back to Windows-1252
fn decode_text(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_xlsxwriter::Workbook;

    fn xlsx(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn names(records: &[ContactRecord]) -> Vec<&str> {
        records.iter().map(ContactRecord::name).collect()
    }

    #[test]
    fn detect_by_extension() {
        assert_eq!(FileKind::detect("a.csv", None).unwrap(), FileKind::Csv);
        assert_eq!(FileKind::detect("a.xls", None).unwrap(), FileKind::LegacySpreadsheet);
        assert_eq!(FileKind::detect("A.XLSX", None).unwrap(), FileKind::ModernSpreadsheet);
    }

    #[test]
    fn detect_rejects_unknown_extension() {
        let err = FileKind::detect("notes.txt", None).unwrap_err();
        assert_eq!(err.kind(), "unsupported_format");
        assert!(FileKind::detect("no_extension", None).is_err());
    }

    #[test]
    fn detect_rejects_unlisted_content_type() {
        let err = FileKind::detect("list.csv", Some("application/pdf")).unwrap_err();
        assert_eq!(err.kind(), "unsupported_format");
    }

    #[test]
    fn detect_accepts_content_type_with_parameters() {
        let kind = FileKind::detect("list.csv", Some("text/csv; charset=utf-8")).unwrap();
        assert_eq!(kind, FileKind::Csv);
    }

    #[test]
    fn csv_maps_headers_case_insensitively() {
        let data = b" FirstName ,PHONE,Notes\nAda,555-0100,first\nGrace, 555-0101 ,\n";
        let records = normalize(data, FileKind::Csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ContactRecord::new("Ada", "555-0100", "first").unwrap());
        assert_eq!(records[1].phone(), "555-0101");
        assert_eq!(records[1].notes(), "");
    }

    #[test]
    fn csv_without_notes_column_defaults_to_empty() {
        let records = normalize(b"firstname,phone\nAda,1\n", FileKind::Csv).unwrap();
        assert_eq!(records[0].notes(), "");
    }

    #[test]
    fn csv_rows_missing_required_fields_are_dropped() {
        let data = b"firstname,phone,notes\nAda,,x\n,555,y\n   ,555,z\nLin,556,ok\n";
        let records = normalize(data, FileKind::Csv).unwrap();

        assert_eq!(names(&records), vec!["Lin"]);
    }

    #[test]
    fn csv_header_only_yields_nothing() {
        let records = normalize(b"firstname,phone,notes\n", FileKind::Csv).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn csv_short_rows_are_tolerated() {
        let records = normalize(b"firstname,phone,notes\nAda,555\n", FileKind::Csv).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn csv_preserves_row_order() {
        let data = b"firstname,phone\nc,3\na,1\nb,2\n";
        let records = normalize(data, FileKind::Csv).unwrap();
        assert_eq!(names(&records), vec!["c", "a", "b"]);
    }

    #[test]
    fn csv_windows_1252_is_decoded() {
        // "José" with 0xE9 for é
        let data = b"firstname,phone\nJos\xe9,555\n";
        let records = normalize(data, FileKind::Csv).unwrap();
        assert_eq!(records[0].name(), "José");
    }

    #[test]
    fn csv_with_bom_header() {
        let data = "\u{feff}firstname,phone\nAda,1\n".as_bytes();
        let records = normalize(data, FileKind::Csv).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn xlsx_alias_headers() {
        let bytes = xlsx(&[
            &["First Name", "Mobile", "Note"],
            &["Ada", "555-0100", "vip"],
        ]);
        let records = normalize(&bytes, FileKind::ModernSpreadsheet).unwrap();

        assert_eq!(records, vec![ContactRecord::new("Ada", "555-0100", "vip").unwrap()]);
    }

    #[test]
    fn phone_aliases_are_equivalent() {
        let expected = vec![ContactRecord::new("Ada", "555", "n").unwrap()];

        for header in ["Phone", "Mobile", "mobile"] {
            let bytes = xlsx(&[&["FirstName", header, "Notes"], &["Ada", "555", "n"]]);
            let records = normalize(&bytes, FileKind::ModernSpreadsheet).unwrap();
            assert_eq!(records, expected, "header {header}");
        }
    }

    #[test]
    fn xlsx_numeric_phone_is_stringified() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "FirstName").unwrap();
        sheet.write_string(0, 1, "Phone").unwrap();
        sheet.write_string(1, 0, "Ada").unwrap();
        sheet.write_number(1, 1, 9876543210.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let records = normalize(&bytes, FileKind::ModernSpreadsheet).unwrap();
        assert_eq!(records[0].phone(), "9876543210");
    }

    #[test]
    fn xlsx_falls_back_to_later_alias_when_first_is_blank() {
        let bytes = xlsx(&[
            &["FirstName", "Phone", "Mobile"],
            &["Ada", "", "555-0199"],
        ]);
        let records = normalize(&bytes, FileKind::ModernSpreadsheet).unwrap();
        assert_eq!(records[0].phone(), "555-0199");
    }

    #[test]
    fn xlsx_reads_first_sheet_only() {
        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "FirstName").unwrap();
        first.write_string(0, 1, "Phone").unwrap();
        first.write_string(1, 0, "Ada").unwrap();
        first.write_string(1, 1, "1").unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "FirstName").unwrap();
        second.write_string(0, 1, "Phone").unwrap();
        second.write_string(1, 0, "Grace").unwrap();
        second.write_string(1, 1, "2").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let records = normalize(&bytes, FileKind::ModernSpreadsheet).unwrap();
        assert_eq!(names(&records), vec!["Ada"]);
    }

    #[test]
    fn xlsx_rows_missing_fields_are_dropped() {
        let bytes = xlsx(&[
            &["FirstName", "Phone"],
            &["Ada", ""],
            &["", "555"],
            &["Lin", "556"],
        ]);
        let records = normalize(&bytes, FileKind::ModernSpreadsheet).unwrap();
        assert_eq!(names(&records), vec!["Lin"]);
    }

    #[test]
    fn corrupt_workbook_is_parse_error() {
        let err = normalize(b"definitely not a zip archive", FileKind::ModernSpreadsheet).unwrap_err();
        assert_eq!(err.kind(), "parse_error");

        let err = normalize(b"not an ole2 file either", FileKind::LegacySpreadsheet).unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }

    #[test]
    fn xls_alias_headers() {
        // First sheet "Contacts": First Name | Mobile | Note, with one row lacking a name
        let bytes = include_bytes!("../../../tests/fixtures/contacts.xls");
        let records = normalize(bytes, FileKind::LegacySpreadsheet).unwrap();

        assert_eq!(
            records,
            vec![
                ContactRecord::new("Ada", "555-0100", "vip").unwrap(),
                ContactRecord::new("Grace", "555-0102", "").unwrap(),
            ]
        );
    }

    fn to_csv(records: &[ContactRecord]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut out);
            writer.write_record(["firstname", "phone", "notes"]).unwrap();
            for record in records {
                writer
                    .write_record([record.name(), record.phone(), record.notes()])
                    .unwrap();
            }
            writer.flush().unwrap();
        }
        out
    }

    #[test]
    fn normalization_is_idempotent() {
        let data = b"firstname,phone,notes\n  Ada , 555 , hi \nGrace,556,\n";
        let first = normalize(data, FileKind::Csv).unwrap();

        let second = normalize(&to_csv(&first), FileKind::Csv).unwrap();
        assert_eq!(first, second);
    }

    fn padded(core: &'static str) -> impl Strategy<Value = String> {
        ("[ ]{0,2}", core, "[ ]{0,2}").prop_map(|(left, value, right)| format!("{left}{value}{right}"))
    }

    fn csv_rows() -> impl Strategy<Value = Vec<(String, String, String)>> {
        prop::collection::vec(
            (padded("[A-Za-z]{0,6}"), padded("[0-9-]{0,6}"), "[a-z ]{0,5}"),
            0..30,
        )
    }

    proptest! {
        #[test]
        fn csv_normalization_properties(rows in csv_rows()) {
            let mut data = String::from("firstname,phone,notes\n");
            for (name, phone, notes) in &rows {
                data.push_str(&format!("{name},{phone},{notes}\n"));
            }

            let records = normalize(data.as_bytes(), FileKind::Csv).unwrap();

            // Valid rows survive trimmed and in file order
            let expected: Vec<(String, String, String)> = rows
                .iter()
                .filter(|(name, phone, _)| !name.trim().is_empty() && !phone.trim().is_empty())
                .map(|(name, phone, notes)| {
                    (name.trim().to_string(), phone.trim().to_string(), notes.trim().to_string())
                })
                .collect();
            let actual: Vec<(String, String, String)> = records
                .iter()
                .map(|r| (r.name().to_string(), r.phone().to_string(), r.notes().to_string()))
                .collect();
            prop_assert_eq!(actual, expected);

            prop_assert!(records.iter().all(|r| !r.name().is_empty() && !r.phone().is_empty()));

            let again = normalize(&to_csv(&records), FileKind::Csv).unwrap();
            prop_assert_eq!(again, records);
        }
    }
}
