#![allow(dead_code)]

mod mocks;

use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
    str,
};

pub use mocks::MockRepository;

use quick_xml::{Reader, escape::unescape, events::Event};
use zip::ZipArchive;

pub const HEADER: &str = "id,name,email,age,location";

/// Writes `content` to `customers.csv` in `dir`.
pub fn write_input(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("customers.csv");
    fs::write(&path, content).unwrap();
    path
}

/// Reads back the rows of a report written by the migration, header included.
pub fn report_rows(path: &Path) -> Vec<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();

    let mut reader = Reader::from_str(&sheet);
    let mut rows: Vec<Vec<String>> = Vec::new();
    // Escaped text of the inline string being read.
    let mut cell: Option<String> = None;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(start) if start.name().as_ref() == b"row" => rows.push(Vec::new()),
            Event::Start(start) if start.name().as_ref() == b"t" => cell = Some(String::new()),
            Event::Text(text) => {
                if let Some(cell) = cell.as_mut() {
                    cell.push_str(str::from_utf8(&text).unwrap());
                }
            }
            Event::GeneralRef(entity) => {
                if let Some(cell) = cell.as_mut() {
                    cell.push('&');
                    cell.push_str(str::from_utf8(&entity).unwrap());
                    cell.push(';');
                }
            }
            Event::End(end) if end.name().as_ref() == b"t" => {
                let raw = cell.take().unwrap();
                rows.last_mut()
                    .unwrap()
                    .push(unescape(&raw).unwrap().into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    rows
}

/// Report rows without the header, as `(row, errors)` pairs.
pub fn report_entries(path: &Path) -> Vec<(String, String)> {
    report_rows(path)
        .into_iter()
        .skip(1)
        .map(|mut cells| {
            let error = cells.pop().unwrap();
            let row = cells.pop().unwrap();
            (row, error)
        })
        .collect()
}

