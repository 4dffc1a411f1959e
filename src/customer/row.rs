use std::sync::Arc;

/// One data line of the input file, values paired with the header names.
///
/// Values are kept exactly as they appear in the file (no trimming) so that
/// the error report shows what the operator has to fix.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    line: u64,
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RawRow {
    /// Builds a row. `values` is expected to have one entry per header;
    /// extra values are ignored by [`RawRow::get`].
    pub fn new(line: u64, headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self {
            line,
            headers,
            values,
        }
    }

    /// Convenience constructor for rows built in code.
    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (headers, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(line, headers.into(), values)
    }

    /// 1-based line number in the input file.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw value of the column named `name`, `None` if the header has no such column.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|header| header == name)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Original values joined back with `delimiter`.
    pub fn joined(&self, delimiter: char) -> String {
        self.values.join(delimiter.encode_utf8(&mut [0; 4]))
    }
}

#[cfg(test)]
mod tests {
    use super::RawRow;

    #[test]
    fn values_are_looked_up_by_header() {
        let row = RawRow::from_pairs(2, [("id", "7"), ("name", " John Smith ")]);

        assert_eq!(row.get("id"), Some("7"));
        assert_eq!(row.get("name"), Some(" John Smith "));
        assert_eq!(row.get("email"), None);
        assert_eq!(row.line(), 2);
    }

    #[test]
    fn joined_keeps_raw_values() {
        let row = RawRow::from_pairs(3, [("id", "8"), ("name", "Jane Doe"), ("age", "")]);
        assert_eq!(row.joined(','), "8,Jane Doe,");
        assert_eq!(row.joined(';'), "8;Jane Doe;");
    }
}
