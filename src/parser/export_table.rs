use crate::error::{DllDocError, Result};
use serde::Serialize;

/// Column headings that open the export table in `dumpbin /EXPORTS` output.
pub const TABLE_HEADER: &str = "ordinal hint RVA";

/// Leading columns (ordinal, hint, RVA) that precede the name field.
const SKIPPED_FIELDS: usize = 3;

/// Exported symbol names in the order dumpbin listed them. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportList(Vec<String>);

impl ExportList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ExportList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingHeader,
    InTable,
}

/// Extract the exported symbol names from captured tool output.
///
/// Lines before the table header are ignored and the first empty line after
/// it ends the table. Rows that do not follow the `...: name)` shape are
/// skipped. Finding nothing at all is an error.
///
/// Lines are split on `\n` only. dumpbin writes CRLF, so its separator lines
/// are a lone `\r` and do not end the table; only a truly empty line does.
pub fn parse_exports(output: &str) -> Result<ExportList> {
    let mut exports = Vec::new();
    let mut state = ScanState::SeekingHeader;

    for line in output.split('\n') {
        match state {
            ScanState::SeekingHeader => {
                if line.contains(TABLE_HEADER) {
                    state = ScanState::InTable;
                }
            }
            ScanState::InTable => {
                if line.is_empty() {
                    break;
                }

                match parse_export_line(line) {
                    Some(name) => exports.push(name.to_string()),
                    None => log::trace!("Skipping export row without a name: {:?}", line),
                }
            }
        }
    }

    if exports.is_empty() {
        return Err(DllDocError::NoExportsFound);
    }

    Ok(ExportList(exports))
}

/// Recover the symbol name from one row of the export table.
///
/// The name is whatever sits between the first `:` of the name field and the
/// last `)` after it, minus leading spaces. Ordinal, hint and RVA are not
/// validated.
pub fn parse_export_line(line: &str) -> Option<&str> {
    let name_field = skip_fields(line, SKIPPED_FIELDS);

    let colon = name_field.find(':')?;
    let rest = name_field[colon + 1..].trim_start_matches(' ');

    let close = rest.rfind(')')?;
    Some(&rest[..close])
}

/// Everything after the first `count` whitespace-delimited tokens, with the
/// whitespace that follows the last token left in place.
fn skip_fields(line: &str, count: usize) -> &str {
    let mut rest = line;

    for _ in 0..count {
        rest = rest.trim_start_matches(is_field_separator);
        let end = rest.find(is_field_separator).unwrap_or(rest.len());
        rest = &rest[end..];
    }

    rest
}

/// C locale `isspace`: ASCII whitespace plus vertical tab.
fn is_field_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMPBIN_LISTING: &str = "\
Microsoft (R) COFF/PE Dumper Version 14.38.33135.0
Copyright (C) Microsoft Corporation.  All rights reserved.


Dump of file C:\\libs\\sample.dll

File Type: DLL

  Section contains the following exports for sample.dll

    00000000 characteristics
    FFFFFFFF time date stamp
        0.00 version
           1 ordinal base
           4 number of functions
           4 number of names

    ordinal hint RVA      name

          1    0 00011037 ??0Calculator@@QEAA@XZ = @ILT+50(??0Calculator@@QEAA@XZ) (public: __cdecl Calculator::Calculator(void))
          2    1 000110A0 ?add@Calculator@@QEAAHHH@Z = @ILT+155(?add@Calculator@@QEAAHHH@Z) (public: int __cdecl Calculator::add(int,int))
          3    2 00011122 ?reset@Calculator@@QEAAXXZ = @ILT+285(?reset@Calculator@@QEAAXXZ) (public: void __cdecl Calculator::reset(void))
          4    3 000111F4 version = @ILT+495(version)

  Summary

        1000 .00cfg
        1000 .data
";

    fn dumpbin_output() -> String {
        DUMPBIN_LISTING.replace('\n', "\r\n")
    }

    #[test]
    fn test_parses_dumpbin_table() {
        let exports = parse_exports(&dumpbin_output()).unwrap();
        assert_eq!(
            exports.as_slice(),
            [
                "__cdecl Calculator::Calculator(void)",
                "int __cdecl Calculator::add(int,int)",
                "void __cdecl Calculator::reset(void)",
            ]
        );
    }

    #[test]
    fn test_header_followed_by_empty_line_ends_the_table() {
        let output = "    ordinal hint RVA      name\n\n   1    0  1000 AddressOfEntryPoint: void foo(int)\n";
        assert!(matches!(
            parse_exports(output),
            Err(DllDocError::NoExportsFound)
        ));
    }

    #[test]
    fn test_single_row_round_trip() {
        let output = "... ordinal hint RVA name\n   1    0  1000 AddressOfEntryPoint: void foo(int)\n\n";
        let exports = parse_exports(output).unwrap();
        assert_eq!(exports.as_slice(), ["void foo(int"]);
    }

    #[test]
    fn test_rows_between_header_and_blank_line() {
        let output = "ordinal hint RVA\n\
                      1 0 1000 x: int alpha(void)\n\
                      2 1 1010 x: int beta(void)\n\
                      3 2 1020 x: int gamma(void)\n\
                      \n\
                      4 3 1030 x: int after_table(void)\n";
        let exports = parse_exports(output).unwrap();
        assert_eq!(exports.as_slice(), ["int alpha(void", "int beta(void", "int gamma(void"]);
    }

    #[test]
    fn test_missing_header() {
        let output = "   1    0  1000 AddressOfEntryPoint: void foo(int)\n\n";
        assert!(matches!(
            parse_exports(output),
            Err(DllDocError::NoExportsFound)
        ));
        assert!(matches!(parse_exports(""), Err(DllDocError::NoExportsFound)));
    }

    #[test]
    fn test_tool_error_text() {
        let output = "Microsoft (R) COFF/PE Dumper Version 14.38.33135.0\n\
                      Copyright (C) Microsoft Corporation.  All rights reserved.\n\n\
                      Dump of file missing.dll\n\
                      DUMPBIN : fatal error LNK1181: cannot open input file 'missing.dll'\n";
        assert!(matches!(
            parse_exports(output),
            Err(DllDocError::NoExportsFound)
        ));
    }

    #[test]
    fn test_malformed_rows_do_not_abort() {
        let output = "ordinal hint RVA name\n\
                      1 0 1000 no_colon_here(int)\n\
                      2 1 1010 colon: but no closing paren\n\
                      3 2 1020 (public: int __cdecl Widget::size(void)const )\n\
                      \n";
        let exports = parse_exports(output).unwrap();
        assert_eq!(exports.as_slice(), ["int __cdecl Widget::size(void)const "]);
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let output = "ordinal hint RVA name\n\
                      1 0 1000 a: b dup(x)\n\
                      2 1 1010 a: c other(x)\n\
                      3 2 1020 a: b dup(x)\n\
                      \n";
        let exports = parse_exports(output).unwrap();
        assert_eq!(exports.len(), 3);
        assert_eq!(exports.as_slice(), ["b dup(x", "c other(x", "b dup(x"]);
    }

    #[test]
    fn test_crlf_separator_lines_do_not_end_the_table() {
        let output = "ordinal hint RVA name\r\n\r\n   1 0 1000 x: int f(void)\r\n\r\n   2 1 1010 x: int g(void)\r\n";
        let exports = parse_exports(output).unwrap();
        assert_eq!(exports.as_slice(), ["int f(void", "int g(void"]);
    }

    #[test]
    fn test_lf_listing_stops_at_blank_line_after_header() {
        assert!(matches!(
            parse_exports(DUMPBIN_LISTING),
            Err(DllDocError::NoExportsFound)
        ));
    }

    #[test]
    fn test_parse_export_line_edge_cases() {
        assert_eq!(parse_export_line("1 0 1000 a:b(c)"), Some("b(c"));
        assert_eq!(parse_export_line("1 0 1000 a:    b)"), Some("b"));
        assert_eq!(parse_export_line("1 0 1000 a: )"), Some(""));
        assert_eq!(parse_export_line("1 0 1000 a:"), None);
        assert_eq!(parse_export_line("1 0 1000 abc"), None);
        assert_eq!(parse_export_line("1 0"), None);
        assert_eq!(parse_export_line(""), None);
    }

    #[test]
    fn test_colon_in_leading_fields_is_ignored() {
        // The first three tokens are discarded before the colon search.
        assert_eq!(parse_export_line("1: 0: 1000: plain)"), None);
        assert_eq!(parse_export_line("x y z w: v)"), Some("v"));
    }

    #[test]
    fn test_vertical_tab_separates_fields() {
        assert_eq!(parse_export_line("1\x0b0 1000 a: f(x)"), Some("f(x"));
        assert_eq!(parse_export_line("1\t0\x0c1000 a: g(y)"), Some("g(y"));
    }

    #[test]
    fn test_internal_spacing_is_preserved() {
        assert_eq!(
            parse_export_line("  7   6   000A   (private:  static  int  X::y(void))"),
            Some("static  int  X::y(void)")
        );
    }

    #[test]
    fn test_export_list_is_serialized_as_array() {
        let exports = parse_exports("ordinal hint RVA\n1 0 1 a: f(x)\n").unwrap();
        assert_eq!(serde_json::to_string(&exports).unwrap(), r#"["f(x"]"#);
    }
}
