use crate::error::Result;
use crate::library::LibraryName;
use crate::parser::ExportList;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DESCRIPTION_PLACEHOLDER: &str = "{placeholder}";

/// Writes the markdown export table for a library.
pub struct DocumentWriter {
    output_directory: PathBuf,
}

impl DocumentWriter {
    pub fn new(output_directory: PathBuf) -> Self {
        Self { output_directory }
    }

    /// Where the document goes. The default location is created if missing;
    /// an explicit path is used as given.
    pub fn resolve_path(&self, library: &LibraryName, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        fs::create_dir_all(&self.output_directory)?;
        Ok(self.output_directory.join(library.default_document_name()))
    }

    /// Render and write the document, returning the path written.
    pub fn write(
        &self,
        exports: &ExportList,
        library: &LibraryName,
        explicit: Option<&Path>,
    ) -> Result<PathBuf> {
        let path = self.resolve_path(library, explicit)?;
        let document = render_document(exports, library);

        let mut file = fs::File::create(&path)?;
        file.write_all(document.as_bytes())?;
        file.flush()?;

        log::info!("Wrote {} exports to {}", exports.len(), path.display());
        Ok(path)
    }
}

pub fn render_document(exports: &ExportList, library: &LibraryName) -> String {
    let mut document = String::new();

    document.push_str(&format!("# {}.dll export table\n", library));
    document.push('\n');
    document.push_str("| Symbol | Description |\n");
    document.push_str("| ---    | ---         |\n");

    for symbol in exports {
        document.push_str(&format!(
            "| {} | {} |\n",
            escape_table_cell(symbol),
            DESCRIPTION_PLACEHOLDER
        ));
    }

    document
}

// `operator|` and friends would otherwise split the row.
fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_exports;
    use tempfile::TempDir;

    fn sample_exports() -> ExportList {
        parse_exports(
            "ordinal hint RVA name\n\
             1 0 1000 (public: int __cdecl Calculator::add(int,int))\n\
             2 1 1010 (public: bool __cdecl Flags::operator|(Flags)const )\n\
             \n",
        )
        .unwrap()
    }

    fn sample_library() -> LibraryName {
        LibraryName::from_path(r"C:\libs\sample.dll").unwrap()
    }

    #[test]
    fn test_render_document() {
        let document = render_document(&sample_exports(), &sample_library());
        let expected = "# sample.dll export table\n\
                        \n\
                        | Symbol | Description |\n\
                        | ---    | ---         |\n\
                        | int __cdecl Calculator::add(int,int) | {placeholder} |\n\
                        | bool __cdecl Flags::operator\\|(Flags)const  | {placeholder} |\n";
        assert_eq!(document, expected);
    }

    #[test]
    fn test_default_location_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let writer = DocumentWriter::new(out_dir.clone());

        let path = writer
            .write(&sample_exports(), &sample_library(), None)
            .unwrap();

        assert_eq!(path, out_dir.join("sample_exports.md"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# sample.dll export table\n"));
        assert_eq!(content.lines().count(), 6);
    }

    #[test]
    fn test_explicit_path_skips_default_directory() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let target = temp_dir.path().join("custom.md");
        let writer = DocumentWriter::new(out_dir.clone());

        let path = writer
            .write(&sample_exports(), &sample_library(), Some(&target))
            .unwrap();

        assert_eq!(path, target);
        assert!(target.exists());
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("missing").join("exports.md");
        let writer = DocumentWriter::new(temp_dir.path().join("out"));

        let result = writer.write(&sample_exports(), &sample_library(), Some(&target));
        assert!(matches!(result, Err(crate::error::DllDocError::Io(_))));
    }
}
