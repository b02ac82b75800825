use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogItem;
use crate::error::{Context, Result};
use crate::util::safe_filename;

/// Receives recovered payloads and displays or stores them
pub trait Presenter {
    fn present(&mut self, item: &CatalogItem, payload: &[u8]) -> Result<()>;
}

/// Renders text payloads inline, preceded by a short header
pub struct TextViewer<W: Write> {
    out: W,
}

impl<W: Write> TextViewer<W> {
    pub fn new(out: W) -> Self {
        TextViewer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextViewer<W> {
    fn present(&mut self, item: &CatalogItem, payload: &[u8]) -> Result<()> {
        ensure!(
            item.file_type.is_text(),
            "\"{}\" is a {} file and cannot be displayed as text, export it to a file instead",
            item.title,
            item.file_type
        );
        let text = render_text(item, payload)?;
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

pub fn render_text(item: &CatalogItem, payload: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(payload)
        .with_context(|| format!("payload of \"{}\" is not valid utf-8 text", item.title))?;
    Ok(format!(
        "{}\nby {}\nin tx {}\n\n{}\n",
        item.title,
        item.authors_line(),
        item.txid,
        text
    ))
}

/// Writes the raw payload bytes to a file
pub struct FileExporter {
    path: Option<PathBuf>,
    written: Option<PathBuf>,
}

impl FileExporter {
    /// Export to `path`, or to a file named after the item in the current directory
    pub fn new(path: Option<PathBuf>) -> Self {
        FileExporter {
            path,
            written: None,
        }
    }

    pub fn default_path(item: &CatalogItem) -> PathBuf {
        PathBuf::from(format!(
            "{}.{}",
            safe_filename(&item.title),
            item.file_type.extension()
        ))
    }

    /// The path of the last exported file
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl Presenter for FileExporter {
    fn present(&mut self, item: &CatalogItem, payload: &[u8]) -> Result<()> {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| Self::default_path(item));
        fs::write(&path, payload).with_context(|| format!("failed writing {:?}", path))?;
        info!("wrote {} bytes of \"{}\" to {:?}", payload.len(), item.title, path);
        self.written = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use bitcoin::Txid;

    use crate::types::FileType;

    fn item(file_type: FileType) -> CatalogItem {
        CatalogItem {
            title: "Alice's Adventures in Wonderland".into(),
            authors: vec!["Lewis Carroll".into(), "John Tenniel".into()],
            txid: Txid::from_str(
                "3154d03bcc1f8fbfd89f2c3672567791187c95ba97d55ca05eca2ab4f40c3430",
            )
            .unwrap(),
            compressed: false,
            hex_left_trim: 9,
            file_type,
        }
    }

    #[test]
    fn test_text_viewer() {
        let mut viewer = TextViewer::new(Vec::new());
        viewer
            .present(&item(FileType::Txt), b"CHAPTER I.\nDown the Rabbit-Hole")
            .unwrap();
        let out = String::from_utf8(viewer.into_inner()).unwrap();
        assert_eq!(
            out,
            "Alice's Adventures in Wonderland\n\
             by Lewis Carroll, John Tenniel\n\
             in tx 3154d03bcc1f8fbfd89f2c3672567791187c95ba97d55ca05eca2ab4f40c3430\n\
             \n\
             CHAPTER I.\nDown the Rabbit-Hole\n"
        );
    }

    #[test]
    fn test_text_viewer_rejects_binary() {
        let mut viewer = TextViewer::new(Vec::new());
        assert!(viewer.present(&item(FileType::Pdf), b"%PDF-1.4").is_err());
        assert!(viewer.present(&item(FileType::Txt), &[0xff, 0xfe, 0x00]).is_err());
        assert!(viewer.into_inner().is_empty());
    }

    #[test]
    fn test_file_exporter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        let payload = b"%PDF-1.4\n\x00\xff binary";

        let mut exporter = FileExporter::new(Some(path.clone()));
        exporter.present(&item(FileType::Pdf), payload).unwrap();
        assert_eq!(exporter.written(), Some(path.as_path()));
        assert_eq!(fs::read(&path).unwrap(), &payload[..]);
    }

    #[test]
    fn test_default_export_path() {
        assert_eq!(
            FileExporter::default_path(&item(FileType::Pdf)),
            PathBuf::from("Alice's Adventures in Wonderland.pdf")
        );
    }
}
