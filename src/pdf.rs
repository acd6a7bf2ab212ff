//! Minimal PDF writer for text documents.
//!
//! Produces A4 pages of left-aligned text (with an optional right-hand
//! column) in the built-in Helvetica fonts. Text is encoded as
//! WinAnsiEncoding; characters outside it are printed as `?`.

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const RIGHT_COLUMN: f32 = 430.0;
const LINE_SPACING: f32 = 1.4;

const BODY_SIZE: f32 = 11.0;
const HEADING_SIZE: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "/F1",
            Font::Bold => "/F2",
        }
    }
}

/// Builder for a multi-page text document.
///
/// ```rust,ignore
/// let bytes = PdfDocument::new()
///     .heading("Order #1042")
///     .row("Subtotal", "12,50 €")
///     .build();
/// ```
#[derive(Debug)]
pub struct PdfDocument {
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
    cursor: f32,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::with_capacity(1024),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.line(&[(MARGIN, text)], Font::Bold, HEADING_SIZE)
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.line(&[(MARGIN, text)], Font::Regular, BODY_SIZE)
    }

    pub fn bold(&mut self, text: &str) -> &mut Self {
        self.line(&[(MARGIN, text)], Font::Bold, BODY_SIZE)
    }

    /// Label on the left, value in the right-hand column.
    pub fn row(&mut self, label: &str, value: &str) -> &mut Self {
        self.line(&[(MARGIN, label), (RIGHT_COLUMN, value)], Font::Regular, BODY_SIZE)
    }

    pub fn bold_row(&mut self, label: &str, value: &str) -> &mut Self {
        self.line(&[(MARGIN, label), (RIGHT_COLUMN, value)], Font::Bold, BODY_SIZE)
    }

    /// Blank line.
    pub fn gap(&mut self) -> &mut Self {
        self.advance(BODY_SIZE * LINE_SPACING);
        self
    }

    fn advance(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            self.break_page();
        }
        self.cursor -= height;
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn line(&mut self, cells: &[(f32, &str)], font: Font, size: f32) -> &mut Self {
        self.advance(size * LINE_SPACING);
        for (x, text) in cells {
            self.current.extend_from_slice(
                format!(
                    "BT {} {size:.1} Tf {x:.2} {:.2} Td (",
                    font.resource(),
                    self.cursor
                )
                .as_bytes(),
            );
            encode_text(text, &mut self.current);
            self.current.extend_from_slice(b") Tj ET\n");
        }
        self
    }

    /// Serializes the document.
    pub fn build(&self) -> Vec<u8> {
        let mut pages: Vec<&[u8]> = self.pages.iter().map(Vec::as_slice).collect();
        if !self.current.is_empty() || pages.is_empty() {
            pages.push(&self.current);
        }

        // 1: catalog, 2: page tree, 3-4: fonts, then (page, content) pairs.
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + i * 2).collect();
        let mut writer = ObjectWriter::new();

        writer.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        writer.object(
            2,
            format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()).as_bytes(),
        );
        writer.object(
            3,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        writer.object(
            4,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        for (page_id, content) in page_ids.iter().zip(pages) {
            let content_id = page_id + 1;
            writer.object(
                *page_id,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>"
                )
                .as_bytes(),
            );
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(content);
            stream.extend_from_slice(b"\nendstream");
            writer.object(content_id, &stream);
        }

        writer.finish()
    }
}

struct ObjectWriter {
    buffer: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut buffer = Vec::with_capacity(4096);
        buffer.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buffer,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets.push((id, self.buffer.len()));
        self.buffer
            .extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref = self.buffer.len();

        let mut table = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            table.push_str(&format!("{offset:010} 00000 n \n"));
        }
        table.push_str(&format!(
            "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n"
        ));
        self.buffer.extend_from_slice(table.as_bytes());
        self.buffer
    }
}

/// Encodes `text` as a WinAnsi literal string body.
fn encode_text(text: &str, out: &mut Vec<u8>) {
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '€' => out.push(0x80),
            '\u{2013}' => out.push(0x96),
            '\u{2014}' => out.push(0x97),
            ' '..='~' => out.push(ch as u8),
            '\u{A0}'..='\u{FF}' => out.push(ch as u32 as u8),
            _ => out.push(b'?'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn document_has_header_and_trailer() {
        let bytes = PdfDocument::new().heading("Receipt").build();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"/Count 1"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = PdfDocument::new().text("hello").build();
        let text = String::from_utf8_lossy(&bytes);
        let start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[start..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();

        assert_eq!(entries.len(), 6);
        for (index, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", index + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn text_is_escaped_and_win_ansi_encoded() {
        let mut out = Vec::new();
        encode_text("Total (net) 12,50 € ü ✓", &mut out);

        assert_eq!(out, b"Total \\(net\\) 12,50 \x80 \xFC ?".to_vec());
    }

    #[test]
    fn long_documents_break_pages() {
        let mut document = PdfDocument::new();
        for i in 0..80 {
            document.text(&format!("Line {i}"));
        }
        let bytes = document.build();

        assert!(contains(&bytes, b"/Count 2"));
    }
}
