//! PostScript output.
//!
//! Writes DSC 3.0 conforming Level 2 PostScript straight into the staged
//! file. Each page sets its own `PageSize` and paints one image with
//! ASCIIHex-encoded samples.

use std::io::Write;
use std::path::Path;
use tracing::debug;

use super::staging::StagedFile;
use super::{PagedDocumentWriter, WriteStatistics};
use crate::convert::{ColorMode, PageSpec};
use crate::decode::DecodedImage;
use crate::error::{ImgToPdfError, Result};

/// Sample bytes per line of hex data.
const HEX_LINE_BYTES: usize = 40;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

struct OpenPage {
    spec: PageSpec,
    height: f64,
}

/// PostScript writer session.
pub struct PostScriptWriter {
    staged: StagedFile,
    pages: usize,
    current: Option<OpenPage>,
}

impl PostScriptWriter {
    /// Open a session that will commit to `path` and write the document header.
    ///
    /// # Errors
    ///
    /// Returns [`ImgToPdfError::FailedToCreateOutput`] if the output stream
    /// cannot be created or the header cannot be written.
    pub fn create(path: &Path) -> Result<Self> {
        let mut staged = StagedFile::create(path)?;

        let header = format!(
            "%!PS-Adobe-3.0\n\
             %%Creator: {} {}\n\
             %%Pages: (atend)\n\
             %%LanguageLevel: 2\n\
             %%EndComments\n",
            crate::NAME,
            crate::VERSION
        );
        if let Err(e) = staged.writer().write_all(header.as_bytes()) {
            staged.discard();
            return Err(ImgToPdfError::failed_to_create_output(path.to_path_buf(), e));
        }

        Ok(Self {
            staged,
            pages: 0,
            current: None,
        })
    }

    fn write_samples(&mut self, samples: &[u8]) -> Result<()> {
        let out = self.staged.writer();
        let mut line = Vec::with_capacity(HEX_LINE_BYTES * 2 + 1);

        for chunk in samples.chunks(HEX_LINE_BYTES) {
            line.clear();
            for byte in chunk {
                line.push(HEX_DIGITS[usize::from(byte >> 4)]);
                line.push(HEX_DIGITS[usize::from(byte & 0x0f)]);
            }
            line.push(b'\n');
            out.write_all(&line)?;
        }

        // End-of-data marker for ASCIIHexDecode.
        out.write_all(b">\n")?;
        Ok(())
    }
}

impl PagedDocumentWriter for PostScriptWriter {
    fn begin_page(&mut self, spec: &PageSpec) -> Result<()> {
        if self.current.is_some() {
            return Err(ImgToPdfError::other("Previous page was not ended"));
        }

        let (width, height) = spec.page_size_points();
        let number = self.pages + 1;
        write!(
            self.staged.writer(),
            "%%Page: {number} {number}\n\
             %%BeginPageSetup\n\
             << /PageSize [{width:.2} {height:.2}] >> setpagedevice\n\
             %%EndPageSetup\n"
        )?;

        self.current = Some(OpenPage {
            spec: *spec,
            height,
        });

        Ok(())
    }

    fn draw_image(&mut self, image: &DecodedImage) -> Result<()> {
        let page = self
            .current
            .as_ref()
            .ok_or_else(|| ImgToPdfError::other("No page is open"))?;

        let (px_w, px_h) = (image.width(), image.height());
        let (draw_w, draw_h) = page.spec.image_size_points(px_w, px_h);
        let y = page.height - draw_h;

        let (samples, operator) = match page.spec.color_mode {
            ColorMode::GrayScale => (image.luma8(), "image"),
            ColorMode::Color => (image.rgb8(), "false 3 colorimage"),
        };

        write!(
            self.staged.writer(),
            "gsave\n\
             0 {y:.2} translate\n\
             {draw_w:.2} {draw_h:.2} scale\n\
             {px_w} {px_h} 8 [{px_w} 0 0 -{px_h} 0 {px_h}]\n\
             currentfile /ASCIIHexDecode filter {operator}\n"
        )?;
        self.write_samples(&samples)?;
        self.staged.writer().write_all(b"grestore\n")?;

        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        if self.current.take().is_none() {
            return Err(ImgToPdfError::other("No page is open"));
        }

        self.staged.writer().write_all(b"showpage\n")?;
        self.pages += 1;
        debug!(page = self.pages, "postscript page ended");

        Ok(())
    }

    fn pages(&self) -> usize {
        self.pages
    }

    fn finish(self: Box<Self>) -> Result<WriteStatistics> {
        let Self {
            mut staged,
            pages,
            current,
        } = *self;
        let path = staged.target().to_path_buf();

        if current.is_some() {
            staged.discard();
            return Err(ImgToPdfError::failed_to_write(
                path,
                std::io::Error::other("document finished with an open page"),
            ));
        }

        let trailer = format!("%%Trailer\n%%Pages: {pages}\n%%EOF\n");
        if let Err(e) = staged.writer().write_all(trailer.as_bytes()) {
            staged.discard();
            return Err(ImgToPdfError::failed_to_write(path, e));
        }

        let (file_size, write_time) = staged.commit()?;

        Ok(WriteStatistics {
            output_path: path,
            pages,
            file_size,
            write_time,
        })
    }

    fn abort(self: Box<Self>) {
        self.staged.discard();
    }
}
