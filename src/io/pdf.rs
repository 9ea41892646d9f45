//! PDF output built with `lopdf`.
//!
//! Every page carries one image XObject placed at the top-left corner at the
//! size implied by the page resolution. Streams are Flate-compressed when the
//! document is committed.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;
use tracing::debug;

use super::staging::StagedFile;
use super::{PagedDocumentWriter, WriteStatistics};
use crate::convert::{ColorMode, PageSpec};
use crate::decode::DecodedImage;
use crate::error::{ImgToPdfError, Result};

const PDF_VERSION: &str = "1.5";

/// A page between `begin_page` and `end_page`.
struct OpenPage {
    spec: PageSpec,
    width: f64,
    height: f64,
    operations: Vec<Operation>,
    xobjects: Dictionary,
}

/// PDF writer session.
pub struct PdfDocumentWriter {
    staged: StagedFile,
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    current: Option<OpenPage>,
    image_count: usize,
}

impl PdfDocumentWriter {
    /// Open a session that will commit to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ImgToPdfError::FailedToCreateOutput`] if the output stream
    /// cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        let staged = StagedFile::create(path)?;
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        Ok(Self {
            staged,
            doc,
            pages_id,
            kids: Vec::new(),
            current: None,
            image_count: 0,
        })
    }

    fn open_page(&mut self) -> Result<&mut OpenPage> {
        self.current
            .as_mut()
            .ok_or_else(|| ImgToPdfError::other("No page is open"))
    }

    fn image_stream(image: &DecodedImage, color_mode: ColorMode) -> Stream {
        let (color_space, samples) = match color_mode {
            ColorMode::GrayScale => ("DeviceGray", image.luma8()),
            ColorMode::Color => ("DeviceRGB", image.rgb8()),
        };

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
        };

        Stream::new(dict, samples)
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

impl PagedDocumentWriter for PdfDocumentWriter {
    fn begin_page(&mut self, spec: &PageSpec) -> Result<()> {
        if self.current.is_some() {
            return Err(ImgToPdfError::other("Previous page was not ended"));
        }

        let (width, height) = spec.page_size_points();
        self.current = Some(OpenPage {
            spec: *spec,
            width,
            height,
            operations: Vec::new(),
            xobjects: Dictionary::new(),
        });

        Ok(())
    }

    fn draw_image(&mut self, image: &DecodedImage) -> Result<()> {
        let color_mode = self.open_page()?.spec.color_mode;
        let stream = Self::image_stream(image, color_mode);
        let image_id = self.doc.add_object(stream);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        let page = self.open_page()?;
        let (draw_w, draw_h) = page.spec.image_size_points(image.width(), image.height());

        // PDF space grows upwards; anchor the image's top edge to the page top.
        let y = page.height - draw_h;

        page.xobjects.set(name.as_bytes(), image_id);
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(draw_w),
                    0.into(),
                    0.into(),
                    real(draw_h),
                    0.into(),
                    real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);

        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let page = self
            .current
            .take()
            .ok_or_else(|| ImgToPdfError::other("No page is open"))?;

        let content = Content {
            operations: page.operations,
        }
        .encode()
        .map_err(|e| ImgToPdfError::other(format!("Failed to encode page content: {e}")))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(page.width), real(page.height)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => page.xobjects,
            },
        });

        self.kids.push(page_id.into());
        debug!(page = self.kids.len(), "pdf page ended");

        Ok(())
    }

    fn pages(&self) -> usize {
        self.kids.len()
    }

    fn finish(self: Box<Self>) -> Result<WriteStatistics> {
        let Self {
            mut staged,
            mut doc,
            pages_id,
            kids,
            current,
            ..
        } = *self;

        if current.is_some() {
            let path = staged.target().to_path_buf();
            staged.discard();
            return Err(ImgToPdfError::failed_to_write(
                path,
                std::io::Error::other("document finished with an open page"),
            ));
        }

        let pages = kids.len();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let path = staged.target().to_path_buf();
        if let Err(e) = doc.save_to(staged.writer()) {
            staged.discard();
            return Err(ImgToPdfError::failed_to_write(
                path,
                std::io::Error::other(e.to_string()),
            ));
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
