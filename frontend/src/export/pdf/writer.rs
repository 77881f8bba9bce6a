//! 把排版结果写成 PDF
//!
//! 排版使用左上角原点，写出时翻转为 PDF 的左下角原点。
//! 三种字体都是 Type1 标准字体，使用 WinAnsi 编码，无需嵌入字体文件。

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use super::layout::{Align, DrawOp, Font, Page, PageSize, Rgb, text_width};
use super::logo::LogoImage;
use crate::export::ExportError;

const LOGO_NAME: &str = "Logo";
const WATERMARK_STATE: &str = "GS1";
/// 占位图的绘制空间
const PLACEHOLDER_BOX: f32 = 80.0;
const PLACEHOLDER_FILL: Rgb = Rgb(0xD9, 0xD9, 0xD9);
const PLACEHOLDER_TEXT: Rgb = Rgb::gray(0);

fn pdf_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// WinAnsi 编码；无法表示的字符替换为 `?`
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{20AC}' => 0x80,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

fn op(name: &str, operands: Vec<Object>) -> Operation {
    Operation::new(name, operands)
}

fn fill_color(color: Rgb) -> Operation {
    op("rg", color.components().into_iter().map(real).collect())
}

fn stroke_color(color: Rgb) -> Operation {
    op("RG", color.components().into_iter().map(real).collect())
}

/// 单行文字指令，`x` / `y` 已是 PDF 坐标
fn text_ops(ops: &mut Vec<Operation>, x: f32, y: f32, text: &str, font: Font, size: f32, color: Rgb) {
    ops.push(op("BT", vec![]));
    ops.push(op("Tf", vec![Object::Name(font.resource().as_bytes().to_vec()), real(size)]));
    ops.push(fill_color(color));
    ops.push(op("Td", vec![real(x), real(y)]));
    ops.push(op("Tj", vec![Object::String(win_ansi(text), StringFormat::Literal)]));
    ops.push(op("ET", vec![]));
}

fn page_operations(page: &Page, size: PageSize, has_logo: bool) -> Vec<Operation> {
    let flip = |y: f32| size.height - y;
    let mut ops = Vec::new();

    for draw in &page.ops {
        match draw {
            DrawOp::FillRect { x, y, w, h, color } => {
                ops.push(fill_color(*color));
                ops.push(op("re", vec![real(*x), real(flip(*y + *h)), real(*w), real(*h)]));
                ops.push(op("f", vec![]));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                ops.push(stroke_color(*color));
                ops.push(op("w", vec![real(*width)]));
                ops.push(op("m", vec![real(*x1), real(flip(*y1))]));
                ops.push(op("l", vec![real(*x2), real(flip(*y2))]));
                ops.push(op("S", vec![]));
            }
            DrawOp::Text {
                x,
                y,
                text,
                font,
                size: font_size,
                color,
                align,
            } => {
                let width = text_width(text, *font, *font_size);
                let left = match align {
                    Align::Left => *x,
                    Align::Center => *x - width / 2.0,
                    Align::Right => *x - width,
                };
                text_ops(&mut ops, left, flip(*y), text, *font, *font_size, *color);
            }
            DrawOp::Logo { x, y, w, h, opacity } => {
                if !has_logo {
                    continue;
                }
                ops.push(op("q", vec![]));
                if opacity.is_some() {
                    ops.push(op("gs", vec![Object::Name(WATERMARK_STATE.as_bytes().to_vec())]));
                }
                ops.push(op(
                    "cm",
                    vec![real(*w), real(0.0), real(0.0), real(*h), real(*x), real(flip(*y + *h))],
                ));
                ops.push(op("Do", vec![Object::Name(LOGO_NAME.as_bytes().to_vec())]));
                ops.push(op("Q", vec![]));
            }
        }
    }
    ops
}

/// 圆角矩形路径（四段贝塞尔曲线）
fn rounded_rect(ops: &mut Vec<Operation>, x: f32, y: f32, w: f32, h: f32, r: f32) {
    const K: f32 = 0.552_284_8;
    let c = r * K;
    ops.push(op("m", vec![real(x + r), real(y)]));
    ops.push(op("l", vec![real(x + w - r), real(y)]));
    ops.push(op("c", vec![real(x + w - r + c), real(y), real(x + w), real(y + r - c), real(x + w), real(y + r)]));
    ops.push(op("l", vec![real(x + w), real(y + h - r)]));
    ops.push(op("c", vec![real(x + w), real(y + h - r + c), real(x + w - r + c), real(y + h), real(x + w - r), real(y + h)]));
    ops.push(op("l", vec![real(x + r), real(y + h)]));
    ops.push(op("c", vec![real(x + r - c), real(y + h), real(x), real(y + h - r + c), real(x), real(y + h - r)]));
    ops.push(op("l", vec![real(x), real(y + r)]));
    ops.push(op("c", vec![real(x), real(y + r - c), real(x + r - c), real(y), real(x + r), real(y)]));
    ops.push(op("h", vec![]));
}

/// 占位图内容：灰色圆角方块，中间是黑色粗体首字母
fn placeholder_operations(initial: char) -> Vec<Operation> {
    let mut ops = Vec::new();
    ops.push(fill_color(PLACEHOLDER_FILL));
    rounded_rect(&mut ops, 0.0, 0.0, PLACEHOLDER_BOX, PLACEHOLDER_BOX, 12.0);
    ops.push(op("f", vec![]));

    let letter = initial.to_string();
    let size = PLACEHOLDER_BOX * 0.32;
    let x = (PLACEHOLDER_BOX - text_width(&letter, Font::Bold, size)) / 2.0;
    let y = PLACEHOLDER_BOX / 2.0 - size * 0.35;
    text_ops(&mut ops, x, y, &letter, Font::Bold, size, PLACEHOLDER_TEXT);
    ops
}

/// PDF 文档构建器
pub struct PdfWriter {
    doc: Document,
    fonts: ObjectId,
    logo: Option<ObjectId>,
    watermark: Option<ObjectId>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let mut fonts = lopdf::Dictionary::new();
        for font in [Font::Regular, Font::Bold, Font::Italic] {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource(), id);
        }
        let fonts = doc.add_object(fonts);
        Self {
            doc,
            fonts,
            logo: None,
            watermark: None,
        }
    }

    /// 嵌入 logo；水印与页眉共用同一个对象
    pub fn embed_logo(&mut self, logo: &LogoImage) -> Result<(), ExportError> {
        let id = match logo {
            LogoImage::Jpeg {
                width,
                height,
                components,
                data,
            } => {
                let color_space = match components {
                    1 => "DeviceGray",
                    4 => "DeviceCMYK",
                    _ => "DeviceRGB",
                };
                let dict = dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(*width),
                    "Height" => i64::from(*height),
                    "ColorSpace" => color_space,
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                };
                self.doc.add_object(Stream::new(dict, data.clone()))
            }
            LogoImage::Raster {
                width,
                height,
                gray,
                pixels,
                alpha,
            } => {
                let mut dict = dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(*width),
                    "Height" => i64::from(*height),
                    "ColorSpace" => if *gray { "DeviceGray" } else { "DeviceRGB" },
                    "BitsPerComponent" => 8,
                };
                if let Some(alpha) = alpha {
                    let mask = dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => i64::from(*width),
                        "Height" => i64::from(*height),
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    };
                    let mask_id = self.doc.add_object(Stream::new(mask, alpha.clone()));
                    dict.set("SMask", mask_id);
                }
                let mut stream = Stream::new(dict, pixels.clone());
                let _ = stream.compress();
                self.doc.add_object(stream)
            }
            LogoImage::Placeholder { initial } => self.placeholder(*initial)?,
        };

        let gs = self.doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => real(0.02),
            "CA" => real(0.02),
        });
        self.logo = Some(id);
        self.watermark = Some(gs);
        Ok(())
    }

    /// 灰色圆角方块 + 首字母的 Form XObject，缩放到单位正方形
    fn placeholder(&mut self, initial: char) -> Result<ObjectId, ExportError> {
        let ops = placeholder_operations(initial);
        let content = Content { operations: ops }.encode().map_err(pdf_err)?;
        let scale = 1.0 / PLACEHOLDER_BOX;
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), real(PLACEHOLDER_BOX), real(PLACEHOLDER_BOX)],
            "Matrix" => vec![real(scale), real(0.0), real(0.0), real(scale), real(0.0), real(0.0)],
            "Resources" => dictionary! { "Font" => self.fonts },
        };
        Ok(self.doc.add_object(Stream::new(dict, content)))
    }

    /// 写出全部页面并序列化
    pub fn finish(mut self, pages: &[Page], size: PageSize, title: &str, producer: &str) -> Result<Vec<u8>, ExportError> {
        let pages_id = self.doc.new_object_id();

        let mut resources = dictionary! { "Font" => self.fonts };
        if let (Some(logo), Some(gs)) = (self.logo, self.watermark) {
            resources.set("XObject", dictionary! { LOGO_NAME => logo });
            resources.set("ExtGState", dictionary! { WATERMARK_STATE => gs });
        }
        let resources_id = self.doc.add_object(resources);

        let mut kids = Vec::with_capacity(pages.len());
        for page in pages {
            let content = Content {
                operations: page_operations(page, size, self.logo.is_some()),
            };
            let mut stream = Stream::new(dictionary! {}, content.encode().map_err(pdf_err)?);
            let _ = stream.compress();
            let content_id = self.doc.add_object(stream);
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), real(size.width), real(size.height)],
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::String(win_ansi(title), StringFormat::Literal),
            "Producer" => Object::String(win_ansi(producer), StringFormat::Literal),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        let mut out = Vec::new();
        self.doc.save_to(&mut out).map_err(pdf_err)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pdf::layout::A4_PORTRAIT;

    fn page_with_text(text: &str) -> Page {
        let mut page = Page::default();
        page.text(40.0, 100.0, text, Font::Regular, 10.0, Rgb::gray(20), Align::Left);
        page.push(DrawOp::Logo {
            x: 10.0,
            y: 10.0,
            w: 40.0,
            h: 40.0,
            opacity: None,
        });
        page
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Items 1\u{2013}2"), b"Items 1\x962".to_vec());
        assert_eq!(win_ansi("caf\u{e9}"), b"caf\xe9".to_vec());
        assert_eq!(win_ansi("\u{4e2d}"), b"?".to_vec());
    }

    #[test]
    fn test_coordinates_are_flipped() {
        let ops = page_operations(&page_with_text("Hi"), A4_PORTRAIT, false);
        let td = ops.iter().find(|o| o.operator == "Td").unwrap();
        assert_eq!(td.operands[1], Object::Real(A4_PORTRAIT.height - 100.0));
        // 没有嵌入 logo 时不引用 XObject
        assert!(!ops.iter().any(|o| o.operator == "Do"));
    }

    #[test]
    fn test_document_has_pages_and_logo() {
        let mut writer = PdfWriter::new();
        writer.embed_logo(&LogoImage::Placeholder { initial: 'Z' }).unwrap();
        let pages = vec![page_with_text("one"), page_with_text("two")];
        let bytes = writer.finish(&pages, A4_PORTRAIT, "Members", "Azonation").unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_placeholder_initial_is_black_on_grey() {
        let ops = placeholder_operations('Q');
        let colors: Vec<&Vec<Object>> = ops.iter().filter(|o| o.operator == "rg").map(|o| &o.operands).collect();
        let grey = PLACEHOLDER_FILL.components()[0];
        assert_eq!(colors[0], &vec![Object::Real(grey); 3]);
        assert_eq!(colors[1], &vec![Object::Real(0.0); 3]);

        let tj = ops.iter().find(|o| o.operator == "Tj").unwrap();
        assert_eq!(tj.operands[0], Object::String(b"Q".to_vec(), StringFormat::Literal));
    }
}
