//! PDF 版面
//!
//! 坐标系以页面左上角为原点、单位为 pt，写出时再翻转为 PDF 坐标。
//! 文字宽度按标准 Helvetica 字体度量估算。

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

pub const A4_PORTRAIT: PageSize = PageSize {
    width: 595.28,
    height: 841.89,
};

pub const A4_LANDSCAPE: PageSize = PageSize {
    width: 841.89,
    height: 595.28,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }

    pub fn components(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    /// 页面资源中的字体名
    pub fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
        }
    }

    /// 单字符宽度（1/1000 em）
    fn glyph_width(self, ch: char) -> u16 {
        let table = match self {
            Font::Bold => &HELVETICA_BOLD,
            Font::Regular | Font::Italic => &HELVETICA,
        };
        match ch as u32 {
            code @ 32..=126 => table[(code - 32) as usize],
            _ => 556,
        }
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(font.glyph_width(c))).sum();
    units as f32 * size / 1000.0
}

/// 按宽度折行；单词超宽时按字符切分
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate, font, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if text_width(word, font, size) <= max_width {
                line = word.to_string();
                continue;
            }
            for ch in word.chars() {
                line.push(ch);
                if text_width(&line, font, size) > max_width && line.chars().count() > 1 {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(ch);
                }
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// 单个绘制指令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    /// `y` 为基线
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
        color: Rgb,
        align: Align,
    },
    /// 绘制 logo；`opacity` 用于水印
    Logo {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        opacity: Option<f32>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        x: f32,
        y: f32,
        text: impl Into<String>,
        font: Font,
        size: f32,
        color: Rgb,
        align: Align,
    ) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.into(),
            font,
            size,
            color,
            align,
        });
    }

    /// 页面上的全部文字，测试用
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

// =========================================================
// 页脚计数
// =========================================================

/// 每页已绘制的表体行数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRowCounter {
    counts: BTreeMap<usize, usize>,
}

/// 页脚中的 "Items a–b of n"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterRange {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl fmt::Display for FooterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Items {}\u{2013}{} of {}", self.start, self.end, self.total)
    }
}

impl PageRowCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 页码从 1 开始
    pub fn record(&mut self, page: usize) {
        *self.counts.entry(page).or_insert(0) += 1;
    }

    pub fn count(&self, page: usize) -> usize {
        self.counts.get(&page).copied().unwrap_or(0)
    }

    pub fn footer(&self, page: usize, total: usize) -> FooterRange {
        let prior: usize = self.counts.range(..page).map(|(_, c)| c).sum();
        let end = (prior + self.count(page)).min(total);
        // 只有跨页行续接部分的页面显示该行本身
        let start = if total == 0 { 0 } else { (prior + 1).min(end.max(1)) };
        FooterRange { start, end, total }
    }
}

// =========================================================
// 表格
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub padding: f32,
    pub line_height: f32,
    pub head_fill: Rgb,
    pub head_text: Rgb,
    pub body_text: Rgb,
    /// 奇数行（从 0 开始）底色
    pub alternate_fill: Option<Rgb>,
}

impl TableStyle {
    fn line_advance(&self) -> f32 {
        self.font_size * self.line_height
    }
}

pub struct TableLayout<'a> {
    pub page: PageSize,
    pub margins: Margins,
    pub style: TableStyle,
    /// 第一页表格起始位置
    pub start_y: f32,
    pub head: &'a [String],
    pub body: &'a [Vec<String>],
}

/// 排版结果
#[derive(Debug, Clone, Default)]
pub struct TableOutput {
    pub pages: Vec<Page>,
    pub rows: PageRowCounter,
}

impl TableLayout<'_> {
    /// 列宽：内容需要的宽度不足时等比放大；超出时先保证每列拿到平均宽度，剩余按需分配
    pub fn column_widths(&self) -> Vec<f32> {
        let n = self.head.len();
        if n == 0 {
            return Vec::new();
        }
        let available = self.page.width - self.margins.left - self.margins.right;
        let size = self.style.font_size;
        let pad = 2.0 * self.style.padding;

        let natural: Vec<f32> = (0..n)
            .map(|i| {
                let head = text_width(&self.head[i], Font::Bold, size);
                let body = self
                    .body
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| text_width(cell, Font::Regular, size))
                    .fold(0.0_f32, f32::max);
                head.max(body).max(size) + pad
            })
            .collect();
        let total: f32 = natural.iter().sum();

        if total <= available {
            return natural.iter().map(|w| w * available / total).collect();
        }

        let fair = available / n as f32;
        let base: Vec<f32> = natural.iter().map(|w| w.min(fair)).collect();
        let remaining = available - base.iter().sum::<f32>();
        let extra: Vec<f32> = natural.iter().zip(&base).map(|(w, b)| w - b).collect();
        let extra_total: f32 = extra.iter().sum();

        base.iter()
            .zip(&extra)
            .map(|(b, e)| {
                if extra_total > 0.0 {
                    b + remaining * e / extra_total
                } else {
                    *b
                }
            })
            .collect()
    }

    fn wrap_row(&self, cells: &[String], widths: &[f32], font: Font) -> Vec<Vec<String>> {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let text = cells.get(i).map(String::as_str).unwrap_or("");
                wrap_text(text, font, self.style.font_size, w - 2.0 * self.style.padding)
            })
            .collect()
    }

    fn row_height(&self, wrapped: &[Vec<String>]) -> f32 {
        let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        lines as f32 * self.style.line_advance() + 2.0 * self.style.padding
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_row(
        &self,
        page: &mut Page,
        y: f32,
        height: f32,
        widths: &[f32],
        wrapped: &[Vec<String>],
        fill: Option<Rgb>,
        font: Font,
        color: Rgb,
    ) {
        let mut x = self.margins.left;
        let size = self.style.font_size;
        for (i, w) in widths.iter().enumerate() {
            if let Some(fill) = fill {
                page.push(DrawOp::FillRect {
                    x,
                    y,
                    w: *w,
                    h: height,
                    color: fill,
                });
            }
            if let Some(lines) = wrapped.get(i) {
                for (n, line) in lines.iter().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    let baseline = y + self.style.padding + size * 0.8 + n as f32 * self.style.line_advance();
                    page.text(x + self.style.padding, baseline, line.clone(), font, size, color, Align::Left);
                }
            }
            x += w;
        }
    }

    fn draw_head(&self, page: &mut Page, y: f32, widths: &[f32], head: &[Vec<String>], height: f32) {
        self.draw_row(page, y, height, widths, head, Some(self.style.head_fill), Font::Bold, self.style.head_text);
    }

    /// 分页排版：每页重复表头。
    ///
    /// 放不下的行整体移到下一页；整页也放不下的行按折行拆分，
    /// 剩余行在下一页表头之后续排。拆分的行只计入起始页。
    pub fn layout(&self) -> TableOutput {
        let widths = self.column_widths();
        let head = self.wrap_row(self.head, &widths, Font::Bold);
        let head_height = self.row_height(&head);
        let limit = self.page.height - self.margins.bottom;
        let advance = self.style.line_advance();
        let pad = self.style.padding;
        let page_capacity = limit - self.margins.top - head_height;

        let mut out = TableOutput::default();
        let mut page = Page::default();
        let mut page_no = 1;
        let mut y = self.start_y;
        let mut fresh = true;

        self.draw_head(&mut page, y, &widths, &head, head_height);
        y += head_height;

        for (index, row) in self.body.iter().enumerate() {
            let fill = self.style.alternate_fill.filter(|_| index % 2 == 1);
            let mut rest = self.wrap_row(row, &widths, Font::Regular);
            let height = self.row_height(&rest);
            let lines_left = ((limit - y - 2.0 * pad) / advance).floor().max(0.0) as usize;

            if y + height > limit && !fresh && (height <= page_capacity || lines_left == 0) {
                out.pages.push(std::mem::take(&mut page));
                page_no += 1;
                y = self.margins.top;
                self.draw_head(&mut page, y, &widths, &head, head_height);
                y += head_height;
            }
            out.rows.record(page_no);

            loop {
                let height = self.row_height(&rest);
                if y + height <= limit {
                    self.draw_row(&mut page, y, height, &widths, &rest, fill, Font::Regular, self.style.body_text);
                    y += height;
                    break;
                }

                let fit = ((limit - y - 2.0 * pad) / advance).floor().max(1.0) as usize;
                let (part, tail): (Vec<_>, Vec<_>) = rest
                    .into_iter()
                    .map(|mut lines| {
                        let tail = lines.split_off(fit.min(lines.len()));
                        (lines, tail)
                    })
                    .unzip();
                let part_height = fit as f32 * advance + 2.0 * pad;
                self.draw_row(&mut page, y, part_height, &widths, &part, fill, Font::Regular, self.style.body_text);

                out.pages.push(std::mem::take(&mut page));
                page_no += 1;
                y = self.margins.top;
                self.draw_head(&mut page, y, &widths, &head, head_height);
                y += head_height;
                rest = tail;
            }
            fresh = false;
        }

        out.pages.push(page);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: TableStyle = TableStyle {
        font_size: 10.0,
        padding: 6.0,
        line_height: 1.15,
        head_fill: Rgb::gray(217),
        head_text: Rgb::gray(30),
        body_text: Rgb::gray(20),
        alternate_fill: Some(Rgb::gray(245)),
    };

    const MARGINS: Margins = Margins {
        top: 55.0,
        right: 40.0,
        bottom: 50.0,
        left: 40.0,
    };

    fn rows(n: usize) -> Vec<Vec<String>> {
        (1..=n).map(|i| vec![format!("Member {}", i), format!("m{}@example.com", i)]).collect()
    }

    #[test]
    fn test_text_width() {
        assert!((text_width("Hello", Font::Regular, 10.0) - 22.78).abs() < 0.01);
        assert!(text_width("Hello", Font::Bold, 10.0) > text_width("Hello", Font::Regular, 10.0));
        assert_eq!(text_width("", Font::Regular, 10.0), 0.0);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("the quick brown fox jumps", Font::Regular, 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Regular, 10.0) <= 60.0);
        }
        assert_eq!(lines.join(" "), "the quick brown fox jumps");

        let long = wrap_text("abcdefghijklmnopqrstuvwxyz", Font::Regular, 10.0, 30.0);
        assert!(long.len() > 1);
        assert_eq!(long.concat(), "abcdefghijklmnopqrstuvwxyz");

        assert_eq!(wrap_text("", Font::Regular, 10.0, 30.0), vec![String::new()]);
    }

    #[test]
    fn test_footer_range() {
        let mut counter = PageRowCounter::new();
        for _ in 0..30 {
            counter.record(1);
        }
        for _ in 0..12 {
            counter.record(2);
        }
        assert_eq!(counter.footer(1, 42), FooterRange { start: 1, end: 30, total: 42 });
        assert_eq!(counter.footer(2, 42), FooterRange { start: 31, end: 42, total: 42 });
        assert_eq!(counter.footer(2, 42).to_string(), "Items 31\u{2013}42 of 42");
        assert_eq!(PageRowCounter::new().footer(1, 0), FooterRange { start: 0, end: 0, total: 0 });
    }

    #[test]
    fn test_column_widths_fill_available_space() {
        let head = vec!["Name".to_string(), "Email".to_string()];
        let body = rows(3);
        let table = TableLayout {
            page: A4_PORTRAIT,
            margins: MARGINS,
            style: STYLE,
            start_y: 100.0,
            head: &head,
            body: &body,
        };
        let total: f32 = table.column_widths().iter().sum();
        assert!((total - (A4_PORTRAIT.width - 80.0)).abs() < 0.01);
    }

    #[test]
    fn test_pagination_footer_property() {
        let head = vec!["Name".to_string(), "Email".to_string()];
        for n in [0, 1, 5, 47, 48, 120, 333] {
            let body = rows(n);
            let table = TableLayout {
                page: A4_PORTRAIT,
                margins: MARGINS,
                style: STYLE,
                start_y: 100.0,
                head: &head,
                body: &body,
            };
            let out = table.layout();
            let pages = out.pages.len();
            assert!(pages >= 1);

            let mut expected_start = 1;
            for page in 1..=pages {
                let range = out.rows.footer(page, n);
                let count = out.rows.count(page);
                if n > 0 {
                    assert_eq!(range.start, expected_start, "n={n} page={page}");
                    assert_eq!(range.end, range.start + count - 1, "n={n} page={page}");
                }
                expected_start += count;
            }
            assert_eq!(out.rows.footer(pages, n).end, n);

            // 每页都重复表头
            for page in &out.pages {
                assert_eq!(page.texts().first().copied(), Some("Name"));
            }
        }
    }

    #[test]
    fn test_rows_stay_inside_bottom_margin() {
        let head = vec!["Name".to_string()];
        let body = rows(200);
        let table = TableLayout {
            page: A4_PORTRAIT,
            margins: MARGINS,
            style: STYLE,
            start_y: 100.0,
            head: &head,
            body: &body,
        };
        for page in table.layout().pages {
            for op in page.ops {
                if let DrawOp::FillRect { y, h, .. } = op {
                    assert!(y + h <= A4_PORTRAIT.height - MARGINS.bottom + 0.01);
                }
            }
        }
    }

    #[test]
    fn test_tall_row_splits_across_pages() {
        let head = vec!["Name".to_string(), "Notes".to_string()];
        let notes = (0..3000).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ");
        let body = vec![
            vec!["Member 1".to_string(), notes],
            vec!["Member 2".to_string(), "short".to_string()],
        ];
        let table = TableLayout {
            page: A4_PORTRAIT,
            margins: MARGINS,
            style: STYLE,
            start_y: 100.0,
            head: &head,
            body: &body,
        };
        let out = table.layout();
        let limit = A4_PORTRAIT.height - MARGINS.bottom;
        assert!(out.pages.len() > 1);

        let mut drawn = Vec::new();
        for page in &out.pages {
            assert_eq!(page.texts().first().copied(), Some("Name"));
            for op in &page.ops {
                match op {
                    DrawOp::Text { y, text, .. } => {
                        assert!(*y <= limit, "text '{text}' at y={y} below {limit}");
                        drawn.push(text.as_str());
                    }
                    DrawOp::FillRect { y, h, .. } => assert!(y + h <= limit + 0.01),
                    _ => {}
                }
            }
        }
        // 拆分不丢字
        assert!(drawn.contains(&"Member 1"));
        assert!(drawn.iter().any(|t| t.contains("word0 ")));
        assert!(drawn.iter().any(|t| t.ends_with("word2999")));
        assert_eq!(drawn.last().copied(), Some("short"));

        // 跨页行只计一次
        let pages = out.pages.len();
        assert_eq!(out.rows.count(1), 1);
        assert_eq!((1..=pages).map(|p| out.rows.count(p)).sum::<usize>(), 2);
        assert_eq!(out.rows.footer(2, 2), FooterRange { start: 1, end: 1, total: 2 });
        assert_eq!(out.rows.footer(pages, 2).end, 2);
    }
}
