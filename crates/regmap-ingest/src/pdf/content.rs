//! Content stream interpretation: positioned text runs and filled rectangles.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Encoding, Object};

use regmap_model::Rgb;

/// Affine matrix `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translate(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(self, other: Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a * a2 + b * c2,
            a * b2 + b * d2,
            c * a2 + d * c2,
            c * b2 + d * d2,
            e * a2 + f * c2 + e2,
            e * b2 + f * d2 + f2,
        ])
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    fn scale_x(&self) -> f32 {
        let [a, b, ..] = self.0;
        (a * a + b * b).sqrt()
    }
}

/// A string shown by a text operator, in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Estimated advance width.
    pub width: f32,
    pub font_size: f32,
    pub fill: Rgb,
}

impl TextRun {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A filled rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillZone {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub fill: Rgb,
}

impl FillZone {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    fn area(&self) -> f32 {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// Text runs and colour zones found on one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub runs: Vec<TextRun>,
    pub zones: Vec<FillZone>,
}

impl PageContent {
    /// Fill of the smallest non-white zone containing the point.
    pub fn fill_at(&self, x: f32, y: f32) -> Option<Rgb> {
        self.zones
            .iter()
            .filter(|zone| !zone.fill.is_white() && zone.contains(x, y))
            .min_by(|a, b| a.area().total_cmp(&b.area()))
            .map(|zone| zone.fill)
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Matrix,
    fill: Rgb,
}

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;

/// Encodings of the page fonts that carry a ToUnicode map or a named
/// encoding, keyed by resource name.
pub type FontEncodings<'a> = BTreeMap<Vec<u8>, Encoding<'a>>;

struct Interpreter<'f> {
    fonts: &'f FontEncodings<'f>,
    font: Option<Vec<u8>>,
    graphics: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    font_size: f32,
    pending_rects: Vec<(f32, f32, f32, f32)>,
    page: PageContent,
}

fn number(operand: Option<&Object>) -> Option<f32> {
    operand.and_then(|obj| obj.as_float().ok())
}

fn numbers(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(|obj| obj.as_float().ok()).collect()
}

impl<'f> Interpreter<'f> {
    fn new(fonts: &'f FontEncodings<'f>) -> Self {
        Self {
            fonts,
            font: None,
            graphics: GraphicsState {
                ctm: Matrix::IDENTITY,
                fill: Rgb::new(0, 0, 0),
            },
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            font_size: 12.0,
            pending_rects: Vec::new(),
            page: PageContent::default(),
        }
    }

    /// Decode through the current font when its encoding is known.
    fn decode(&self, obj: &Object) -> Option<String> {
        if let Object::String(bytes, _) = obj
            && let Some(encoding) = self.font.as_ref().and_then(|name| self.fonts.get(name))
            && let Ok(text) = lopdf::Document::decode_text(encoding, bytes)
        {
            return Some(text);
        }
        decode_string(obj)
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translate(tx, ty).then(self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show(&mut self, text: &str) {
        let advance = text.chars().count() as f32 * self.font_size * GLYPH_ADVANCE;
        self.emit(text, advance);
        self.text_matrix = Matrix::translate(advance, 0.0).then(self.text_matrix);
    }

    fn emit(&mut self, text: &str, advance: f32) {
        if text.trim().is_empty() {
            return;
        }
        let rendering = self.text_matrix.then(self.graphics.ctm);
        let (x, y) = rendering.apply(0.0, 0.0);
        self.page.runs.push(TextRun {
            text: text.to_string(),
            x,
            y,
            width: advance * rendering.scale_x(),
            font_size: self.font_size * rendering.scale_x(),
            fill: self.graphics.fill,
        });
    }

    /// `TJ` arrays mix strings with kerning in thousandths of an em.
    fn show_array(&mut self, items: &[Object]) {
        let mut text = String::new();
        let mut advance = 0.0;
        for item in items {
            if let Some(part) = self.decode(item) {
                advance += part.chars().count() as f32 * self.font_size * GLYPH_ADVANCE;
                text.push_str(&part);
            } else if let Ok(kern) = item.as_float() {
                let shift = -kern / 1000.0 * self.font_size;
                // A wide gap inside one TJ separates words.
                if shift > self.font_size * GLYPH_ADVANCE && !text.ends_with(' ') {
                    text.push(' ');
                }
                advance += shift;
            }
        }
        self.emit(&text, advance);
        self.text_matrix = Matrix::translate(advance, 0.0).then(self.text_matrix);
    }

    fn set_fill(&mut self, operands: &[Object]) {
        let values = numbers(operands);
        let fill = match values.as_slice() {
            [gray] => Rgb::from_unit(*gray, *gray, *gray),
            [r, g, b] => Rgb::from_unit(*r, *g, *b),
            [c, m, y, k] => Rgb::from_unit(
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ),
            _ => return,
        };
        self.graphics.fill = fill;
    }

    fn fill_path(&mut self) {
        let ctm = self.graphics.ctm;
        for (x, y, w, h) in self.pending_rects.drain(..) {
            let (ax, ay) = ctm.apply(x, y);
            let (bx, by) = ctm.apply(x + w, y + h);
            self.page.zones.push(FillZone {
                x0: ax.min(bx),
                y0: ay.min(by),
                x1: ax.max(bx),
                y1: ay.max(by),
                fill: self.graphics.fill,
            });
        }
    }

    fn step(&mut self, operation: &Operation) {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "q" => self.stack.push(self.graphics),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.graphics = saved;
                }
            }
            "cm" => {
                if let [a, b, c, d, e, f] = numbers(operands)[..] {
                    self.graphics.ctm = Matrix([a, b, c, d, e, f]).then(self.graphics.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.font = Some(name.clone());
                }
                if let Some(size) = number(operands.get(1)) {
                    self.font_size = size.abs().max(1.0);
                }
            }
            "TL" => {
                if let Some(leading) = number(operands.first()) {
                    self.leading = leading;
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f] = numbers(operands)[..] {
                    self.line_matrix = Matrix([a, b, c, d, e, f]);
                    self.text_matrix = self.line_matrix;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty] = numbers(operands)[..] {
                    if operation.operator == "TD" {
                        self.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(text) = operands.first().and_then(|obj| self.decode(obj)) {
                    self.show(&text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(text) = operands.first().and_then(|obj| self.decode(obj)) {
                    self.show(&text);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(text) = operands.get(2).and_then(|obj| self.decode(obj)) {
                    self.show(&text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let items = items.clone();
                    self.show_array(&items);
                }
            }
            "rg" | "g" | "k" | "sc" | "scn" => self.set_fill(operands),
            "re" => {
                if let [x, y, w, h] = numbers(operands)[..] {
                    self.pending_rects.push((x, y, w, h));
                }
            }
            "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => self.fill_path(),
            "n" | "S" | "s" => self.pending_rects.clear(),
            _ => {}
        }
    }
}

/// Interpret a decoded content stream. Strings shown in a font missing
/// from `fonts` fall back to [`decode_string`].
pub fn interpret(content: &Content, fonts: &FontEncodings<'_>) -> PageContent {
    let mut interpreter = Interpreter::new(fonts);
    for operation in &content.operations {
        interpreter.step(operation);
    }
    interpreter.page
}

/// Text of a PDF string object: UTF-16BE with BOM, Latin-1 otherwise.
pub fn decode_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                Some(bytes.iter().map(|&b| b as char).collect())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    #[test]
    fn text_positions_follow_td_and_leading() {
        let content = Content {
            operations: vec![
                op("BT", vec![]),
                op("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]),
                op("Td", vec![50.into(), 700.into()]),
                op("Tj", vec![Object::string_literal("ESCRITURA")]),
                op("TL", vec![14.into()]),
                op("T*", vec![]),
                op("Tj", vec![Object::string_literal("100")]),
                op("ET", vec![]),
            ],
        };
        let page = interpret(&content, &FontEncodings::new());
        assert_eq!(page.runs.len(), 2);
        assert_eq!(page.runs[0].text, "ESCRITURA");
        assert_eq!((page.runs[0].x, page.runs[0].y), (50.0, 700.0));
        assert_eq!((page.runs[1].x, page.runs[1].y), (50.0, 686.0));
        assert_eq!(page.runs[0].width, 45.0);
    }

    #[test]
    fn filled_rectangles_become_zones() {
        let content = Content {
            operations: vec![
                op("rg", vec![1.into(), 0.into(), 0.into()]),
                op("re", vec![40.into(), 690.into(), 200.into(), 20.into()]),
                op("f", vec![]),
                op("g", vec![1.into()]),
                op("re", vec![0.into(), 0.into(), 595.into(), 842.into()]),
                op("f", vec![]),
            ],
        };
        let page = interpret(&content, &FontEncodings::new());
        assert_eq!(page.zones.len(), 2);
        assert_eq!(page.fill_at(60.0, 700.0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(page.fill_at(10.0, 10.0), None);
    }

    #[test]
    fn tj_array_kerning_splits_words() {
        let content = Content {
            operations: vec![
                op("BT", vec![]),
                op("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]),
                op(
                    "TJ",
                    vec![Object::Array(vec![
                        Object::string_literal("READ"),
                        Object::Integer(-800),
                        Object::string_literal("REGISTER"),
                    ])],
                ),
                op("ET", vec![]),
            ],
        };
        let page = interpret(&content, &FontEncodings::new());
        assert_eq!(page.runs[0].text, "READ REGISTER");
    }

    #[test]
    fn utf16_strings_decode() {
        let obj = Object::String(
            vec![0xFE, 0xFF, 0x00, 0xB0, 0x00, 0x43],
            lopdf::StringFormat::Hexadecimal,
        );
        assert_eq!(decode_string(&obj).as_deref(), Some("°C"));
    }
}
