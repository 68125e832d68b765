//! SVG backend: one standalone SVG document per page.
//!
//! Coordinates are written in points with a matching `viewBox`, so the
//! document prints at the page size it was laid out for.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::backend::{PageInfo, RenderBackend};
use super::instruction::{DrawImage, DrawInstruction, DrawText, FillRect, StrokeRect};
use crate::error::{Result, XlpageError};
use crate::styles::{EdgeStroke, FontFamily};
use crate::types::{EmbeddedImage, HAlign};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Renders pages to SVG strings.
pub struct SvgRenderer<'a> {
    /// Image table the `DrawImage` ids refer to
    images: &'a [EmbeddedImage],
    writer: Option<Writer<Vec<u8>>>,
    pages: Vec<String>,
    next_clip: usize,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(images: &'a [EmbeddedImage]) -> Self {
        Self {
            images,
            writer: None,
            pages: Vec::new(),
            next_clip: 0,
        }
    }
}

/// Format a length with at most three decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn font_stack(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Helvetica => "Helvetica, Arial, sans-serif",
        FontFamily::Times => "'Times New Roman', Times, serif",
        FontFamily::Courier => "'Courier New', Courier, monospace",
    }
}

fn write_fill(writer: &mut Writer<Vec<u8>>, fill: &FillRect) -> Result<()> {
    let r = &fill.rect;
    let mut rect = BytesStart::new("rect");
    rect.push_attribute(("x", num(r.x).as_str()));
    rect.push_attribute(("y", num(r.y).as_str()));
    rect.push_attribute(("width", num(r.width).as_str()));
    rect.push_attribute(("height", num(r.height).as_str()));
    rect.push_attribute(("fill", fill.color.to_hex().as_str()));
    writer.write_event(Event::Empty(rect))?;
    Ok(())
}

fn write_edge(
    writer: &mut Writer<Vec<u8>>,
    (x1, y1, x2, y2): (f64, f64, f64, f64),
    stroke: &EdgeStroke,
) -> Result<()> {
    let mut line = BytesStart::new("line");
    line.push_attribute(("x1", num(x1).as_str()));
    line.push_attribute(("y1", num(y1).as_str()));
    line.push_attribute(("x2", num(x2).as_str()));
    line.push_attribute(("y2", num(y2).as_str()));
    line.push_attribute(("stroke", stroke.color.to_hex().as_str()));
    line.push_attribute(("stroke-width", num(stroke.width).as_str()));
    let dashes = stroke.style.dash_pattern();
    if !dashes.is_empty() {
        let pattern: Vec<String> = dashes.iter().map(|d| num(*d)).collect();
        line.push_attribute(("stroke-dasharray", pattern.join(" ").as_str()));
    }
    writer.write_event(Event::Empty(line))?;
    Ok(())
}

fn write_stroke(writer: &mut Writer<Vec<u8>>, stroke: &StrokeRect) -> Result<()> {
    let r = &stroke.rect;
    let (left, top, right, bottom) = (r.x, r.y, r.x + r.width, r.y + r.height);
    let edges = [
        (stroke.edges.top, (left, top, right, top)),
        (stroke.edges.right, (right, top, right, bottom)),
        (stroke.edges.bottom, (left, bottom, right, bottom)),
        (stroke.edges.left, (left, top, left, bottom)),
    ];
    for (edge, coords) in edges {
        if let Some(edge) = edge {
            write_edge(writer, coords, &edge)?;
        }
    }
    Ok(())
}

fn write_image(
    writer: &mut Writer<Vec<u8>>,
    images: &[EmbeddedImage],
    image: &DrawImage,
) -> Result<()> {
    let Some(payload) = images.iter().find(|i| i.id == image.image_id) else {
        log::warn!("svg: image '{}' is not in the image table", image.image_id);
        return Ok(());
    };
    let href = format!(
        "data:{};base64,{}",
        image.format.mime_type(),
        BASE64.encode(&payload.data)
    );
    let r = &image.rect;
    let mut el = BytesStart::new("image");
    el.push_attribute(("x", num(r.x).as_str()));
    el.push_attribute(("y", num(r.y).as_str()));
    el.push_attribute(("width", num(r.width).as_str()));
    el.push_attribute(("height", num(r.height).as_str()));
    el.push_attribute(("preserveAspectRatio", "xMidYMid meet"));
    el.push_attribute(("href", href.as_str()));
    writer.write_event(Event::Empty(el))?;
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &DrawText, clip_id: &str) -> Result<()> {
    let r = &text.rect;
    let mut clip = BytesStart::new("clipPath");
    clip.push_attribute(("id", clip_id));
    writer.write_event(Event::Start(clip))?;
    let mut rect = BytesStart::new("rect");
    rect.push_attribute(("x", num(r.x).as_str()));
    rect.push_attribute(("y", num(r.y).as_str()));
    rect.push_attribute(("width", num(r.width).as_str()));
    rect.push_attribute(("height", num(r.height).as_str()));
    writer.write_event(Event::Empty(rect))?;
    writer.write_event(Event::End(BytesEnd::new("clipPath")))?;

    let anchor = match text.h_align {
        HAlign::Center => "middle",
        HAlign::Right => "end",
        HAlign::General | HAlign::Left => "start",
    };
    let mut el = BytesStart::new("text");
    el.push_attribute(("clip-path", format!("url(#{clip_id})").as_str()));
    el.push_attribute(("font-family", font_stack(text.family)));
    el.push_attribute(("font-size", num(text.size).as_str()));
    if text.variant.is_bold() {
        el.push_attribute(("font-weight", "bold"));
    }
    if text.variant.is_italic() {
        el.push_attribute(("font-style", "italic"));
    }
    el.push_attribute(("fill", text.color.to_hex().as_str()));
    el.push_attribute(("text-anchor", anchor));
    writer.write_event(Event::Start(el))?;

    for (line, (x, y)) in text.lines.iter().zip(text.line_origins()) {
        let mut span = BytesStart::new("tspan");
        span.push_attribute(("x", num(x).as_str()));
        span.push_attribute(("y", num(y).as_str()));
        writer.write_event(Event::Start(span))?;
        writer.write_event(Event::Text(BytesText::new(line)))?;
        writer.write_event(Event::End(BytesEnd::new("tspan")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}

impl RenderBackend for SvgRenderer<'_> {
    type Output = Vec<String>;

    fn begin_page(&mut self, page: &PageInfo) -> Result<()> {
        if self.writer.is_some() {
            return Err(XlpageError::Render(format!(
                "page {} started before the previous page ended",
                page.index
            )));
        }
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", SVG_NS));
        svg.push_attribute(("width", format!("{}pt", num(page.width)).as_str()));
        svg.push_attribute(("height", format!("{}pt", num(page.height)).as_str()));
        svg.push_attribute((
            "viewBox",
            format!("0 0 {} {}", num(page.width), num(page.height)).as_str(),
        ));
        writer.write_event(Event::Start(svg))?;
        self.writer = Some(writer);
        Ok(())
    }

    fn draw(&mut self, instruction: &DrawInstruction) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| XlpageError::Render("draw outside of a page".to_string()))?;
        match instruction {
            DrawInstruction::FillRect(fill) => write_fill(writer, fill),
            DrawInstruction::StrokeRect(stroke) => write_stroke(writer, stroke),
            DrawInstruction::DrawImage(image) => write_image(writer, self.images, image),
            DrawInstruction::DrawText(text) => {
                let clip_id = format!("clip{}", self.next_clip);
                self.next_clip += 1;
                write_text(writer, text, &clip_id)
            }
        }
    }

    fn end_page(&mut self) -> Result<()> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| XlpageError::Render("end_page without begin_page".to_string()))?;
        writer.write_event(Event::End(BytesEnd::new("svg")))?;
        let svg = String::from_utf8(writer.into_inner())
            .map_err(|e| XlpageError::Render(e.to_string()))?;
        self.pages.push(svg);
        Ok(())
    }

    fn finish(&mut self) -> Result<Self::Output> {
        if self.writer.is_some() {
            return Err(XlpageError::Render("finish with an open page".to_string()));
        }
        Ok(std::mem::take(&mut self.pages))
    }
}
