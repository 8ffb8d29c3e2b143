//! Thin SVG canvas over the quick-xml event writer.
//!
//! Charts are emitted as plain events, no DOM; every helper writes one
//! self-contained element. Coordinates are finished to one decimal so
//! output is stable across platforms.

use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::theme;

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Text styling; fill defaults to the theme text color.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: u32,
    pub anchor: Anchor,
    pub fill: &'static str,
    pub bold: bool,
    /// Rotation in degrees around the text position.
    pub rotate: Option<f64>,
}

impl TextStyle {
    pub fn new(size: u32, anchor: Anchor) -> Self {
        Self {
            size,
            anchor,
            fill: theme::TEXT,
            bold: false,
            rotate: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn fill(mut self, fill: &'static str) -> Self {
        self.fill = fill;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// An SVG document being written.
pub struct Canvas {
    writer: Writer<Vec<u8>>,
    width: u32,
    height: u32,
}

pub fn fmt_coord(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

impl Canvas {
    /// Open a canvas with the paper background already painted.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        let w = width.to_string();
        let h = height.to_string();
        root.push_attribute(("width", w.as_str()));
        root.push_attribute(("height", h.as_str()));
        let view_box = format!("0 0 {width} {height}");
        root.push_attribute(("viewBox", view_box.as_str()));
        root.push_attribute(("font-family", theme::FONT_FAMILY));
        writer.write_event(Event::Start(root))?;

        let mut canvas = Self {
            writer,
            width,
            height,
        };
        canvas.rect(0.0, 0.0, f64::from(width), f64::from(height), theme::PAPER)?;
        Ok(canvas)
    }

    pub fn width(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.height)
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) -> Result<()> {
        let mut rect = BytesStart::new("rect");
        rect.push_attribute(("x", fmt_coord(x).as_str()));
        rect.push_attribute(("y", fmt_coord(y).as_str()));
        rect.push_attribute(("width", fmt_coord(w).as_str()));
        rect.push_attribute(("height", fmt_coord(h).as_str()));
        rect.push_attribute(("fill", fill));
        self.writer.write_event(Event::Empty(rect))?;
        Ok(())
    }

    pub fn rect_outlined(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Option<&str>,
        stroke: &str,
        stroke_width: f64,
    ) -> Result<()> {
        let mut rect = BytesStart::new("rect");
        rect.push_attribute(("x", fmt_coord(x).as_str()));
        rect.push_attribute(("y", fmt_coord(y).as_str()));
        rect.push_attribute(("width", fmt_coord(w).as_str()));
        rect.push_attribute(("height", fmt_coord(h).as_str()));
        rect.push_attribute(("fill", fill.unwrap_or("none")));
        rect.push_attribute(("stroke", stroke));
        rect.push_attribute(("stroke-width", fmt_coord(stroke_width).as_str()));
        self.writer.write_event(Event::Empty(rect))?;
        Ok(())
    }

    pub fn line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: &str,
        width: f64,
    ) -> Result<()> {
        let mut line = BytesStart::new("line");
        line.push_attribute(("x1", fmt_coord(x1).as_str()));
        line.push_attribute(("y1", fmt_coord(y1).as_str()));
        line.push_attribute(("x2", fmt_coord(x2).as_str()));
        line.push_attribute(("y2", fmt_coord(y2).as_str()));
        line.push_attribute(("stroke", stroke));
        line.push_attribute(("stroke-width", fmt_coord(width).as_str()));
        self.writer.write_event(Event::Empty(line))?;
        Ok(())
    }

    pub fn circle(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<&str>,
        stroke: Option<(&str, f64)>,
    ) -> Result<()> {
        let mut circle = BytesStart::new("circle");
        circle.push_attribute(("cx", fmt_coord(cx).as_str()));
        circle.push_attribute(("cy", fmt_coord(cy).as_str()));
        circle.push_attribute(("r", fmt_coord(r).as_str()));
        circle.push_attribute(("fill", fill.unwrap_or("none")));
        if let Some((color, width)) = stroke {
            circle.push_attribute(("stroke", color));
            circle.push_attribute(("stroke-width", fmt_coord(width).as_str()));
        }
        self.writer.write_event(Event::Empty(circle))?;
        Ok(())
    }

    /// A filled and/or stroked `<path>` from raw path data.
    pub fn path(
        &mut self,
        d: &str,
        fill: Option<&str>,
        stroke: Option<(&str, f64)>,
    ) -> Result<()> {
        let mut path = BytesStart::new("path");
        path.push_attribute(("d", d));
        path.push_attribute(("fill", fill.unwrap_or("none")));
        if let Some((color, width)) = stroke {
            path.push_attribute(("stroke", color));
            path.push_attribute(("stroke-width", fmt_coord(width).as_str()));
            path.push_attribute(("stroke-linejoin", "round"));
        }
        self.writer.write_event(Event::Empty(path))?;
        Ok(())
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) -> Result<()> {
        let mut text = BytesStart::new("text");
        text.push_attribute(("x", fmt_coord(x).as_str()));
        text.push_attribute(("y", fmt_coord(y).as_str()));
        text.push_attribute(("fill", style.fill));
        text.push_attribute(("font-size", style.size.to_string().as_str()));
        text.push_attribute(("text-anchor", style.anchor.as_svg()));
        if style.bold {
            text.push_attribute(("font-weight", "bold"));
        }
        if let Some(degrees) = style.rotate {
            let transform = format!("rotate({} {} {})", degrees, fmt_coord(x), fmt_coord(y));
            text.push_attribute(("transform", transform.as_str()));
        }
        self.writer.write_event(Event::Start(text))?;
        self.writer
            .write_event(Event::Text(BytesText::new(content)))?;
        self.writer.write_event(Event::End(BytesEnd::new("text")))?;
        Ok(())
    }

    /// Close the document and return the bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
        Ok(self.writer.into_inner())
    }

    /// Close the document and write it to `path`.
    pub fn save(self, path: &Path) -> Result<()> {
        let bytes = self.finish()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
