// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG output for `vizir_layout_demo`.

use kurbo::{Affine, BezPath, Rect};
use peniko::Color;
use vizir_layout::{Drawable, Drawer, Primitive, PrimitiveKind, ShapeGeometry, Stroke};

/// Draws every primitive as one SVG element.
#[derive(Debug, Default)]
pub(crate) struct SvgDrawer {
    pub(crate) drawn: usize,
}

impl Drawer for SvgDrawer {
    type Output = String;

    fn draw(&mut self, primitive: &Primitive<'_>) -> String {
        self.drawn += 1;
        let mut out = String::new();
        match primitive.kind {
            PrimitiveKind::Connector {
                stroke, opacity, ..
            } => {
                let fill = primitive.fill.multiply_alpha(opacity as f32);
                for path in primitive.connector_paths() {
                    write_path(&mut out, &path, fill, stroke);
                }
            }
            PrimitiveKind::Rect {
                stroke,
                corner_radius,
            } => write_geometry(&mut out, primitive, stroke, corner_radius),
            PrimitiveKind::Outline {
                stroke,
                corner_radius,
            } => write_geometry(&mut out, primitive, Some(stroke), corner_radius),
            PrimitiveKind::Grid { paths, stroke } => {
                for path in paths {
                    write_path(&mut out, path, Color::TRANSPARENT, Some(stroke));
                }
            }
        }
        if let Some(name) = primitive.name {
            out = format!("<g data-name=\"{}\">{out}</g>", escape_xml(name));
        }
        out
    }
}

fn write_geometry(
    out: &mut String,
    primitive: &Primitive<'_>,
    stroke: Option<Stroke>,
    corner_radius: f64,
) {
    match primitive.geometry() {
        ShapeGeometry::Rect(r) => write_rect(out, r, corner_radius, primitive.fill, stroke),
        ShapeGeometry::Glyph {
            center,
            width,
            height,
        } => {
            let r = Rect::from_center_size(center, (width, height));
            write_rect(out, r, corner_radius, primitive.fill, stroke);
        }
        ShapeGeometry::Stroke { path, thickness } => {
            out.push_str(&format!(
                r#"<path d="{}" fill="none" stroke-width="{thickness}""#,
                path.to_svg()
            ));
            write_paint_attr(out, "stroke", primitive.fill);
            out.push_str("/>\n");
        }
        ShapeGeometry::Area(path) => write_path(out, &path, primitive.fill, stroke),
    }
}

fn write_rect(out: &mut String, r: Rect, corner_radius: f64, fill: Color, stroke: Option<Stroke>) {
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
    ));
    if corner_radius > 0.0 {
        out.push_str(&format!(r#" rx="{corner_radius}""#));
    }
    write_paint_attr(out, "fill", fill);
    write_stroke_attr(out, stroke);
    out.push_str("/>\n");
}

fn write_path(out: &mut String, path: &BezPath, fill: Color, stroke: Option<Stroke>) {
    out.push_str(&format!(r#"<path d="{}""#, path.to_svg()));
    write_paint_attr(out, "fill", fill);
    write_stroke_attr(out, stroke);
    out.push_str("/>\n");
}

/// Serialize a drawn tree.
///
/// Layout is y-up, so the whole scene is flipped into SVG's y-down space.
pub(crate) fn to_svg_string(drawn: &Drawable<String>, width: f64, height: f64) -> String {
    let pad = 10.0;
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
        -pad,
        -pad,
        width + 2.0 * pad,
        height + 2.0 * pad,
        width + 2.0 * pad,
        height + 2.0 * pad,
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<g transform="translate(0 {height}) scale(1 -1)">"#
    ));
    out.push('\n');
    write_drawable(&mut out, drawn);
    out.push_str("</g>\n</svg>\n");
    out
}

fn write_drawable(out: &mut String, drawn: &Drawable<String>) {
    match drawn {
        Drawable::Leaf(element) => out.push_str(element),
        Drawable::Group {
            transform,
            children,
        } => {
            if *transform == Affine::IDENTITY {
                out.push_str("<g>\n");
            } else {
                let [a, b, c, d, e, f] = transform.as_coeffs();
                out.push_str(&format!(
                    r#"<g transform="matrix({a} {b} {c} {d} {e} {f})">"#
                ));
                out.push('\n');
            }
            for child in children {
                write_drawable(out, child);
            }
            out.push_str("</g>\n");
        }
    }
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    if rgba.a == 0 {
        return ("none".to_string(), None);
    }
    let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let fill_opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (fill, fill_opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let (value, opacity) = svg_paint(color);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn write_stroke_attr(out: &mut String, stroke: Option<Stroke>) {
    let Some(stroke) = stroke else {
        return;
    };
    write_paint_attr(out, "stroke", stroke.color);
    out.push_str(&format!(r#" stroke-width="{}""#, stroke.width));
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
