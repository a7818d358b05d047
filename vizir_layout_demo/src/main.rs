// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart demos for `vizir_layout`.
//!
//! Set `RUST_LOG=vizir_layout=debug` to watch the layout phases, or `=trace` for every node.

mod svg;

use peniko::color::palette::css;
use tracing_subscriber::EnvFilter;
use vizir_layout::{
    Alignment, Axis, Clock, ConnectSpec, CoordSpec, EncloseSpec, Interpolation, LayerSpec,
    LayoutError, Node, RectSpec, RenderOptions, StackSpec, Stroke, connect, coord, enclose, layer,
    rect, reference, render, stack, stack_y, v,
};

const SEASONS: [&str; 4] = ["spring", "summer", "autumn", "winter"];

/// Rainfall per site and season.
const RAINFALL: [(&str, [f64; 4]); 3] = [
    ("north", [12.0, 4.0, 15.0, 22.0]),
    ("coast", [9.0, 6.0, 11.0, 18.0]),
    ("valley", [5.0, 2.0, 8.0, 7.0]),
];

fn main() -> Result<(), LayoutError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sections = [
        ("Stacked bars", 480.0, 300.0, stacked_bars()),
        ("Pie in clock coordinates", 300.0, 300.0, pie()),
        ("Ribbons between stacks", 480.0, 300.0, ribbons()),
    ];

    let mut html = String::from(
        "<!doctype html>\n<html><head><title>VizIR layout demo</title></head><body>\n",
    );
    for (title, width, height, chart) in sections {
        let mut drawer = svg::SvgDrawer::default();
        let drawn = render(&mut drawer, &RenderOptions::new(width, height), chart)?;
        tracing::info!(title, primitives = drawer.drawn, "rendered");
        html.push_str(&format!("<h2>{title}</h2>\n"));
        html.push_str(&svg::to_svg_string(&drawn, width, height));
    }
    html.push_str("</body></html>\n");

    std::fs::write("vizir_layout_demo.html", html).expect("write vizir_layout_demo.html");
    println!("wrote vizir_layout_demo.html");
    Ok(())
}

/// One column per site, seasons stacked bottom to top, all sharing one scale.
fn stacked_bars() -> Node {
    let columns = RAINFALL.map(|(site, values)| {
        let segments = SEASONS.iter().zip(values).map(|(season, mm)| {
            rect(RectSpec::new().with_w(v(1.0)).with_h(v(mm)).with_fill(*season))
        });
        stack_y(0.0, segments).named(site)
    });
    stack(
        StackSpec::new(Axis::X)
            .with_spacing(16.0)
            .with_alignment(Alignment::Start)
            .with_shared_scale(true),
        columns,
    )
}

/// Yearly totals as wedges: angle is the share, radius fills the space.
fn pie() -> Node {
    let wedges = RAINFALL.map(|(site, values)| {
        let total: f64 = values.iter().sum();
        rect(RectSpec::new().with_w(v(total)).with_h(v(1.0)).with_fill(site))
    });
    coord(
        CoordSpec::new(Clock).with_grid(Stroke::new(css::LIGHT_GRAY, 0.5)),
        [stack(StackSpec::new(Axis::X).with_shared_scale(true), wedges)],
    )
}

/// Two site columns joined season by season.
fn ribbons() -> Node {
    let column = |site: &str, values: [f64; 4]| {
        let segments = SEASONS.iter().zip(values).map(|(season, mm)| {
            rect(RectSpec::new().with_w(30.0).with_h(v(mm)).with_fill(*season))
                .named(format!("{site}/{season}"))
        });
        enclose(
            EncloseSpec::new().with_padding(3.0),
            [stack(StackSpec::new(Axis::Y).with_spacing(4.0), segments)],
        )
    };
    let (north, north_values) = RAINFALL[0];
    let (valley, valley_values) = RAINFALL[2];
    let links = SEASONS.map(|season| {
        connect(
            ConnectSpec::new(Axis::X)
                .with_interpolation(Interpolation::Bezier)
                .with_opacity(0.5),
            [
                reference(format!("{north}/{season}")),
                reference(format!("{valley}/{season}")),
            ],
        )
    });
    let body = stack(
        StackSpec::new(Axis::X)
            .with_spacing(120.0)
            .with_alignment(Alignment::Start)
            .with_shared_scale(true),
        [column(north, north_values), column(valley, valley_values)],
    );
    layer(LayerSpec::new(), [body, layer(LayerSpec::new(), links)])
}
