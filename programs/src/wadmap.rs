use std::io::Write;

extern crate svg;
use svg::node::element::{Circle, Group, Line, Style};
use svg::node::Node;
use svg::Document;
extern crate termcolor;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
#[macro_use]
extern crate clap;

extern crate wadmap;
use wadmap::errors::{Error, Result};
use wadmap::geom::{Offset, Point};
use wadmap::map::MapEditor;
use wadmap::parse::map::{Sector, Thing};
use wadmap::transform::mirror;

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => {
            drop(write_err(err));
        }
    }
}

fn write_err(err: Error) -> Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(&mut stderr, "error: ")?;
    stderr.set_color(&ColorSpec::new())?;
    writeln!(&mut stderr, "{}", err)?;
    Ok(())
}

fn run() -> Result<()> {
    let args = clap_app!(wadmap =>
        (about: "Builds and transforms Doom map lumps")
        (@subcommand demo =>
            (about: "Build a little demo map and print its lump sizes")
            (@arg mirror: -m --mirror "Mirror the map first")
        )
        (@subcommand chart =>
            (about: "Render the demo map as an SVG")
            (@arg outfile: +required "Output file")
        )
    ).get_matches();

    match args.subcommand() {
        ("demo", Some(subargs)) => do_demo(subargs.is_present("mirror"))?,
        ("chart", Some(subargs)) => do_chart(subargs.value_of("outfile").unwrap())?,
        _ => {
            println!("try `wadmap demo` or `wadmap chart out.svg`");
        }
    }

    Ok(())
}

/// An outer room with a raised bright plinth in one corner, plus a full
/// copy of both pasted off to the east.  Enough to give every editing
/// operation something to chew on.
fn build_demo_map() -> Result<MapEditor> {
    let mut ed = MapEditor::new();

    ed.draw_sector(&[(0, 0), (0, 256), (256, 256), (256, 0)], None, None)?;
    let mut plinth = Sector::default();
    plinth.z_floor = 32;
    plinth.light = 255;
    ed.draw_sector(
        &[(32, 32), (32, 96), (96, 96), (96, 32)],
        Some(&plinth),
        None,
    )?;

    let mut start = Thing::default();
    start.x = 128;
    start.y = 128;
    start.angle = 90;
    start.doomednum = 1;
    ed.things.push(start);

    let original = ed.clone();
    ed.paste(&original, Offset::new(512, 0));
    Ok(ed)
}

fn do_demo(mirrored: bool) -> Result<()> {
    let mut ed = build_demo_map()?;
    if mirrored {
        mirror(&mut ed);
    }

    println!(
        "{} vertices, {} linedefs, {} sidedefs, {} sectors, {} things",
        ed.vertices.len(),
        ed.linedefs.len(),
        ed.sidedefs.len(),
        ed.sectors.len(),
        ed.things.len()
    );
    if let Some((min, max)) = ed.bbox() {
        println!("extents ({}, {}) to ({}, {})", min.x, min.y, max.x, max.y);
    }

    for (name, data) in ed.to_lumps()?.iter() {
        println!("{:8}  {:6} bytes", name, data.len());
    }
    Ok(())
}

fn do_chart(outfile: &str) -> Result<()> {
    let ed = build_demo_map()?;
    let doc = map_as_svg(&ed);
    svg::save(outfile, &doc)?;
    Ok(())
}

fn map_as_svg(map: &MapEditor) -> Document {
    let mut group = Group::new()
        // map y points up, svg y points down
        .set("transform", "scale(1 -1)");

    for line in map.linedefs.iter() {
        let v0 = &map.vertices[line.vx_a as usize];
        let v1 = &map.vertices[line.vx_b as usize];
        let class = if line.front != -1 && line.back != -1 {
            "two-sided"
        } else {
            "one-sided"
        };
        group.append(
            Line::new()
                .set("x1", v0.x)
                .set("y1", v0.y)
                .set("x2", v1.x)
                .set("y2", v1.y)
                .set("class", class),
        );
    }

    for thing in map.things.iter() {
        group.append(
            Circle::new()
                .set("cx", thing.x)
                .set("cy", thing.y)
                .set("r", 8)
                .set("class", "thing"),
        );
    }

    let (min, max) = map
        .bbox()
        .unwrap_or((Point::new(0, 0), Point::new(0, 0)));
    let margin = 16;
    Document::new()
        .set("viewBox", (
            min.x - margin,
            -(max.y + margin),
            max.x - min.x + margin * 2,
            max.y - min.y + margin * 2,
        ))
        .add(Style::new(
            "line { stroke: #333; stroke-width: 2; } \
             .two-sided { stroke: #aaa; } \
             .thing { fill: #c22; }",
        ))
        .add(group)
}
