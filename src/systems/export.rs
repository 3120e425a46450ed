// saves the current cells as an svg file
// one closed path per drawable cell, in canvas pixels

use bevy::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::systems::Canvas;
use crate::systems::overlay::{CellDiagram, Hue};

// export event
#[derive(Event)]
pub struct ExportEvent {
    pub filename: String,
}

pub fn write_svg(
    writer: &mut impl Write,
    diagram: &CellDiagram,
    canvas: &Canvas,
    hue: f32,
) -> Result<usize, Box<dyn std::error::Error>> {
    let stroke = Color::hsv(hue, 1.0, 1.0).to_srgba().to_hex();

    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.size.x,
        h = canvas.size.y
    )?;
    writeln!(writer, r#"<rect width="100%" height="100%" fill="black"/>"#)?;
    writeln!(writer, r#"<g fill="none" stroke="{}" stroke-width="1">"#, stroke)?;

    let mut cell_count = 0;
    for cell in diagram.drawable() {
        let mut path = String::new();
        for (i, p) in cell.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            path.push_str(&format!("{}{:.2},{:.2} ", cmd, p.x, p.y));
        }
        writeln!(writer, r#"<path d="{}Z"/>"#, path)?;
        cell_count += 1;
    }

    writeln!(writer, "</g>")?;
    writeln!(writer, "</svg>")?;
    writer.flush()?;

    Ok(cell_count)
}

pub fn export_svg(
    diagram: &CellDiagram,
    canvas: &Canvas,
    hue: f32,
    filename: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);
    write_svg(&mut writer, diagram, canvas, hue)
}

// handle export events
pub fn handle_export(
    mut events: EventReader<ExportEvent>,
    diagram: Res<CellDiagram>,
    canvas: Res<Canvas>,
    hue: Res<Hue>,
) {
    for event in events.read() {
        match export_svg(&diagram, &canvas, hue.0, &event.filename) {
            Ok(cells) => {
                info!("exported {} cells to {}", cells, event.filename);
            }
            Err(e) => {
                error!("export to {} failed: {}", event.filename, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_has_one_path_per_drawable_cell() {
        let diagram = CellDiagram {
            cells: vec![
                Some(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]),
                None,
                Some(vec![Vec2::new(20.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(30.0, 10.0)]),
            ],
        };
        let canvas = Canvas { size: Vec2::new(640.0, 480.0) };

        let mut out = Vec::new();
        let count = write_svg(&mut out, &diagram, &canvas, 0.0).unwrap();
        let svg = String::from_utf8(out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains(r#"width="640""#));
        assert!(svg.contains("M0.00,0.00 L10.00,0.00 L10.00,10.00 Z"));
        assert!(svg.contains(r##"stroke="#"##));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let diagram = CellDiagram::default();
        let canvas = Canvas::default();
        assert!(export_svg(&diagram, &canvas, 0.0, "/definitely/not/here/out.svg").is_err());
    }
}
