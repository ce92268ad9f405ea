//! Showcase: walk through every widget on the real terminal.
//!
//! Run with `cargo run --example showcase`. Logs go to `gilt-layers.log`;
//! set `GILT_LAYERS_LOG=gilt_layers=trace` to see every key.

use std::fs::File;
use std::sync::Mutex;

use gilt_layers::prelude::*;
use gilt_layers::widgets::column_widths;

struct Planet {
    name: &'static str,
    moons: u32,
    kind: &'static str,
}

const PLANETS: [Planet; 5] = [
    Planet { name: "Mercury", moons: 0, kind: "rocky" },
    Planet { name: "Earth", moons: 1, kind: "rocky" },
    Planet { name: "Jupiter", moons: 95, kind: "gas giant" },
    Planet { name: "Uranus", moons: 28, kind: "ice giant" },
    Planet { name: "Neptune", moons: 16, kind: "ice giant" },
];

fn planet_cell(planet: &Planet, column: usize) -> String {
    match column {
        0 => planet.name.to_owned(),
        1 => planet.moons.to_string(),
        _ => planet.kind.to_owned(),
    }
}

fn init_logging() -> std::io::Result<()> {
    let file = File::create("gilt-layers.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("GILT_LAYERS_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gilt_layers=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(screen: &Screen) -> Result<String> {
    let (height, width) = screen.limits();
    let centered = |h: u16, w: u16| {
        Geometry::new(h, w, height.saturating_sub(h) / 2, width.saturating_sub(w) / 2)
    };

    // Planets to show, picked from a multi-select list.
    let names: Vec<&str> = PLANETS.iter().map(|p| p.name).collect();
    let mut pick = Selection::new(
        screen,
        "Planets",
        centered(names.len() as u16 + 7, 30),
        names,
        SelectionOptions::new().with_multi(true).with_centered(true),
    )?;
    let (picked, ok) = pick.run()?;
    drop(pick);
    if !ok {
        return Ok("nothing picked".to_owned());
    }

    // Browse the picked rows; Up/Down move the highlight, Enter continues.
    let rows: Vec<Planet> = PLANETS
        .into_iter()
        .enumerate()
        .filter(|(index, _)| picked.contains(index))
        .map(|(_, planet)| planet)
        .collect();
    let headers = ["Planet", "Moons", "Kind"].map(String::from);
    let widths = column_widths(&headers, &rows, &planet_cell);
    let table_width = 1 + widths.iter().map(|w| w + 3).sum::<usize>() as u16;
    let spec = TableSpec::new(headers, planet_cell)
        .with_data(rows)
        .auto_resize(true);
    let mut table = Table::new(screen, spec, centered(3, table_width))?;
    let mut row = 0;
    table.highlight_row(Some(row))?;
    loop {
        match table.layer().read_key()? {
            Key::Up => row = row.saturating_sub(1),
            Key::Down => row = (row + 1).min(table.data().len().saturating_sub(1)),
            Key::Enter | Key::Escape => break,
            _ => continue,
        }
        table.highlight_row(Some(row))?;
    }
    let chosen = table.data()[row].name;
    drop(table);

    // Describe a new moon for the chosen planet.
    let mut moon = String::new();
    let mut radius = 0.0f64;
    let mut editor = FieldEditor::new(
        screen,
        &format!("New moon of {chosen}"),
        ["Name", "Radius (km)"],
        centered(10, 44),
    )?;
    editor
        .layer()
        .set_title_attribute(Attr::BOLD)?;
    let committed = {
        let mut fields = vec![bind(&mut moon), bind(&mut radius)];
        editor.run(&mut fields)?
    };
    drop(editor);

    Ok(if committed {
        format!("{chosen} gains {moon} ({radius} km)")
    } else {
        format!("{chosen} keeps its moons")
    })
}

fn main() -> Result<()> {
    init_logging()?;
    let screen = Screen::new(ScreenConfig::new().with_title("gilt-layers showcase"))?;
    let outcome = run(&screen);
    drop(screen);
    println!("{}", outcome?);
    Ok(())
}
