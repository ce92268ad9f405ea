//! Table widget: renders rows of `T` through a cell generator.
//!
//! Column widths default to the widest of each header and its rendered
//! cells. Cells are cut to their column width and padded on the right;
//! headers are centered. Every mutator erases the surface and redraws the
//! whole table.
//!
//! ```text
//! ┌──────┬─────┐
//! │ Name │ Age │
//! ├──────┼─────┤
//! │ Al   │ 30  │
//! └──────┴─────┘
//! ```

use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::layer::Layer;
use crate::render::cell::{Attr, Glyph};
use crate::render::text::{pad_to_width, text_width, truncate};
use crate::screen::Screen;

/// Produces the text of column `index` for one row.
pub type Generator<T> = Box<dyn Fn(&T, usize) -> String>;

/// Rows taken by the borders, the header and the header rule.
const CHROME_ROWS: usize = 4;

// ---------------------------------------------------------------------------
// Width computation
// ---------------------------------------------------------------------------

/// Width of every column in cells: the widest of the header and each
/// rendered cell.
pub fn column_widths<T>(
    headers: &[String],
    data: &[T],
    generator: &dyn Fn(&T, usize) -> String,
) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            data.iter()
                .map(|row| text_width(&generator(row, index)))
                .fold(text_width(header), usize::max)
        })
        .collect()
}

/// `(height, width)` of a table with `rows` data rows and the given widths.
fn table_size(rows: usize, widths: &[usize]) -> (usize, usize) {
    (
        rows + CHROME_ROWS,
        1 + widths.iter().map(|w| w + 3).sum::<usize>(),
    )
}

/// `text` cut to `width` cells and padded with spaces on the right.
fn fit(text: &str, width: usize) -> String {
    pad_to_width(text, width)
}

/// `text` cut to `width` cells and centered.
fn center(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let left = (width - text_width(cut)) / 2;
    pad_to_width(&format!("{}{cut}", " ".repeat(left)), width)
}

// ---------------------------------------------------------------------------
// TableSpec
// ---------------------------------------------------------------------------

/// Everything needed to build a [`Table`].
pub struct TableSpec<T> {
    headers: Vec<String>,
    data: Vec<T>,
    generator: Generator<T>,
    lengths: Option<Vec<usize>>,
    auto_resize: bool,
}

impl<T> TableSpec<T> {
    /// Headers and the cell generator; no data, computed widths.
    pub fn new<S: Into<String>>(
        headers: impl IntoIterator<Item = S>,
        generator: impl Fn(&T, usize) -> String + 'static,
    ) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            data: Vec::new(),
            generator: Box::new(generator),
            lengths: None,
            auto_resize: false,
        }
    }

    /// Initial rows (builder).
    pub fn with_data(mut self, data: Vec<T>) -> Self {
        self.data = data;
        self
    }

    /// Fixed column widths instead of computed ones (builder).
    pub fn with_lengths(mut self, lengths: Vec<usize>) -> Self {
        self.lengths = Some(lengths);
        self
    }

    /// Shrink or grow the surface to fit the table exactly (builder).
    pub fn auto_resize(mut self, auto_resize: bool) -> Self {
        self.auto_resize = auto_resize;
        self
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A bordered grid drawn on a plain layer.
pub struct Table<T> {
    layer: Layer,
    headers: Vec<String>,
    data: Vec<T>,
    generator: Generator<T>,
    lengths: Vec<usize>,
    highlighted: Option<usize>,
}

impl<T> Table<T> {
    /// Build the table at `geometry` and draw it.
    ///
    /// Without auto-resize the table must fit `geometry`; with it, the
    /// resized surface must fit on the screen.
    pub fn new(screen: &Screen, spec: TableSpec<T>, geometry: Geometry) -> Result<Self> {
        let TableSpec {
            headers,
            data,
            generator,
            lengths,
            auto_resize,
        } = spec;
        if headers.is_empty() {
            return Err(Error::NoColumns);
        }
        let lengths = match lengths {
            Some(lengths) => {
                check_column_count(&headers, &lengths)?;
                lengths
            }
            None => column_widths(&headers, &data, &*generator),
        };

        let target = if auto_resize {
            fitted_geometry(screen, geometry, data.len(), &lengths)?
        } else {
            check_fits(geometry, data.len(), &lengths)?;
            geometry
        };
        let layer = Layer::plain(screen, target)?;

        let table = Self {
            layer,
            headers,
            data,
            generator,
            lengths,
            highlighted: None,
        };
        table.draw()?;
        Ok(table)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn column_widths(&self) -> &[usize] {
        &self.lengths
    }

    /// Row currently drawn in inverse video.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Current placement of the table surface.
    pub fn geometry(&self) -> Geometry {
        self.layer.geometry()
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    // ── Mutators ─────────────────────────────────────────────────────

    /// Replace the rows.
    ///
    /// With `auto_resize`, widths are recomputed and the surface refitted;
    /// otherwise the current widths stay and the rows must fit.
    pub fn set_data(&mut self, data: Vec<T>, auto_resize: bool) -> Result<()> {
        if auto_resize {
            let lengths = column_widths(&self.headers, &data, &*self.generator);
            let target = fitted_geometry(
                self.layer.content().screen(),
                self.layer.geometry(),
                data.len(),
                &lengths,
            )?;
            self.layer.resize(target.height, target.width)?;
            self.lengths = lengths;
        } else {
            check_fits(self.layer.geometry(), data.len(), &self.lengths)?;
        }
        self.data = data;
        if self.highlighted.is_some_and(|row| row >= self.data.len()) {
            self.highlighted = None;
        }
        tracing::debug!(rows = self.data.len(), auto_resize, "table data replaced");
        self.draw()
    }

    /// Use fixed column widths.
    pub fn set_lengths(&mut self, lengths: Vec<usize>) -> Result<()> {
        check_column_count(&self.headers, &lengths)?;
        check_fits(self.layer.geometry(), self.data.len(), &lengths)?;
        self.lengths = lengths;
        self.draw()
    }

    /// Replace the cell generator. Widths are kept; cells are cut to fit.
    pub fn set_generator(&mut self, generator: impl Fn(&T, usize) -> String + 'static) -> Result<()> {
        self.generator = Box::new(generator);
        self.draw()
    }

    /// Draw `row` in inverse video, or no row with `None`.
    ///
    /// The highlight is kept across later redraws. Rows past the end
    /// highlight nothing.
    pub fn highlight_row(&mut self, row: Option<usize>) -> Result<()> {
        self.highlighted = row;
        self.draw()
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Text of every table line, top border to bottom border.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.data.len() + CHROME_ROWS);
        lines.push(self.rule(Glyph::UpperLeft, Glyph::TeeDown, Glyph::UpperRight));
        lines.push(self.row_line(
            self.headers
                .iter()
                .zip(&self.lengths)
                .map(|(header, width)| center(header, *width)),
        ));
        lines.push(self.rule(Glyph::TeeRight, Glyph::Cross, Glyph::TeeLeft));
        for row in &self.data {
            lines.push(self.row_line(self.cells(row)));
        }
        lines.push(self.rule(Glyph::LowerLeft, Glyph::TeeUp, Glyph::LowerRight));
        lines
    }

    fn draw(&self) -> Result<()> {
        self.layer.erase()?;
        for (y, line) in self.lines().iter().enumerate() {
            self.layer.write_at(y as u16, 0, line)?;
        }
        if let Some((index, row)) = self
            .highlighted
            .and_then(|index| self.data.get(index).map(|row| (index, row)))
        {
            let y = (index + 3) as u16;
            self.layer.attr_set(Attr::REVERSE)?;
            let mut x = 1;
            for (cell, width) in self.cells(row).zip(&self.lengths) {
                self.layer.write_at(y, x as u16, &format!(" {cell} "))?;
                x += width + 3;
            }
            self.layer.attr_set(Attr::NORMAL)?;
        }
        self.layer.refresh()
    }

    fn cells<'a>(&'a self, row: &'a T) -> impl Iterator<Item = String> + 'a {
        self.lengths
            .iter()
            .enumerate()
            .map(move |(index, width)| fit(&(self.generator)(row, index), *width))
    }

    fn row_line(&self, cells: impl Iterator<Item = String>) -> String {
        let bar = Glyph::Vertical.as_char();
        let mut line = String::from(bar);
        for cell in cells {
            line.push(' ');
            line.push_str(&cell);
            line.push(' ');
            line.push(bar);
        }
        line
    }

    fn rule(&self, left: Glyph, join: Glyph, right: Glyph) -> String {
        let mut line = String::from(left.as_char());
        for (i, width) in self.lengths.iter().enumerate() {
            line.extend(std::iter::repeat(Glyph::Horizontal.as_char()).take(width + 2));
            line.push(if i + 1 == self.lengths.len() {
                right.as_char()
            } else {
                join.as_char()
            });
        }
        line
    }
}

fn check_column_count(headers: &[String], lengths: &[usize]) -> Result<()> {
    if lengths.len() != headers.len() {
        return Err(Error::ColumnCountMismatch {
            expected: headers.len(),
            actual: lengths.len(),
        });
    }
    Ok(())
}

fn check_fits(geometry: Geometry, rows: usize, lengths: &[usize]) -> Result<()> {
    let (height, width) = table_size(rows, lengths);
    if height > geometry.height as usize {
        return Err(Error::TooManyRows {
            rows,
            available: (geometry.height as usize).saturating_sub(CHROME_ROWS),
        });
    }
    if width > geometry.width as usize {
        return Err(Error::GeometryTooSmall {
            geometry,
            reason: "columns are wider than the table surface",
        });
    }
    Ok(())
}

/// `geometry` resized to fit the table exactly, checked against the screen.
fn fitted_geometry(
    screen: &Screen,
    geometry: Geometry,
    rows: usize,
    lengths: &[usize],
) -> Result<Geometry> {
    let (height, width) = table_size(rows, lengths);
    let (max_height, max_width) = screen.limits();
    let off_screen = || Error::OffScreen {
        geometry,
        width: max_width,
        height: max_height,
    };
    let height = u16::try_from(height).map_err(|_| off_screen())?;
    let width = u16::try_from(width).map_err(|_| off_screen())?;
    let fitted = geometry.with_size(height, width);
    if fitted.bottom() > max_height as u32 || fitted.right() > max_width as u32 {
        return Err(Error::OffScreen {
            geometry: fitted,
            width: max_width,
            height: max_height,
        });
    }
    Ok(fitted)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::screen_to_string;
    use pretty_assertions::assert_eq;

    struct Person {
        name: &'static str,
        age: u32,
    }

    fn person_cell(person: &Person, column: usize) -> String {
        match column {
            0 => person.name.to_owned(),
            _ => person.age.to_string(),
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Al", age: 30 },
            Person { name: "Bo", age: 5 },
        ]
    }

    fn spec() -> TableSpec<Person> {
        TableSpec::new(["Name", "Age"], person_cell).with_data(people())
    }

    // ── Widths ───────────────────────────────────────────────────────

    #[test]
    fn widths_take_header_or_longest_cell() {
        let headers = vec!["Name".to_owned(), "Age".to_owned()];
        assert_eq!(column_widths(&headers, &people(), &person_cell), vec![4, 3]);

        let long = vec![Person { name: "Bartholomew", age: 1234 }];
        assert_eq!(column_widths(&headers, &long, &person_cell), vec![11, 4]);
    }

    #[test]
    fn widths_without_data_are_header_lengths() {
        let headers = vec!["Id".to_owned(), "Description".to_owned()];
        assert_eq!(column_widths::<Person>(&headers, &[], &person_cell), vec![2, 11]);
    }

    #[test]
    fn fit_truncates_then_pads() {
        assert_eq!(fit("abcdef", 3), "abc");
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("", 2), "  ");
    }

    #[test]
    fn wide_cells_are_measured_in_cells() {
        let headers = vec!["City".to_owned()];
        let cities = vec!["東京".to_owned(), "Oslo".to_owned()];
        let widths = column_widths(&headers, &cities, &|city: &String, _| city.clone());
        assert_eq!(widths, vec![4]);
        assert_eq!(fit("東京都", 5), "東京 ");
        assert_eq!(center("東京", 6), " 東京 ");
    }

    #[test]
    fn center_pads_both_sides() {
        assert_eq!(center("Name", 8), "  Name  ");
        assert_eq!(center("Age", 4), "Age ");
        assert_eq!(center("Header", 3), "Hea");
    }

    #[test]
    fn size_formula() {
        assert_eq!(table_size(2, &[4, 3]), (6, 14));
        assert_eq!(table_size(0, &[1]), (4, 5));
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn renders_people() {
        let screen = Screen::headless(20, 8);
        let table = Table::new(&screen, spec(), Geometry::sized(8, 20)).unwrap();
        assert_eq!(table.column_widths(), [4, 3]);
        insta::assert_snapshot!(screen_to_string(&screen), @r"
        ┌──────┬─────┐
        │ Name │ Age │
        ├──────┼─────┤
        │ Al   │ 30  │
        │ Bo   │ 5   │
        └──────┴─────┘
        ");
    }

    #[test]
    fn auto_resize_fits_table_exactly() {
        let screen = Screen::headless(40, 20);
        let table = Table::new(&screen, spec().auto_resize(true), Geometry::new(3, 3, 1, 2)).unwrap();
        assert_eq!(table.geometry(), Geometry::new(6, 14, 1, 2));
    }

    #[test]
    fn wide_cells_keep_borders_aligned() {
        let screen = Screen::headless(12, 6);
        let spec = TableSpec::new(["City"], |city: &String, _| city.clone())
            .with_data(vec!["東京".to_owned(), "Oslo".to_owned()]);
        let _table = Table::new(&screen, spec, Geometry::sized(6, 8)).unwrap();
        assert_eq!(
            screen_to_string(&screen),
            "┌──────┐\n│ City │\n├──────┤\n│ 東京 │\n│ Oslo │\n└──────┘"
        );
    }

    #[test]
    fn control_chars_in_cells_render_as_blanks() {
        let screen = Screen::headless(12, 5);
        let spec = TableSpec::new(["N"], |text: &&str, _| (*text).to_owned()).with_data(vec!["a\tb"]);
        let _table = Table::new(&screen, spec, Geometry::sized(5, 7)).unwrap();
        assert_eq!(
            screen_to_string(&screen),
            "┌─────┐\n│  N  │\n├─────┤\n│ a b │\n└─────┘"
        );
    }

    #[test]
    fn auto_resize_starts_from_oversized_geometry() {
        let screen = Screen::headless(30, 10);
        let spec = TableSpec::new(["A"], |n: &u32, _| n.to_string())
            .with_data(vec![1, 2])
            .auto_resize(true);
        let table = Table::new(&screen, spec, Geometry::sized(40, 80)).unwrap();
        let (height, width) = table_size(table.data().len(), table.column_widths());
        assert_eq!((height, width), (6, 5));
        assert_eq!(table.geometry(), Geometry::sized(6, 5));
        assert_eq!(screen.surface_count(), 1);
    }

    #[test]
    fn auto_resize_off_screen_is_rejected() {
        let screen = Screen::headless(10, 20);
        let err = Table::new(&screen, spec().auto_resize(true), Geometry::sized(3, 3)).err();
        assert!(matches!(err, Some(Error::OffScreen { .. })));
    }

    #[test]
    fn fixed_lengths_truncate_cells() {
        let screen = Screen::headless(20, 8);
        let spec = TableSpec::new(["Name", "Age"], person_cell)
            .with_data(vec![Person { name: "Bartholomew", age: 7 }])
            .with_lengths(vec![3, 3]);
        let table = Table::new(&screen, spec, Geometry::sized(8, 20)).unwrap();
        assert_eq!(table.lines()[3], "│ Bar │ 7   │");
        assert_eq!(table.lines()[1], "│ Nam │ Age │");
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let screen = Screen::headless(20, 8);
        let spec = spec().with_lengths(vec![4]);
        let err = Table::new(&screen, spec, Geometry::sized(8, 20)).err();
        assert!(matches!(
            err,
            Some(Error::ColumnCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn no_headers_is_rejected() {
        let screen = Screen::headless(20, 8);
        let spec = TableSpec::<Person>::new(Vec::<String>::new(), person_cell);
        assert!(matches!(
            Table::new(&screen, spec, Geometry::sized(8, 20)).err(),
            Some(Error::NoColumns)
        ));
    }

    #[test]
    fn undersized_geometry_is_rejected() {
        let screen = Screen::headless(20, 8);
        let err = Table::new(&screen, spec(), Geometry::sized(5, 20)).err();
        assert!(matches!(err, Some(Error::TooManyRows { rows: 2, available: 1 })));
        let err = Table::new(&screen, spec(), Geometry::sized(8, 10)).err();
        assert!(matches!(err, Some(Error::GeometryTooSmall { .. })));
    }

    // ── Mutators ─────────────────────────────────────────────────────

    #[test]
    fn highlight_is_inverse_and_sticky() {
        let screen = Screen::headless(20, 8);
        let mut table = Table::new(&screen, spec(), Geometry::sized(8, 20)).unwrap();
        table.highlight_row(Some(1)).unwrap();
        table.set_generator(person_cell).unwrap();
        assert_eq!(table.highlighted(), Some(1));

        let c = screen.compositor();
        assert_eq!(c.get_cell(2, 4).map(|cell| cell.attr), Some(Attr::REVERSE));
        assert_eq!(c.get_cell(0, 4).map(|cell| cell.attr), Some(Attr::NORMAL));
        assert_eq!(c.get_cell(2, 3).map(|cell| cell.attr), Some(Attr::NORMAL));
    }

    #[test]
    fn clearing_highlight_restores_normal() {
        let screen = Screen::headless(20, 8);
        let mut table = Table::new(&screen, spec(), Geometry::sized(8, 20)).unwrap();
        table.highlight_row(Some(0)).unwrap();
        table.highlight_row(None).unwrap();
        let c = screen.compositor();
        assert_eq!(c.get_cell(2, 3).map(|cell| cell.attr), Some(Attr::NORMAL));
    }

    #[test]
    fn set_data_auto_resize_uses_full_formula() {
        let screen = Screen::headless(40, 20);
        let mut table = Table::new(&screen, spec().auto_resize(true), Geometry::sized(3, 3)).unwrap();
        table
            .set_data(
                vec![
                    Person { name: "Cassandra", age: 41 },
                    Person { name: "Di", age: 102 },
                    Person { name: "Ed", age: 9 },
                ],
                true,
            )
            .unwrap();
        assert_eq!(table.column_widths(), [9, 3]);
        assert_eq!(table.geometry(), Geometry::sized(7, 1 + 12 + 6));
        assert_eq!(screen_to_string(&screen).lines().count(), 7);
    }

    #[test]
    fn set_data_without_room_keeps_old_rows() {
        let screen = Screen::headless(20, 8);
        let mut table = Table::new(&screen, spec(), Geometry::sized(6, 20)).unwrap();
        let err = table
            .set_data(
                vec![
                    Person { name: "A", age: 1 },
                    Person { name: "B", age: 2 },
                    Person { name: "C", age: 3 },
                ],
                false,
            )
            .err();
        assert!(matches!(err, Some(Error::TooManyRows { .. })));
        assert_eq!(table.data().len(), 2);
    }

    #[test]
    fn set_data_drops_stale_highlight() {
        let screen = Screen::headless(20, 8);
        let mut table = Table::new(&screen, spec(), Geometry::sized(8, 20)).unwrap();
        table.highlight_row(Some(1)).unwrap();
        table.set_data(vec![Person { name: "Zed", age: 3 }], false).unwrap();
        assert_eq!(table.highlighted(), None);
    }

    #[test]
    fn set_lengths_redraws() {
        let screen = Screen::headless(20, 8);
        let mut table = Table::new(&screen, spec(), Geometry::sized(8, 20)).unwrap();
        table.set_lengths(vec![6, 3]).unwrap();
        assert_eq!(table.lines()[1], "│  Name  │ Age │");
        assert!(screen_to_string(&screen).starts_with("┌────────┬─────┐"));
        assert!(table.set_lengths(vec![1, 2, 3]).is_err());
    }
}
