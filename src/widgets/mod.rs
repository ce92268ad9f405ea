//! Built-in widgets: Selection, Table, FieldEditor and the edit strategies
//! behind editor fields.

pub mod edit;
pub mod field_editor;
pub mod selection;
pub mod table;

pub use edit::{bind, Bindable, Change, EditStrategy, NumberEdit, TextEdit};
pub use field_editor::{Action, EditorState, FieldEditor, Focus};
pub use selection::{Selection, SelectionOptions, SelectionState};
pub use table::{column_widths, Generator, Table, TableSpec};

use crate::geometry::Geometry;

/// Label of the confirmation control shared by the modal widgets.
pub(crate) const OK_LABEL: &str = "[ OK ]";

/// Content-relative `(y, x)` of the `[ OK ]` control: last row, left of the
/// window's horizontal center.
pub(crate) fn ok_position(content: Geometry) -> (u16, u16) {
    let window_width = content.width + 2;
    (
        content.height.saturating_sub(1),
        (window_width / 2).saturating_sub(4),
    )
}
