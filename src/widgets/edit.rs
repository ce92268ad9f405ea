//! Edit strategies: per-field key handling for the field editor.
//!
//! An [`EditStrategy`] turns keys into changes of a bound value and reports
//! the text to display. The field editor only ever talks to the trait, so new
//! backing types plug in by implementing it (or [`Bindable`], to be usable
//! with [`bind`]).

use std::fmt::Display;
use std::str::FromStr;

use crate::event::input::Key;

// ---------------------------------------------------------------------------
// Change
// ---------------------------------------------------------------------------

/// What a key did to the bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    NoChange,
    Appended,
    Deleted,
}

impl Change {
    /// Whether the field needs repainting.
    pub fn is_change(self) -> bool {
        self != Change::NoChange
    }
}

// ---------------------------------------------------------------------------
// EditStrategy
// ---------------------------------------------------------------------------

/// Capability bound to one field of a [`FieldEditor`](super::FieldEditor).
pub trait EditStrategy {
    /// Apply `key` to the bound value.
    fn process(&mut self, key: Key) -> Change;

    /// Text currently shown for the field.
    fn content(&self) -> String;
}

/// Types that can be edited through [`bind`].
pub trait Bindable {
    fn strategy<'a>(&'a mut self) -> Box<dyn EditStrategy + 'a>;
}

/// Bind `value` to a boxed edit strategy for the field editor.
///
/// ```ignore
/// let mut name = String::new();
/// let mut age = 0u32;
/// let mut fields = vec![bind(&mut name), bind(&mut age)];
/// editor.run(&mut fields)?;
/// ```
pub fn bind<'a, V: Bindable + ?Sized>(value: &'a mut V) -> Box<dyn EditStrategy + 'a> {
    value.strategy()
}

// ---------------------------------------------------------------------------
// TextEdit
// ---------------------------------------------------------------------------

/// Free text bound to a `String`: printable keys append, Backspace deletes.
pub struct TextEdit<'a> {
    value: &'a mut String,
}

impl<'a> TextEdit<'a> {
    pub fn new(value: &'a mut String) -> Self {
        Self { value }
    }
}

impl EditStrategy for TextEdit<'_> {
    fn process(&mut self, key: Key) -> Change {
        match key {
            Key::Backspace => match self.value.pop() {
                Some(_) => Change::Deleted,
                None => Change::NoChange,
            },
            key => match key.printable() {
                Some(ch) => {
                    self.value.push(ch);
                    Change::Appended
                }
                None => Change::NoChange,
            },
        }
    }

    fn content(&self) -> String {
        self.value.clone()
    }
}

impl Bindable for String {
    fn strategy<'a>(&'a mut self) -> Box<dyn EditStrategy + 'a> {
        Box::new(TextEdit::new(self))
    }
}

// ---------------------------------------------------------------------------
// NumberEdit
// ---------------------------------------------------------------------------

/// A numeric value edited as text.
///
/// A key is accepted only when the text stays a valid number or a valid
/// start of one (`-`, `1e`, ...). The bound value follows the text whenever
/// it parses; an empty field resets it to `T::default()`.
pub struct NumberEdit<'a, T> {
    value: &'a mut T,
    text: String,
}

impl<'a, T> NumberEdit<'a, T>
where
    T: FromStr + Display + Default,
{
    pub fn new(value: &'a mut T) -> Self {
        let text = value.to_string();
        Self { value, text }
    }

    fn accepts(text: &str) -> bool {
        text.parse::<T>().is_ok() || format!("{text}0").parse::<T>().is_ok()
    }

    fn sync(&mut self) {
        if self.text.is_empty() {
            *self.value = T::default();
        } else if let Ok(parsed) = self.text.parse::<T>() {
            *self.value = parsed;
        }
    }
}

impl<T> EditStrategy for NumberEdit<'_, T>
where
    T: FromStr + Display + Default,
{
    fn process(&mut self, key: Key) -> Change {
        match key {
            Key::Backspace => {
                if self.text.pop().is_none() {
                    return Change::NoChange;
                }
                self.sync();
                Change::Deleted
            }
            key => {
                let Some(ch) = key.printable() else {
                    return Change::NoChange;
                };
                let mut candidate = self.text.clone();
                candidate.push(ch);
                if !Self::accepts(&candidate) {
                    return Change::NoChange;
                }
                self.text = candidate;
                self.sync();
                Change::Appended
            }
        }
    }

    fn content(&self) -> String {
        self.text.clone()
    }
}

macro_rules! bindable_numbers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn strategy<'a>(&'a mut self) -> Box<dyn EditStrategy + 'a> {
                    Box::new(NumberEdit::new(self))
                }
            }
        )*
    };
}

bindable_numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

// ===========================================================================
// Tests
// ===========================================================================
