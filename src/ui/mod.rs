pub mod picker;

pub use picker::{Picker, PickerState};
