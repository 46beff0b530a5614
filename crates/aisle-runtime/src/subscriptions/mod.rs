//! Built-in subscription sources: terminal input and a repeating timer.

mod terminal;
mod timer;

pub use terminal::*;
pub use timer::*;
