//! Everything that reaches the screen.
//!
//! Text is composed with embedded color tokens (see [`lexer`]) taken from a
//! [`Palette`], then written through a [`ColorOutputStream`] which turns the
//! tokens into attribute changes on the terminal driver. [`repaint`] keeps
//! the edited line in sync with the input state; [`listing`] prints the
//! suggestion grid, the directory listing and the pagination question.

pub mod lexer;
pub mod line;
pub mod listing;
pub mod palette;
pub mod stream;

pub use lexer::{Lexer, Segment, strip_color_tokens};
pub use line::{colored_line, prompt_width, repaint};
pub use listing::{ConfirmAnchor, clear_confirm, show_confirm, write_dir_listing, write_suggestions};
pub use palette::{Palette, spec_tokens};
pub use stream::ColorOutputStream;
