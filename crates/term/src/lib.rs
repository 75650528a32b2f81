//! Terminal front end for the Quantum 2048 engine.
//!
//! Rendering goes through a small framebuffer instead of a widget toolkit:
//! [`GameView`] turns a [`core::GameSnapshot`] into styled cells and
//! [`TerminalRenderer`] flushes only the runs that changed since the last frame.

pub mod fb;
pub mod format;
pub mod game_view;
pub mod renderer;

pub use quantum2048_core as core;
pub use quantum2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use format::{compact_number, score_text};
pub use game_view::{GameView, Overlay, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, TerminalRenderer};
