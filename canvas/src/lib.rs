//! Raster drawing engine for the collaborative sketch board.
//!
//! This crate compiles to WebAssembly and runs in the browser, but everything
//! except [`engine::Engine`] is plain Rust and runs headless. It owns the
//! pixel surface, freehand stroke rasterization, flood fill and the undo
//! history, and it translates local input into `drawing` / `fill` events for
//! the relay. Remote events are applied through the same code paths, so peers
//! that see the same event order converge on the same pixels.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`surface`] | RGBA pixel buffer and snapshots |
//! | [`stroke`] | Segment rasterizer and local stroke tracking |
//! | [`fill`] | 4-connected flood fill |
//! | [`history`] | Snapshot stack for undo |
//! | [`sync`] | Emitting local events and applying remote ones |
//! | [`input`] | Pointer/key types and the tool state |
//! | [`export`] | PNG encoding |
//! | [`consts`] | Shared defaults and brush limits |

pub mod consts;
pub mod engine;
pub mod export;
pub mod fill;
pub mod history;
pub mod input;
pub mod stroke;
pub mod surface;
pub mod sync;
