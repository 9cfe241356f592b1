/*!
`vprec` emulates IEEE-754 arithmetic at a reduced, caller-chosen precision
and exponent range. Given a hardware `f32`/`f64` value and a target
`(range, precision)` pair, [`round32`]/[`round64`] return the value that
format would have produced; [`ops`] lifts the four elementary operators
(add/sub/mul/div) to that reduced format by rounding around the carrier's
native operation.

A [`Context`] carries the target parameters: per-carrier precision and
range, the [`Mode`] controlling whether rounding applies to operands,
results, both, or neither, and the error regime (relative, absolute, or
both) used by the rounder's absolute-error handler. Named hardware-format
[`Preset`]s (`binary16`, `bfloat16`, ...) set precision and range together.

This is the API documentation.
*/

pub mod carrier;
pub mod context;
pub mod error;
pub mod ops;
pub mod preset;
pub mod round;

pub use crate::context::{Context, ErrorMode, Mode};
pub use crate::error::VprecError;
pub use crate::preset::Preset;
pub use crate::round::{round32, round64};
