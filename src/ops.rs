//! The wrapped binary arithmetic operators: conditionally round operands,
//! perform the IEEE operation in the carrier, conditionally round the
//! result.

use crate::context::{Context, Mode};
use crate::round::{round32, round64};

/// Which elementary operator a wrapped call performs, replacing the
/// source's `perform_binary_op` macro dispatch with an explicit enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl OpKind {
    fn apply_f32(self, a: f32, b: f32) -> f32 {
        match self {
            OpKind::Add => a + b,
            OpKind::Sub => a - b,
            OpKind::Mul => a * b,
            OpKind::Div => a / b,
        }
    }

    fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            OpKind::Add => a + b,
            OpKind::Sub => a - b,
            OpKind::Mul => a * b,
            OpKind::Div => a / b,
        }
    }
}

/// Applies `kind` to `(a, b)` in single precision, rounding operands and/or
/// the result according to `ctx.mode()`. `IEEE` mode short-circuits both
/// rounds and is bit-exact with the carrier's native operator.
pub fn binary_op_f32(a: f32, b: f32, kind: OpKind, ctx: &Context) -> f32 {
    if ctx.mode() == Mode::Ieee {
        return kind.apply_f32(a, b);
    }
    let (a, b) = if matches!(ctx.mode(), Mode::Full | Mode::Ib) {
        (round32(a, true, ctx), round32(b, true, ctx))
    } else {
        (a, b)
    };
    let r = kind.apply_f32(a, b);
    if matches!(ctx.mode(), Mode::Full | Mode::Ob) {
        round32(r, false, ctx)
    } else {
        r
    }
}

/// Double-precision counterpart of [`binary_op_f32`].
pub fn binary_op_f64(a: f64, b: f64, kind: OpKind, ctx: &Context) -> f64 {
    if ctx.mode() == Mode::Ieee {
        return kind.apply_f64(a, b);
    }
    let (a, b) = if matches!(ctx.mode(), Mode::Full | Mode::Ib) {
        (round64(a, true, ctx), round64(b, true, ctx))
    } else {
        (a, b)
    };
    let r = kind.apply_f64(a, b);
    if matches!(ctx.mode(), Mode::Full | Mode::Ob) {
        round64(r, false, ctx)
    } else {
        r
    }
}

pub fn add_f32(a: f32, b: f32, ctx: &Context) -> f32 {
    binary_op_f32(a, b, OpKind::Add, ctx)
}
pub fn sub_f32(a: f32, b: f32, ctx: &Context) -> f32 {
    binary_op_f32(a, b, OpKind::Sub, ctx)
}
pub fn mul_f32(a: f32, b: f32, ctx: &Context) -> f32 {
    binary_op_f32(a, b, OpKind::Mul, ctx)
}
pub fn div_f32(a: f32, b: f32, ctx: &Context) -> f32 {
    binary_op_f32(a, b, OpKind::Div, ctx)
}

pub fn add_f64(a: f64, b: f64, ctx: &Context) -> f64 {
    binary_op_f64(a, b, OpKind::Add, ctx)
}
pub fn sub_f64(a: f64, b: f64, ctx: &Context) -> f64 {
    binary_op_f64(a, b, OpKind::Sub, ctx)
}
pub fn mul_f64(a: f64, b: f64, ctx: &Context) -> f64 {
    binary_op_f64(a, b, OpKind::Mul, ctx)
}
pub fn div_f64(a: f64, b: f64, ctx: &Context) -> f64 {
    binary_op_f64(a, b, OpKind::Div, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ieee_mode_is_bit_exact() {
        let mut ctx = Context::default();
        ctx.set_mode(Mode::Ieee);
        ctx.set_prec64(10).unwrap();
        let a = 1.0f64 + 2f64.powi(-40);
        let b = 2f64.powi(-50);
        assert_eq!(add_f64(a, b, &ctx), a + b);
        assert_eq!(mul_f64(a, b, &ctx), a * b);
    }

    #[test]
    fn scenario_s3_ieee_identical_full_precision() {
        let ctx = Context::default();
        assert_eq!(mul_f64(3.0, 0.1, &ctx), 0.30000000000000004);
    }

    #[test]
    fn scenario_s1_ob_mode_rounds_output() {
        let mut ctx = Context::default();
        ctx.set_prec64(10).unwrap();
        ctx.set_range64(11).unwrap();
        assert_eq!(add_f64(1.0, 2f64.powi(-30), &ctx), 1.0);
    }

    #[test]
    fn scenario_s2_ob_mode_keeps_on_ulp_increment() {
        let mut ctx = Context::default();
        ctx.set_prec64(10).unwrap();
        ctx.set_range64(11).unwrap();
        assert_eq!(add_f64(1.0, 2f64.powi(-9), &ctx), 1.0 + 2f64.powi(-9));
    }

    #[test]
    fn mode_monotonicity_fixed_points_agree() {
        let mut ctx = Context::default();
        ctx.set_prec64(10).unwrap();
        ctx.set_range64(11).unwrap();
        ctx.set_mode(Mode::Ob);
        let a = round64(1.0, true, &ctx);
        let b = round64(2f64.powi(-9), true, &ctx);
        let ob = add_f64(a, b, &ctx);
        ctx.set_mode(Mode::Full);
        let full = add_f64(a, b, &ctx);
        assert_eq!(ob, full);
    }

    #[test]
    fn div_by_zero_follows_carrier_hardware() {
        let ctx = Context::default();
        assert_eq!(div_f64(1.0, 0.0, &ctx), f64::INFINITY);
        assert!(div_f64(0.0, 0.0, &ctx).is_nan());
    }
}
