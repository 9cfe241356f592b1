//! Adapter binary: parses the variable-precision flags, builds a
//! [`Context`], and runs a single arithmetic call through it. Stands in for
//! the host's instrumentation call site described by the numeric kernel's
//! external interface; not itself part of that interface.

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use vprec::context::{ErrorMode, Mode};
use vprec::ops::OpKind;
use vprec::{ops, Context, Preset};

#[derive(Parser, Debug)]
#[command(
    name = "vprec-cli",
    author,
    version,
    about = "Variable-precision floating-point emulation"
)]
struct Cli {
    /// Target mantissa bits for binary32 operands (1-23).
    #[arg(long = "precision-binary32")]
    precision_binary32: Option<u32>,

    /// Target mantissa bits for binary64 operands (1-52).
    #[arg(long = "precision-binary64")]
    precision_binary64: Option<u32>,

    /// Target exponent bits for binary32 operands (2-8).
    #[arg(long = "range-binary32")]
    range_binary32: Option<u32>,

    /// Target exponent bits for binary64 operands (2-11).
    #[arg(long = "range-binary64")]
    range_binary64: Option<u32>,

    /// Named precision/range preset applied to both carriers.
    #[arg(long)]
    preset: Option<String>,

    /// Rounding mode: ieee, full, ib, ob.
    #[arg(long, default_value = "ob")]
    mode: String,

    /// Error regime: rel, abs, all.
    #[arg(long = "error-mode", default_value = "rel")]
    error_mode: String,

    /// Absolute-error target exponent, used when `error-mode` includes abs.
    #[arg(long = "max-abs-error-exponent")]
    max_abs_error_exponent: Option<i32>,

    /// Flush subnormal inputs to zero.
    #[arg(long)]
    daz: bool,

    /// Flush subnormal outputs to zero.
    #[arg(long)]
    ftz: bool,

    /// First operand.
    a: f64,

    /// Operator: add, sub, mul, div.
    op: String,

    /// Second operand.
    b: f64,
}

fn parse_op(s: &str) -> Option<OpKind> {
    match s.to_ascii_lowercase().as_str() {
        "add" | "+" => Some(OpKind::Add),
        "sub" | "-" => Some(OpKind::Sub),
        "mul" | "*" => Some(OpKind::Mul),
        "div" | "/" => Some(OpKind::Div),
        _ => None,
    }
}

/// Function-pointer table mirroring the host-facing dispatch surface a
/// real instrumentation backend exports to intercept arithmetic calls.
struct FnTable {
    add_f64: fn(f64, f64, &Context) -> f64,
    sub_f64: fn(f64, f64, &Context) -> f64,
    mul_f64: fn(f64, f64, &Context) -> f64,
    div_f64: fn(f64, f64, &Context) -> f64,
}

const FN_TABLE: FnTable = FnTable {
    add_f64: ops::add_f64,
    sub_f64: ops::sub_f64,
    mul_f64: ops::mul_f64,
    div_f64: ops::div_f64,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("VPREC_LOG").add_directive(Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    let mut ctx = Context::default();

    if let Some(name) = &cli.preset {
        match Preset::parse(name) {
            Ok(preset) => {
                if let Err(e) = ctx.apply_preset(preset) {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }

    if let Some(p) = cli.precision_binary32 {
        if let Err(e) = ctx.set_prec32(p) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
    if let Some(p) = cli.precision_binary64 {
        if let Err(e) = ctx.set_prec64(p) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
    if let Some(r) = cli.range_binary32 {
        if let Err(e) = ctx.set_range32(r) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
    if let Some(r) = cli.range_binary64 {
        if let Err(e) = ctx.set_range64(r) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }

    match Mode::parse(&cli.mode) {
        Ok(mode) => ctx.set_mode(mode),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }

    match ErrorMode::parse(&cli.error_mode) {
        Ok(error_mode) => {
            ctx.set_error_mode(error_mode).expect("ErrorMode flags are always valid");
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }

    if let Some(exp) = cli.max_abs_error_exponent {
        ctx.set_abs_err_exp(exp).expect("absErrExp accepts any i32");
    }

    ctx.set_daz(cli.daz);
    ctx.set_ftz(cli.ftz);

    let Some(kind) = parse_op(&cli.op) else {
        eprintln!("error: unknown operator `{}` (expected add, sub, mul, div)", cli.op);
        std::process::exit(1);
    };

    info!(?ctx, op = cli.op, a = cli.a, b = cli.b, "dispatching rounded operation");

    let result = match kind {
        OpKind::Add => (FN_TABLE.add_f64)(cli.a, cli.b, &ctx),
        OpKind::Sub => (FN_TABLE.sub_f64)(cli.a, cli.b, &ctx),
        OpKind::Mul => (FN_TABLE.mul_f64)(cli.a, cli.b, &ctx),
        OpKind::Div => (FN_TABLE.div_f64)(cli.a, cli.b, &ctx),
    };

    println!("{result}");
}
