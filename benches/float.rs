//! Benchmarks comparing structured matching against hand-written regexes
//!
//! Each group matches the same text twice:
//! A. Restructure - compiled schema, inflated into a struct
//! B. Regex - equivalent hand-written pattern, captures only
//!
//! Run with: cargo bench --bench float

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regex::Regex;
use restructure::{Descriptor, Pattern, Schema, SchemaBuilder, Submatch};

const TEXT: &str = "
The US economy went through an economic downturn following the financial
crisis of 2007-08, with output as late as 2013 still below potential.
The economy, however, began to recover in the second half of 2009, and as
of November 2015, unemployment had declined from a high of 10% to 5%; the
broader U-6 unemployment rate was 9.8% (it had reached 16% in 2009). At
11.3%, the U.S. has one of the lowest labor union participation rates in
the OECD. Total public and private debt was $50 trillion at the end of the
first quarter of 2010, or 3.5 times GDP.
";

// ============================================================================
// Schemas
// ============================================================================

/// Matches "123", "1.23", "1.23e-4", "-12.3E+5", ".123"
#[derive(Default)]
struct Float {
    sign: Option<Sign>,
    whole: String,
    frac: String,
    exponent: Option<Exponent>,
}

impl Schema for Float {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Float")
            .optional("sign", "?", |v| &mut v.sign)
            .scalar("whole", "[0-9]*", |v| &mut v.whole)
            .separator(r"\.?")
            .scalar("frac", "[0-9]+", |v| &mut v.frac)
            .optional("exponent", "?", |v| &mut v.exponent)
            .build()
    }
}

#[derive(Default)]
struct Sign {
    ch: String,
}

impl Schema for Sign {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Sign")
            .scalar("ch", "[+-]", |v| &mut v.ch)
            .build()
    }
}

#[derive(Default)]
struct Exponent {
    sign: Option<Sign>,
    num: String,
}

impl Schema for Exponent {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Exponent")
            .separator("(?i:e)")
            .optional("sign", "?", |v| &mut v.sign)
            .scalar("num", "[0-9]+", |v| &mut v.num)
            .build()
    }
}

#[derive(Default)]
struct EmailAddress {
    user: Submatch,
    host: Submatch,
}

impl Schema for EmailAddress {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("EmailAddress")
            .separator("^")
            .scalar("user", "[a-zA-Z0-9._%+-]+", |v| &mut v.user)
            .separator("@")
            .scalar("host", ".+", |v| &mut v.host)
            .separator("$")
            .build()
    }
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_float(c: &mut Criterion) {
    let pattern = Pattern::<Float>::must_compile();
    let plain = Regex::new(
        r"((?:([+\-]))?)([0-9]*)\.?([0-9]+)((?:(?i:E)((?:([+\-]))?)([0-9]+))?)",
    )
    .unwrap();

    let mut g = c.benchmark_group("float");
    g.bench_function("A_restructure_find", |b| {
        let mut f = Float::default();
        b.iter(|| pattern.find(&mut f, black_box(TEXT)))
    });
    g.bench_function("B_regex_captures", |b| {
        b.iter(|| plain.captures(black_box(TEXT)).map(|c| c.len()))
    });
    g.bench_function("A_restructure_find_all", |b| {
        b.iter(|| pattern.find_all(black_box(TEXT), None).map(|v| v.len()))
    });
    g.bench_function("B_regex_captures_iter", |b| {
        b.iter(|| plain.captures_iter(black_box(TEXT)).count())
    });
    g.finish();
}

fn bench_email(c: &mut Criterion) {
    let pattern = Pattern::<EmailAddress>::must_compile();
    let plain = Regex::new(r"^([a-zA-Z0-9._%+-]+)@(.+)$").unwrap();

    let mut g = c.benchmark_group("email");
    g.bench_function("A_restructure_find", |b| {
        let mut addr = EmailAddress::default();
        b.iter(|| pattern.find(&mut addr, black_box("joe@example.com")))
    });
    g.bench_function("B_regex_captures", |b| {
        b.iter(|| plain.captures(black_box("joe@example.com")).map(|c| c.len()))
    });
    g.finish();
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_float", |b| {
        b.iter(|| Pattern::<Float>::compile().map(|p| p.captures_len()))
    });
}

criterion_group!(benches, bench_float, bench_email, bench_compile);
criterion_main!(benches);
