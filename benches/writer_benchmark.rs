use std::{error::Error, hint::black_box, io::Write};

use criterion::{Criterion, criterion_group, criterion_main};
use jotson::writer::{Document, WriterSettings};

struct BlackBoxWriter;
impl Write for BlackBoxWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        black_box(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        black_box(buf);
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn bench_write<WF: Fn(&mut Document<BlackBoxWriter>) -> Result<(), Box<dyn Error>>>(
    c: &mut Criterion,
    name: &str,
    write_function: WF,
) {
    let mut group = c.benchmark_group(name);
    group.bench_with_input("compact", &write_function, |b, write_function| {
        b.iter(|| {
            let mut document = Document::new(BlackBoxWriter);
            write_function(&mut document).unwrap();
            document.finish().unwrap();
        })
    });
    group.bench_with_input("pretty", &write_function, |b, write_function| {
        b.iter(|| {
            let mut document =
                Document::new_custom(BlackBoxWriter, WriterSettings { pretty_print: true });
            write_function(&mut document).unwrap();
            document.finish().unwrap();
        })
    });
    group.finish();
}

fn benchmark_string_values(c: &mut Criterion) {
    let escape_free = "long string without any escapes ".repeat(40);
    let escape_heavy = "\"quotes\" and \\slashes\\ and \n\t controls ".repeat(40);

    bench_write(c, "string values", move |document| {
        let mut ar = document.ar()?;
        for _ in 0..50 {
            ar.val(escape_free.as_str())?;
            ar.val(escape_heavy.as_str())?;
        }
        Ok(())
    });
}

fn benchmark_nested_structure(c: &mut Criterion) {
    bench_write(c, "nested structure", |document| {
        let mut root = document.ar()?;
        for i in 0..100 {
            let mut obj = root.obj()?;
            obj.val("index", i)?;
            obj.val("flag", i % 2 == 0)?;
            obj.val("ratio", i as f64 / 3.0)?;
            let mut tags = obj.ar("tags")?;
            tags.val("a")?;
            tags.val("b")?;
        }
        Ok(())
    });
}

fn benchmark_numbers(c: &mut Criterion) {
    bench_write(c, "number values", |document| {
        let mut ar = document.ar()?;
        for i in 0..500_u64 {
            ar.val(i * 18_014_398_509_481)?;
        }
        Ok(())
    });
}

criterion_group!(
    benches,
    benchmark_string_values,
    benchmark_nested_structure,
    benchmark_numbers
);
criterion_main!(benches);
