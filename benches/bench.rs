use criterion::{criterion_group, criterion_main, Criterion};
use yaml_safer::{yaml_emitter_dump, yaml_emitter_new, yaml_emitter_set_output, Document, Parser};

static VERY_LARGE_YAML: &[u8] = include_bytes!("very_large.yml");

pub fn parser(c: &mut Criterion) {
    c.bench_function("yaml-safer parse large", |b| {
        b.iter(|| {
            let mut input = VERY_LARGE_YAML;
            let mut parser = Parser::new();
            parser.set_input(&mut input);
            Document::load(&mut parser)
        })
    });

    c.bench_function("yaml-safer emit large", |b| {
        // output shouldn't be much larger than the input, but just to be safe...
        let mut buffer = Vec::with_capacity(VERY_LARGE_YAML.len());

        let doc = {
            let mut parser = Parser::new();
            let mut input = VERY_LARGE_YAML;
            parser.set_input(&mut input);
            Document::load(&mut parser).unwrap()
        };

        b.iter_custom(|iters| {
            let mut measurement = std::time::Duration::ZERO;
            for _ in 0..iters {
                let mut doc = doc.clone();
                let start_time = std::time::Instant::now();
                let mut emitter = yaml_emitter_new();
                yaml_emitter_set_output(&mut emitter, &mut buffer);
                yaml_emitter_dump(&mut emitter, &mut doc).unwrap();
                measurement += start_time.elapsed();
            }
            measurement
        });
    });
}

criterion_group!(benches, parser);
criterion_main!(benches);
